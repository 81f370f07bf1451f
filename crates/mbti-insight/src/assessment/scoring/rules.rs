use super::super::domain::{Dimension, DimensionBreakdown, Question};
use super::scale::response_percentage;

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: f64,
    count: u32,
}

/// Per-axis right-pole percentages. An axis nobody answered stays `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimensionScores {
    right: [Option<u8>; 4],
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> Option<u8> {
        self.right[dimension.index()]
    }

    pub fn missing(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|dimension| self.get(*dimension).is_none())
            .collect()
    }

    /// Promote to a full score set, or report the first unanswered axis.
    pub fn complete(&self) -> Result<AxisScores, Dimension> {
        let mut right = [0u8; 4];
        for dimension in Dimension::ALL {
            right[dimension.index()] = self.get(dimension).ok_or(dimension)?;
        }
        Ok(AxisScores { right })
    }
}

/// Scores for all four axes, each a right-pole percentage in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisScores {
    right: [u8; 4],
}

impl AxisScores {
    /// Values above 100 are capped so both poles stay in range.
    pub fn new(right: [u8; 4]) -> Self {
        Self {
            right: right.map(|value| value.min(100)),
        }
    }

    pub fn right(&self, dimension: Dimension) -> u8 {
        self.right[dimension.index()]
    }

    pub fn left(&self, dimension: Dimension) -> u8 {
        100 - self.right(dimension)
    }

    pub fn breakdown(&self) -> [DimensionBreakdown; 4] {
        Dimension::ALL.map(|dimension| DimensionBreakdown {
            left: dimension.left_pole(),
            right: dimension.right_pole(),
            left_value: self.left(dimension),
            right_value: self.right(dimension),
        })
    }

    /// Rebuild scores from a persisted breakdown, if it is well formed.
    pub fn from_breakdown(breakdown: &[DimensionBreakdown; 4]) -> Option<Self> {
        let mut right = [0u8; 4];
        for (dimension, entry) in Dimension::ALL.into_iter().zip(breakdown) {
            let consistent = entry.left == dimension.left_pole()
                && entry.right == dimension.right_pole()
                && u16::from(entry.left_value) + u16::from(entry.right_value) == 100;
            if !consistent {
                return None;
            }
            right[dimension.index()] = entry.right_value;
        }
        Some(Self { right })
    }
}

/// Aggregate answers into per-axis scores.
///
/// Answers align positionally with `questions`. Extra answers are ignored and
/// unanswered trailing questions are skipped, so partial submissions score
/// whatever they cover.
pub fn score_answers(questions: &[Question], answers: &[i64]) -> DimensionScores {
    let mut tallies = [Tally::default(); 4];

    for (question, raw) in questions.iter().zip(answers) {
        let tally = &mut tallies[question.dimension.index()];
        tally.total += response_percentage(*raw, question.polarity);
        tally.count += 1;
    }

    let right = tallies.map(|tally| {
        if tally.count == 0 {
            None
        } else {
            let average = tally.total / f64::from(tally.count);
            Some(average.round().clamp(0.0, 100.0) as u8)
        }
    });

    DimensionScores { right }
}
