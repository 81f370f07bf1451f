use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Labels for the fixed 7-point response scale, lowest agreement first.
pub const RESPONSE_OPTIONS: [&str; 7] = [
    "Strongly disagree",
    "Disagree",
    "Somewhat disagree",
    "Neutral",
    "Somewhat agree",
    "Agree",
    "Strongly agree",
];

/// One of the four bipolar personality axes.
///
/// Each axis has a left pole and a right pole; scores are expressed as the
/// percentage leaning towards the right pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Extraversion (E) vs Introversion (I).
    #[serde(rename = "EI")]
    Energy,
    /// Sensing (S) vs Intuition (N).
    #[serde(rename = "SN")]
    Perception,
    /// Thinking (T) vs Feeling (F).
    #[serde(rename = "TF")]
    Judgment,
    /// Judging (J) vs Perceiving (P).
    #[serde(rename = "JP")]
    Lifestyle,
}

impl Dimension {
    /// All axes in type-code order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Energy,
        Dimension::Perception,
        Dimension::Judgment,
        Dimension::Lifestyle,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Dimension::Energy => "EI",
            Dimension::Perception => "SN",
            Dimension::Judgment => "TF",
            Dimension::Lifestyle => "JP",
        }
    }

    pub const fn left_pole(self) -> char {
        match self {
            Dimension::Energy => 'E',
            Dimension::Perception => 'S',
            Dimension::Judgment => 'T',
            Dimension::Lifestyle => 'J',
        }
    }

    pub const fn right_pole(self) -> char {
        match self {
            Dimension::Energy => 'I',
            Dimension::Perception => 'N',
            Dimension::Judgment => 'F',
            Dimension::Lifestyle => 'P',
        }
    }

    /// Position of the axis inside the type code.
    pub const fn index(self) -> usize {
        match self {
            Dimension::Energy => 0,
            Dimension::Perception => 1,
            Dimension::Judgment => 2,
            Dimension::Lifestyle => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EI" => Ok(Dimension::Energy),
            "SN" => Ok(Dimension::Perception),
            "TF" => Ok(Dimension::Judgment),
            "JP" => Ok(Dimension::Lifestyle),
            other => Err(format!("unknown dimension '{other}'")),
        }
    }
}

/// Whether agreeing with a question moves the score towards the right pole
/// (forward) or towards the left pole (reverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Forward,
    Reverse,
}

impl Polarity {
    /// Decode the catalog's signed direction column (`1` forward, `-1` reverse).
    pub const fn from_direction(direction: i64) -> Option<Self> {
        match direction {
            1 => Some(Polarity::Forward),
            -1 => Some(Polarity::Reverse),
            _ => None,
        }
    }

    pub const fn direction(self) -> i64 {
        match self {
            Polarity::Forward => 1,
            Polarity::Reverse => -1,
        }
    }
}

/// Catalog partition a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Simple,
    Detailed,
    Full,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Simple => "simple",
            Tier::Detailed => "detailed",
            Tier::Full => "full",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Tier::Simple),
            "detailed" => Ok(Tier::Detailed),
            "full" => Ok(Tier::Full),
            other => Err(format!("unknown tier '{other}'")),
        }
    }
}

/// Requested test depth. Each depth includes every shallower tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestDepth {
    #[default]
    Simple,
    Detailed,
    Full,
}

impl TestDepth {
    pub const fn tiers(self) -> &'static [Tier] {
        match self {
            TestDepth::Simple => &[Tier::Simple],
            TestDepth::Detailed => &[Tier::Simple, Tier::Detailed],
            TestDepth::Full => &[Tier::Simple, Tier::Detailed, Tier::Full],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TestDepth::Simple => "simple",
            TestDepth::Detailed => "detailed",
            TestDepth::Full => "full",
        }
    }
}

impl FromStr for TestDepth {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" => Err(ValidationError::MissingTestDepth),
            "simple" => Ok(TestDepth::Simple),
            "detailed" => Ok(TestDepth::Detailed),
            "full" => Ok(TestDepth::Full),
            other => Err(ValidationError::UnknownTestDepth(other.to_string())),
        }
    }
}

/// A catalog question annotated with its scoring metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub dimension: Dimension,
    pub polarity: Polarity,
    pub tier: Tier,
}

impl Question {
    /// Client-facing projection; scoring metadata stays server side.
    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id,
            question: self.prompt.clone(),
            options: RESPONSE_OPTIONS.to_vec(),
        }
    }
}

/// Question as delivered to respondents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: u32,
    pub question: String,
    pub options: Vec<&'static str>,
}

/// Identifier wrapper for stored results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub String);

impl ResultId {
    /// Fresh, globally unique identifier.
    pub fn generate() -> Self {
        Self(format!("result_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One axis of a result as exposed to clients and persisted with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionBreakdown {
    pub left: char,
    pub right: char,
    pub left_value: u8,
    pub right_value: u8,
}

/// Rejected input, reported back to the caller as a client fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("test type must be provided")]
    MissingTestDepth,
    #[error("unknown test type '{0}' (expected simple, detailed, or full)")]
    UnknownTestDepth(String),
    #[error("answer list must not be empty")]
    EmptyAnswers,
    #[error("no answers were given for the {0} dimension")]
    UnansweredDimension(Dimension),
}
