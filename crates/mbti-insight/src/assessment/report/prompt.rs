use std::cmp::Ordering;

use super::super::domain::Dimension;
use super::super::scoring::{AxisScores, TypeCode};

struct Section {
    class: &'static str,
    title: &'static str,
    items: &'static [&'static str],
}

const SECTIONS: &[Section] = &[
    Section {
        class: "core-traits",
        title: "Core traits",
        items: &["Dominant cognitive functions", "Thinking style", "Behavioral tendencies"],
    },
    Section {
        class: "relationships",
        title: "Interpersonal relationships",
        items: &[
            "Communication style",
            "How they engage with others",
            "Role within a team",
            "Ideal social environment",
        ],
    },
    Section {
        class: "career",
        title: "Career insights",
        items: &[
            "Best-suited work environment",
            "Professional strengths",
            "Potential career challenges",
            "Ideal career directions",
        ],
    },
    Section {
        class: "growth",
        title: "Personal growth",
        items: &[
            "Skills to develop",
            "Potential blind spots",
            "Stress management",
            "Directions for self-improvement",
        ],
    },
    Section {
        class: "strengths-weaknesses",
        title: "Strengths and weaknesses",
        items: &[
            "Core strengths",
            "Potential weaknesses",
            "Making the most of strengths",
            "Overcoming weaknesses",
        ],
    },
    Section {
        class: "love-relationships",
        title: "Romantic relationships",
        items: &[
            "Behavior in a relationship",
            "Ideal partner traits",
            "How they relate to a partner",
            "Keeping the relationship healthy",
        ],
    },
    Section {
        class: "friendships",
        title: "Friendships",
        items: &[
            "How they make friends",
            "Ideal kind of friendship",
            "Maintaining friendships",
            "Advice for their social circle",
        ],
    },
    Section {
        class: "parenting",
        title: "Parenting",
        items: &[
            "Educational philosophy",
            "Parent-child interaction style",
            "Possible parenting challenges",
            "Parenting advice",
        ],
    },
    Section {
        class: "work-habits",
        title: "Work habits",
        items: &[
            "Preferred work pace",
            "Task management",
            "Workspace needs",
            "Productivity tips",
        ],
    },
];

fn strength(percent: u8) -> &'static str {
    match percent {
        0..=59 => "slight",
        60..=74 => "moderate",
        75..=89 => "clear",
        _ => "very clear",
    }
}

/// One line per axis naming the dominant pole and how strongly it leads.
pub fn describe_axis(dimension: Dimension, scores: &AxisScores) -> String {
    let (left, right) = (dimension.left_pole(), dimension.right_pole());
    let (left_value, right_value) = (scores.left(dimension), scores.right(dimension));

    match left_value.cmp(&right_value) {
        Ordering::Greater => format!(
            "{left} vs {right}: {} preference for {left} ({left_value}%)",
            strength(left_value)
        ),
        Ordering::Less => format!(
            "{left} vs {right}: {} preference for {right} ({right_value}%)",
            strength(right_value)
        ),
        Ordering::Equal => format!("{left} vs {right}: balanced ({left_value}% / {right_value}%)"),
    }
}

fn report_layout() -> String {
    let mut layout = String::from("<div class=\"mbti-report\">\n");
    for section in SECTIONS {
        layout.push_str(&format!(
            "  <section class=\"{}\">\n    <h2>{}</h2>\n    <ul>\n",
            section.class, section.title
        ));
        for item in section.items {
            layout.push_str(&format!(
                "      <li><strong>{item}:</strong> [content]</li>\n"
            ));
        }
        layout.push_str("    </ul>\n  </section>\n");
    }
    layout.push_str("</div>");
    layout
}

/// Prompt asking the provider for an HTML report tailored to the scores.
pub fn build_prompt(type_code: &TypeCode, scores: &AxisScores) -> String {
    let leanings: Vec<String> = Dimension::ALL
        .into_iter()
        .map(|dimension| describe_axis(dimension, scores))
        .collect();

    let layout = report_layout();

    format!(
        "From a professional psychological perspective, write a comprehensive analysis of the \
         MBTI type {type_code}, organized with HTML tags. The user's measured preferences on each \
         dimension are:\n\n{}\n\nUse exactly this HTML structure:\n\n{layout}\n\nFill every \
         [content] placeholder in plain, professional language. Tailor the advice to how strong \
         each preference is: treat slight preferences as flexible and very clear ones as defining. \
         Return only well-formed HTML that can be embedded directly in a web page.",
        leanings.join("\n")
    )
}
