use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::super::domain::Dimension;
use super::rules::AxisScores;

/// Four-letter personality code, one pole per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TypeCode([char; 4]);

impl TypeCode {
    pub fn letters(&self) -> [char; 4] {
        self.0
    }

    pub fn pole(&self, dimension: Dimension) -> char {
        self.0[dimension.index()]
    }

    /// Every code the classifier can produce, in lexical axis order.
    pub fn all() -> Vec<TypeCode> {
        let mut codes = Vec::with_capacity(16);
        for bits in 0u8..16 {
            let letters = Dimension::ALL.map(|dimension| {
                if bits & (0b1000 >> dimension.index()) == 0 {
                    dimension.left_pole()
                } else {
                    dimension.right_pole()
                }
            });
            codes.push(TypeCode(letters));
        }
        codes
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.0 {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

impl FromStr for TypeCode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let letters: Vec<char> = value.trim().chars().collect();
        if letters.len() != 4 {
            return Err(format!("type code '{value}' must have four letters"));
        }

        let mut code = ['?'; 4];
        for dimension in Dimension::ALL {
            let letter = letters[dimension.index()].to_ascii_uppercase();
            if letter != dimension.left_pole() && letter != dimension.right_pole() {
                return Err(format!(
                    "'{letter}' is not a pole of the {dimension} dimension"
                ));
            }
            code[dimension.index()] = letter;
        }
        Ok(TypeCode(code))
    }
}

impl From<TypeCode> for String {
    fn from(value: TypeCode) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TypeCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Pole chosen for a single axis.
///
/// The right pole needs a strict majority; an exact 50/50 split resolves to
/// the left pole (E, S, T, J).
pub fn pole_for(dimension: Dimension, right_value: u8) -> char {
    if right_value > 50 {
        dimension.right_pole()
    } else {
        dimension.left_pole()
    }
}

/// Derive the type code. Each axis is decided independently.
pub fn classify(scores: &AxisScores) -> TypeCode {
    TypeCode(Dimension::ALL.map(|dimension| pole_for(dimension, scores.right(dimension))))
}
