use std::collections::BTreeSet;

use crate::assessment::domain::Dimension;
use crate::assessment::scoring::{classify, pole_for, AxisScores, TypeCode};

#[test]
fn exact_ties_resolve_to_the_left_pole() {
    let code = classify(&AxisScores::new([50; 4]));
    assert_eq!(code.to_string(), "ESTJ");
}

#[test]
fn strict_majority_selects_the_right_pole() {
    assert_eq!(classify(&AxisScores::new([51; 4])).to_string(), "INFP");
    assert_eq!(classify(&AxisScores::new([49; 4])).to_string(), "ESTJ");
    assert_eq!(classify(&AxisScores::new([80, 20, 65, 35])).to_string(), "ISFJ");
}

#[test]
fn axes_are_decided_independently() {
    for dimension in Dimension::ALL {
        let mut right = [0u8; 4];
        right[dimension.index()] = 100;
        let code = classify(&AxisScores::new(right));

        for other in Dimension::ALL {
            let expected = if other == dimension {
                other.right_pole()
            } else {
                other.left_pole()
            };
            assert_eq!(code.pole(other), expected);
        }
    }
}

#[test]
fn every_score_combination_yields_one_of_sixteen_codes() {
    let known: BTreeSet<String> = TypeCode::all().iter().map(ToString::to_string).collect();
    assert_eq!(known.len(), 16);

    let samples = [0u8, 25, 50, 51, 75, 100];
    let mut seen = BTreeSet::new();
    for a in samples {
        for b in samples {
            for c in samples {
                for d in samples {
                    let scores = AxisScores::new([a, b, c, d]);
                    let code = classify(&scores);
                    assert_eq!(code, classify(&scores));
                    assert!(known.contains(&code.to_string()));
                    seen.insert(code.to_string());
                }
            }
        }
    }
    assert_eq!(seen, known);
}

#[test]
fn pole_for_uses_the_axis_letters() {
    assert_eq!(pole_for(Dimension::Perception, 90), 'N');
    assert_eq!(pole_for(Dimension::Perception, 10), 'S');
    assert_eq!(pole_for(Dimension::Lifestyle, 50), 'J');
}

#[test]
fn type_codes_parse_case_insensitively() {
    let code: TypeCode = "enfp".parse().expect("valid code");
    assert_eq!(code.letters(), ['E', 'N', 'F', 'P']);
    assert_eq!(code.to_string(), "ENFP");
}

#[test]
fn invalid_type_codes_are_rejected() {
    assert!("ENF".parse::<TypeCode>().is_err());
    assert!("ENFPX".parse::<TypeCode>().is_err());
    assert!("XNFP".parse::<TypeCode>().is_err());
    assert!("NEFP".parse::<TypeCode>().is_err());
}

#[test]
fn type_codes_serialize_as_strings() {
    let code: TypeCode = "INTJ".parse().expect("valid code");
    let json = serde_json::to_value(code).expect("serialize");
    assert_eq!(json, serde_json::json!("INTJ"));

    let back: TypeCode = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, code);
    assert!(serde_json::from_value::<TypeCode>(serde_json::json!("ABCD")).is_err());
}
