use super::super::domain::Polarity;

pub const SCALE_MIN: i64 = 1;
pub const SCALE_MAX: i64 = 7;

/// Pull a raw response into the 1..=7 scale.
pub fn clamp_response(raw: i64) -> i64 {
    raw.clamp(SCALE_MIN, SCALE_MAX)
}

/// Linear mapping of a response onto 0..=100, oriented by polarity.
///
/// Forward questions map the minimum response to 0 and the maximum to 100;
/// reverse questions run the other way.
pub fn response_percentage(raw: i64, polarity: Polarity) -> f64 {
    let answer = clamp_response(raw);
    let span = (SCALE_MAX - SCALE_MIN) as f64;
    let position = (answer - SCALE_MIN) as f64 * (100.0 / span);

    match polarity {
        Polarity::Forward => position,
        Polarity::Reverse => 100.0 - position,
    }
}
