use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Computed technical/cultural/behavioral compatibility snapshot, embedded
/// in the candidate record. Component scores are integers in [0, 100];
/// `overall_score` is always `round_half_up(mean of the three)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    pub technical_score: u8,
    pub cultural_score: u8,
    pub behavioral_score: u8,
    pub overall_score: u8,
    pub ai_analysis: String,
    pub calculated_at: DateTime<Utc>,
}

/// Round-half-up mean of the three component scores. This is the
/// load-bearing aggregation contract; scorers may change, this must not.
pub fn overall_score(technical: u8, cultural: u8, behavioral: u8) -> u8 {
    let sum = technical as u32 + cultural as u32 + behavioral as u32;
    // f64::round rounds half away from zero, which is half-up for
    // non-negative input.
    (sum as f64 / 3.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_is_rounded_half_up() {
        assert_eq!(overall_score(85, 90, 88), 88); // 87.67
        assert_eq!(overall_score(70, 70, 71), 70); // 70.33
        assert_eq!(overall_score(0, 0, 1), 0); // 0.33
        assert_eq!(overall_score(1, 1, 2), 1); // 1.33
        assert_eq!(overall_score(50, 50, 51), 50); // 50.33
        assert_eq!(overall_score(50, 51, 51), 51); // 50.67
        assert_eq!(overall_score(0, 0, 0), 0);
        assert_eq!(overall_score(100, 100, 100), 100);
        // exact .5 rounds up
        assert_eq!(overall_score(1, 2, 3), 2); // 2.0
        assert_eq!(overall_score(0, 1, 2), 1); // 1.0
    }

    #[test]
    fn overall_holds_for_every_component_triple() {
        for t in (0..=100).step_by(10) {
            for c in (0..=100).step_by(10) {
                for b in (0..=100).step_by(10) {
                    let overall = overall_score(t, c, b);
                    let expected =
                        ((t as f64 + c as f64 + b as f64) / 3.0).round() as u8;
                    assert_eq!(overall, expected);
                    assert!(overall <= 100);
                }
            }
        }
    }
}
