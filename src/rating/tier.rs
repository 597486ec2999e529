//! Rating tiers and the two thresholds that define them
//!
//! | Rating | Tier |
//! |--------|------|
//! | `>= must_watch` | MustWatch |
//! | `>= consider`   | Consider  |
//! | otherwise       | Skip      |
//!
//! `must_watch` always stays at least 0.1 above `consider`. Whichever side is
//! being moved gets pushed back when it would cross the other.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CONSIDER: f64 = 7.0;
pub const DEFAULT_MUST_WATCH: f64 = 8.0;
pub const THRESHOLD_MIN: f64 = 5.0;
pub const THRESHOLD_MAX: f64 = 9.5;
/// Smallest allowed distance between the thresholds
pub const MIN_GAP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    MustWatch,
    Consider,
    Skip,
}

impl Tier {
    /// CSS class used by the heatmap cells.
    pub fn css_class(&self) -> &'static str {
        match self {
            Tier::MustWatch => "excellent",
            Tier::Consider => "good",
            Tier::Skip => "average",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::MustWatch => write!(f, "MUST-WATCH"),
            Tier::Consider => write!(f, "CONSIDER"),
            Tier::Skip => write!(f, "SKIP"),
        }
    }
}

pub fn classify(rating: f64, consider: f64, must_watch: f64) -> Tier {
    if rating >= must_watch {
        Tier::MustWatch
    } else if rating >= consider {
        Tier::Consider
    } else {
        Tier::Skip
    }
}

/// Which of the two thresholds a control moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slider {
    Consider,
    MustWatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    consider: f64,
    must_watch: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            consider: DEFAULT_CONSIDER,
            must_watch: DEFAULT_MUST_WATCH,
        }
    }
}

impl Thresholds {
    /// Build from two values, pushing `must_watch` up if they are out of order.
    pub fn new(consider: f64, must_watch: f64) -> Self {
        let mut t = Self { consider, must_watch };
        t.enforce_gap_above();
        t
    }

    pub fn consider(&self) -> f64 {
        self.consider
    }

    pub fn must_watch(&self) -> f64 {
        self.must_watch
    }

    pub fn classify(&self, rating: f64) -> Tier {
        classify(rating, self.consider, self.must_watch)
    }

    /// Whether a value may be taken from a URL parameter.
    pub fn in_range(value: f64) -> bool {
        value.is_finite() && (THRESHOLD_MIN..=THRESHOLD_MAX).contains(&value)
    }

    /// Move `consider`; if it reaches `must_watch` it is held 0.1 below.
    pub fn set_consider(&mut self, value: f64) {
        if value >= self.must_watch {
            self.consider = round_tenth(self.must_watch - MIN_GAP);
        } else {
            self.consider = value;
        }
    }

    /// Move `must_watch`; if it drops to `consider` it is held 0.1 above.
    pub fn set_must_watch(&mut self, value: f64) {
        self.must_watch = value;
        self.enforce_gap_above();
    }

    pub fn set(&mut self, slider: Slider, value: f64) {
        match slider {
            Slider::Consider => self.set_consider(value),
            Slider::MustWatch => self.set_must_watch(value),
        }
    }

    fn enforce_gap_above(&mut self) {
        if self.must_watch <= self.consider {
            self.must_watch = round_tenth(self.consider + MIN_GAP);
        }
    }
}

// Slider steps are tenths; keep 7.0 + 0.1 from drifting to 7.1000000000000005
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==========================================================================
    // CLASSIFICATION
    // ==========================================================================
    //
    // For any consider < must_watch:
    //   rating >= must_watch              -> MustWatch
    //   consider <= rating < must_watch   -> Consider
    //   rating < consider                 -> Skip
    // ==========================================================================

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(8.0, 7.0, 8.0), Tier::MustWatch);
        assert_eq!(classify(7.99, 7.0, 8.0), Tier::Consider);
        assert_eq!(classify(7.0, 7.0, 8.0), Tier::Consider);
        assert_eq!(classify(6.99, 7.0, 8.0), Tier::Skip);
        assert_eq!(classify(0.0, 7.0, 8.0), Tier::Skip);
        assert_eq!(classify(10.0, 7.0, 8.0), Tier::MustWatch);
    }

    #[test]
    fn test_classify_sweep() {
        let pairs = [(5.0, 5.1), (6.5, 8.0), (7.0, 9.5), (9.4, 9.5)];
        for &(c, m) in &pairs {
            for step in 0..=100 {
                let r = step as f64 / 10.0;
                let tier = classify(r, c, m);
                assert_eq!(tier == Tier::MustWatch, r >= m, "r={} c={} m={}", r, c, m);
                assert_eq!(tier == Tier::Consider, c <= r && r < m, "r={} c={} m={}", r, c, m);
                assert_eq!(tier == Tier::Skip, r < c, "r={} c={} m={}", r, c, m);
            }
        }
    }

    #[test]
    fn test_method_matches_function() {
        let t = Thresholds::default();
        for r in [6.0, 7.0, 7.5, 8.0, 9.0] {
            assert_eq!(t.classify(r), classify(r, 7.0, 8.0));
        }
    }

    // ==========================================================================
    // THRESHOLD ORDERING
    // ==========================================================================

    #[test]
    fn test_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.consider(), 7.0);
        assert_eq!(t.must_watch(), 8.0);
    }

    #[test]
    fn test_must_watch_pushed_above_consider() {
        let mut t = Thresholds::default();
        t.set_must_watch(6.5);
        assert!(approx(t.must_watch(), 7.1));
        assert_eq!(t.consider(), 7.0);

        t.set_must_watch(7.0);
        assert!(approx(t.must_watch(), 7.1));
    }

    #[test]
    fn test_consider_held_below_must_watch() {
        let mut t = Thresholds::default();
        t.set_consider(9.0);
        assert!(approx(t.consider(), 7.9));
        assert_eq!(t.must_watch(), 8.0);

        t.set_consider(8.0);
        assert!(approx(t.consider(), 7.9));
    }

    #[test]
    fn test_valid_moves_untouched() {
        let mut t = Thresholds::default();
        t.set_consider(6.2);
        t.set_must_watch(9.3);
        assert_eq!(t.consider(), 6.2);
        assert_eq!(t.must_watch(), 9.3);
    }

    #[test]
    fn test_set_by_slider() {
        let mut t = Thresholds::default();
        t.set(Slider::MustWatch, 5.0);
        assert!(approx(t.must_watch(), 7.1));
        t.set(Slider::Consider, 7.5);
        assert!(approx(t.consider(), 7.0));
    }

    #[test]
    fn test_new_enforces_order() {
        let t = Thresholds::new(9.0, 8.0);
        assert_eq!(t.consider(), 9.0);
        assert!(approx(t.must_watch(), 9.1));
    }

    #[test]
    fn test_in_range() {
        assert!(Thresholds::in_range(5.0));
        assert!(Thresholds::in_range(9.5));
        assert!(!Thresholds::in_range(4.9));
        assert!(!Thresholds::in_range(9.6));
        assert!(!Thresholds::in_range(f64::NAN));
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(Tier::MustWatch.css_class(), "excellent");
        assert_eq!(Tier::Skip.to_string(), "SKIP");
        assert_eq!(serde_json::to_string(&Tier::MustWatch).unwrap(), "\"must_watch\"");
    }
}
