use serde::{Deserialize, Serialize};

/// Fraction of the total route distance already traversed, always in `[0, 1]`.
///
/// Every consumer in the crate takes this type; percentages are converted
/// exactly once, in [`Progress::from_percent`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Progress(f64);

impl Progress {
    pub const START: Progress = Progress(0.0);
    pub const END: Progress = Progress(1.0);

    pub fn new(fraction: f64) -> Self {
        if fraction.is_nan() {
            return Self::START;
        }
        Self(fraction.clamp(0.0, 1.0))
    }

    pub fn from_percent(percent: f64) -> Self {
        Self::new(percent / 100.0)
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl From<f64> for Progress {
    fn from(fraction: f64) -> Self {
        Self::new(fraction)
    }
}

impl From<Progress> for f64 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}
