//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::{Display, Into};

/// Whole percentage in the `[0, 100]` range.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, Into, Ord, PartialEq,
    PartialOrd,
)]
#[display("{_0}%")]
pub struct Percent(u8);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(0);

    /// Full hundred [`Percent`].
    pub const HUNDRED: Self = Self(100);

    /// Creates a new [`Percent`] by checking the provided value is not
    /// greater than `100`.
    #[must_use]
    pub fn new(val: u8) -> Option<Self> {
        (val <= 100).then_some(Self(val))
    }

    /// Creates a new [`Percent`] clamping the provided value into the
    /// `[0, 100]` range.
    ///
    /// `NaN` is treated as `0`.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped and rounded already"
    )]
    #[must_use]
    pub fn clamped(val: f64) -> Self {
        if val.is_nan() {
            return Self::ZERO;
        }
        Self(val.clamp(0.0, 100.0).round() as u8)
    }

    /// Returns the value of this [`Percent`].
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_end_matches('%')
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}
