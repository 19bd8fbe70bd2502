use serde::{Deserialize, Serialize};
use std::fmt;

/// Stake value in indivisible base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StakeAmount(u64);

impl StakeAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_units(units: u64) -> Self {
        Self(units)
    }

    pub fn to_units(&self) -> u64 {
        self.0
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Truncating percentage, computed in 128-bit space to avoid overflow.
    pub fn percent(&self, pct: u64) -> Self {
        Self((self.0 as u128 * pct as u128 / 100) as u64)
    }
}

impl fmt::Display for StakeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        let a = StakeAmount::from_units(100);
        let b = StakeAmount::from_units(30);

        assert_eq!(a.checked_add(b), Some(StakeAmount::from_units(130)));
        assert_eq!(a.checked_sub(b), Some(StakeAmount::from_units(70)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(
            StakeAmount::from_units(u64::MAX).checked_add(StakeAmount::from_units(1)),
            None
        );
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(
            StakeAmount::from_units(1_000_000).percent(5),
            StakeAmount::from_units(50_000)
        );
        // 99 * 5 / 100 = 4.95 -> 4
        assert_eq!(StakeAmount::from_units(99).percent(5), StakeAmount::from_units(4));
        // Large stakes must not overflow the intermediate product
        assert_eq!(
            StakeAmount::from_units(u64::MAX).percent(100),
            StakeAmount::from_units(u64::MAX)
        );
    }
}
