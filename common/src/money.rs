use std::fmt;
use std::str::FromStr;

use alloy_primitives::utils::{format_ether, parse_ether};
use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of fractional digits between ether and wei.
pub const ETHER_DECIMALS: usize = 18;

/// 1 ether = 10^18 wei.
pub const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Errors from converting display amounts to wei.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative: {0}")]
    Negative(String),
    #[error("amount has more than 18 fractional digits: {0}")]
    TooPrecise(String),
    #[error("malformed amount: {0}")]
    Malformed(String),
}

/// A currency amount. Stored internally in wei, displayed in ether.
///
/// Conversions in both directions are exact: any decimal with at most
/// [`ETHER_DECIMALS`] fractional digits maps to exactly one wei value and back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ether(U256);

impl Ether {
    pub const ZERO: Ether = Ether(U256::ZERO);

    pub fn from_wei(wei: U256) -> Self {
        Ether(wei)
    }

    /// Whole ether units.
    pub fn from_ether(whole: u64) -> Self {
        Ether(U256::from(whole) * U256::from(WEI_PER_ETHER))
    }

    pub fn wei(self) -> U256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Parse a decimal ether amount such as `"0.5"` or `"12"`.
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AmountError::Empty);
        }
        if text.starts_with('-') {
            return Err(AmountError::Negative(text.to_string()));
        }
        let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
        let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !digits(whole) || !digits(frac) {
            return Err(AmountError::Malformed(text.to_string()));
        }
        if frac.len() > ETHER_DECIMALS {
            return Err(AmountError::TooPrecise(text.to_string()));
        }
        let whole = if whole.is_empty() { "0" } else { whole };
        let frac = if frac.is_empty() { "0" } else { frac };
        parse_ether(&format!("{whole}.{frac}"))
            .map(Ether)
            .map_err(|e| AmountError::Malformed(format!("{text}: {e}")))
    }

    pub fn checked_add(self, other: Ether) -> Option<Ether> {
        self.0.checked_add(other.0).map(Ether)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Ether> {
        self.0.checked_mul(U256::from(factor)).map(Ether)
    }

    /// `percent`% of this amount, truncated to whole wei.
    pub fn percent(self, percent: u64) -> Option<Ether> {
        self.0
            .checked_mul(U256::from(percent))
            .map(|v| Ether(v / U256::from(100u64)))
    }
}

/// Payment the contract expects for booking `nights` dates at `price` per night:
/// the rent plus the security fee (a percentage of the rent).
pub fn quote_booking(price: Ether, nights: u64, fee_percent: u64) -> Option<Ether> {
    let rent = price.checked_mul(nights)?;
    rent.checked_add(rent.percent(fee_percent)?)
}

impl fmt::Display for Ether {
    /// Canonical decimal form: trailing zeros trimmed, at least one fractional digit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format_ether(self.0);
        let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{whole}.0")
        } else {
            write!(f, "{whole}.{frac}")
        }
    }
}

impl FromStr for Ether {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ether::parse(s)
    }
}

impl Serialize for Ether {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ether {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ether::parse(&text).map_err(serde::de::Error::custom)
    }
}
