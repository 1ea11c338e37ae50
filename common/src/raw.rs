//! Loosely typed ledger values as they come back from a contract call.
//!
//! The ledger hands back integers as 256-bit words, which reach us either as
//! JSON integers or as decimal text. Normalization coerces them into the
//! strongly typed records in [`crate::listing`], [`crate::booking`] and
//! [`crate::review`].

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::money::Ether;

/// Errors from normalizing a raw ledger record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("field `{field}` is not a non-negative integer: {value}")]
    NotAnInteger { field: &'static str, value: String },
    #[error("field `{field}` does not fit: {value}")]
    OutOfRange { field: &'static str, value: String },
    #[error("field `{field}` is not an amount: {value}")]
    NotAnAmount { field: &'static str, value: String },
}

/// A numeric ledger word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Int(u64),
    Text(String),
}

impl RawNumber {
    pub fn to_u256(&self, field: &'static str) -> Result<U256, ShapeError> {
        match self {
            RawNumber::Int(n) => Ok(U256::from(*n)),
            RawNumber::Text(text) => {
                let text = text.trim();
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ShapeError::NotAnInteger {
                        field,
                        value: text.to_string(),
                    });
                }
                U256::from_str_radix(text, 10).map_err(|_| ShapeError::OutOfRange {
                    field,
                    value: text.to_string(),
                })
            }
        }
    }

    pub fn to_u64(&self, field: &'static str) -> Result<u64, ShapeError> {
        let wide = self.to_u256(field)?;
        u64::try_from(wide).map_err(|_| ShapeError::OutOfRange {
            field,
            value: wide.to_string(),
        })
    }

    pub fn to_u32(&self, field: &'static str) -> Result<u32, ShapeError> {
        let n = self.to_u64(field)?;
        u32::try_from(n).map_err(|_| ShapeError::OutOfRange {
            field,
            value: n.to_string(),
        })
    }

    /// Integer words are wei. Text with a decimal point is already an ether amount.
    pub fn to_ether(&self, field: &'static str) -> Result<Ether, ShapeError> {
        match self {
            RawNumber::Text(text) if text.contains('.') => {
                Ether::parse(text).map_err(|_| ShapeError::NotAnAmount {
                    field,
                    value: text.clone(),
                })
            }
            _ => self.to_u256(field).map(Ether::from_wei),
        }
    }
}

impl From<u64> for RawNumber {
    fn from(n: u64) -> Self {
        RawNumber::Int(n)
    }
}

impl From<U256> for RawNumber {
    fn from(n: U256) -> Self {
        match u64::try_from(n) {
            Ok(small) => RawNumber::Int(small),
            Err(_) => RawNumber::Text(n.to_string()),
        }
    }
}

/// Image references: the ledger stores them comma-joined in one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawImages {
    Joined(String),
    List(Vec<String>),
}

/// Delimiter between image references in the ledger's image field.
pub const IMAGE_DELIMITER: char = ',';

impl RawImages {
    /// Split into an ordered list. Empty segments are dropped.
    pub fn into_list(self) -> Vec<String> {
        match self {
            RawImages::Joined(joined) => joined
                .split(IMAGE_DELIMITER)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            RawImages::List(list) => list,
        }
    }
}

/// Join image references into the ledger's single-string form.
pub fn join_images(images: &[String]) -> String {
    images.join(&IMAGE_DELIMITER.to_string())
}

/// Normalize every record in `raw`, failing on the first malformed one.
pub fn normalize_all<R, T>(raw: Vec<R>) -> Result<Vec<T>, ShapeError>
where
    T: TryFrom<R, Error = ShapeError>,
{
    raw.into_iter().map(T::try_from).collect()
}
