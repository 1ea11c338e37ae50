use crate::error::ClientError;

/// An identifier argument as handed in by a caller: either already numeric or
/// text taken from a route or a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    /// Accepts non-negative base-10 integers only (surrounding whitespace allowed).
    pub fn validate(&self) -> Result<u64, ClientError> {
        match self {
            RawId::Number(n) => Ok(*n),
            RawId::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ClientError::InvalidId(text.clone()));
                }
                trimmed
                    .parse::<u64>()
                    .map_err(|_| ClientError::InvalidId(text.clone()))
            }
        }
    }
}

impl From<u64> for RawId {
    fn from(n: u64) -> Self {
        RawId::Number(n)
    }
}

impl From<u32> for RawId {
    fn from(n: u32) -> Self {
        RawId::Number(n.into())
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        RawId::Text(s.to_string())
    }
}

impl From<String> for RawId {
    fn from(s: String) -> Self {
        RawId::Text(s)
    }
}

impl From<&String> for RawId {
    fn from(s: &String) -> Self {
        RawId::Text(s.clone())
    }
}
