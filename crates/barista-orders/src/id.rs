//! Order identifiers derived from the creation timestamp.

use std::fmt;
use std::str::FromStr;

const ID_PREFIX: &str = "order_";
const FILE_EXTENSION: &str = ".json";

/// Identifies a stored order by its creation second plus a sequence number
/// that disambiguates orders created within the same second.
///
/// Ordering compares the second first, then the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId {
    /// Creation time, in seconds since the Unix epoch.
    pub unix_seconds: u64,
    /// Zero for the first order in a second.
    pub seq: u32,
}

impl OrderId {
    pub fn new(unix_seconds: u64, seq: u32) -> Self {
        Self { unix_seconds, seq }
    }

    /// Returns the file name this order is stored under.
    pub fn file_name(&self) -> String {
        format!("{self}{FILE_EXTENSION}")
    }

    /// Parses a store file name such as `order_1700000000.json`.
    ///
    /// Returns `None` for anything that is not an order file.
    pub fn from_file_name(name: &str) -> Option<Self> {
        name.strip_suffix(FILE_EXTENSION)?.parse().ok()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seq == 0 {
            write!(f, "{ID_PREFIX}{}", self.unix_seconds)
        } else {
            write!(f, "{ID_PREFIX}{}_{}", self.unix_seconds, self.seq)
        }
    }
}

impl FromStr for OrderId {
    type Err = ParseOrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseOrderIdError(s.to_string());
        let rest = s.strip_prefix(ID_PREFIX).ok_or_else(err)?;
        let (secs, seq) = match rest.split_once('_') {
            Some((secs, seq)) => (secs, Some(seq)),
            None => (rest, None),
        };
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

        if !all_digits(secs) {
            return Err(err());
        }
        let unix_seconds = secs.parse().map_err(|_| err())?;
        let seq = match seq {
            Some(seq) if all_digits(seq) => match seq.parse() {
                Ok(0) | Err(_) => return Err(err()),
                Ok(n) => n,
            },
            Some(_) => return Err(err()),
            None => 0,
        };
        Ok(Self { unix_seconds, seq })
    }
}

/// Error returned when a string is not a valid order identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOrderIdError(pub String);

impl fmt::Display for ParseOrderIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid order identifier: {}", self.0)
    }
}

impl std::error::Error for ParseOrderIdError {}
