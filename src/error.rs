use crate::arith::ArithError;

/// Shown alongside every dice code that fails to extract.
pub const USAGE: &str = "[<Selectors>@]<dice>[d<sides>[R<rerolls>][s][ef<difficulty>ghl][!!!]]";

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RollError {
    #[error("{0}")]
    Descriptive(String),
    #[error("{message}\nusage: {}", USAGE)]
    Usage { message: String },
    #[error("{key} given by both {first} and {second}\nusage: {}", USAGE)]
    Conflict {
        key: &'static str,
        first: &'static str,
        second: &'static str,
    },
    #[error("unmatched {delimiter:?} at position {position}")]
    UnmatchedDelimiter { delimiter: char, position: usize },
    #[error("unknown trigger {0:?}")]
    UnknownTrigger(String),
    #[error("nesting deeper than {limit}")]
    RecursionLimit { limit: usize },
    #[error("more than {limit} define expansions")]
    ExpansionLimit { limit: usize },
    #[error("too many dice rolled")]
    TooManyRolls,
    #[error("{0}")]
    Arith(#[from] ArithError),
}

/// The two ways a front end presents a failed roll.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorCategory {
    /// A message meant to be shown to the user as is.
    Descriptive,
    /// Malformed dice code. The message carries [USAGE].
    Usage,
}

impl RollError {
    pub fn descriptive(msg: impl ToString) -> Self {
        Self::Descriptive(msg.to_string())
    }

    pub fn usage(msg: impl ToString) -> Self {
        Self::Usage {
            message: msg.to_string(),
        }
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Usage { .. } | Self::Conflict { .. } => ErrorCategory::Usage,
            _ => ErrorCategory::Descriptive,
        }
    }
}

/// A finished value, or a message that ends the whole roll early.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    ShortCircuit(String),
}

impl<T> Outcome<T> {
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(x) => Some(x),
            Self::ShortCircuit(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Done(_) => None,
            Self::ShortCircuit(msg) => Some(msg),
        }
    }
}

pub type RResult<T> = Result<Outcome<T>, RollError>;

/// Unwraps a [RResult], returning early on errors and short circuits alike.
macro_rules! proceed {
    ($e:expr) => {
        match $e? {
            $crate::error::Outcome::Done(value) => value,
            $crate::error::Outcome::ShortCircuit(msg) => {
                return Ok($crate::error::Outcome::ShortCircuit(msg))
            }
        }
    };
}

pub(crate) use proceed;

#[cfg(test)]
mod tests {
    use super::*;

    fn halve(x: i64) -> RResult<i64> {
        if x % 2 == 0 {
            Ok(Outcome::Done(x / 2))
        } else {
            Ok(Outcome::ShortCircuit(format!("{} is odd", x)))
        }
    }

    fn quarter(x: i64) -> RResult<i64> {
        let half = proceed!(halve(x));
        halve(half)
    }

    #[test]
    fn test_proceed() {
        assert_eq!(quarter(12), Ok(Outcome::Done(3)));
        assert_eq!(quarter(6), Ok(Outcome::ShortCircuit("3 is odd".to_string())));
        assert_eq!(quarter(5).unwrap().message(), Some("5 is odd"));
    }

    #[test]
    fn test_category() {
        assert_eq!(RollError::usage("bad").category(), ErrorCategory::Usage);
        assert_eq!(RollError::TooManyRolls.category(), ErrorCategory::Descriptive);
        assert!(RollError::usage("bad").to_string().contains(USAGE));
    }
}
