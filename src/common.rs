use std::fmt::{self, Write};
pub use vec1::vec1;

pub type Int = i64;

pub type Float = f64;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// How a [DiceInterpretation](crate::DiceInterpretation) turns its faces into a single number.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReturnFunction {
    Sum,
    Max,
    Min,
    #[default]
    None,
    Id,
    Threshold,
    /// Sum of the faces at the given 1-based ranks of the ascending sort.
    Select(NonEmpty<Int>),
}

impl ReturnFunction {
    pub fn from_suffix(c: char) -> Option<Self> {
        Some(match c {
            'g' => Self::Sum,
            'h' => Self::Max,
            'l' => Self::Min,
            '~' => Self::None,
            '=' => Self::Id,
            _ => return None,
        })
    }

    pub const fn is_selector(&self) -> bool {
        matches!(self, Self::Select(_))
    }
}

impl fmt::Display for ReturnFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
            Self::None => "none",
            Self::Id => "id",
            Self::Threshold => "threshold",
            Self::Select(ranks) => {
                let ranks: Vec<_> = ranks.iter().map(ToString::to_string).collect();
                return write!(f, "{}@", ranks.join(","));
            }
        };
        f.write_str(s)
    }
}

/// The amount part of a dice code.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Amount {
    /// Roll this many dice. Negative counts negate the result.
    Count(Int),
    /// Use these faces instead of rolling.
    Literal(Vec<Int>),
    /// Reuse the faces of the n-th most recent roll (1 is the latest).
    BackReference(usize),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => fmt::Display::fmt(n, f),
            Self::Literal(faces) => {
                f.write_char('[')?;
                for (i, face) in faces.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{}", face)?;
                }
                f.write_char(']')
            }
            Self::BackReference(n) => {
                for _ in 0..*n {
                    f.write_char('-')?;
                }
                Ok(())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(ReturnFunction::from_suffix('g'), Some(ReturnFunction::Sum));
        assert_eq!(ReturnFunction::from_suffix('='), Some(ReturnFunction::Id));
        assert_eq!(ReturnFunction::from_suffix('x'), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ReturnFunction::Select(vec1![1, 2]).to_string(), "1,2@");
        assert_eq!(Amount::Literal(vec![1, 1, 9]).to_string(), "[1,1,9]");
        assert_eq!(Amount::BackReference(3).to_string(), "---");
        assert_eq!(Amount::Count(-4).to_string(), "-4");
    }
}
