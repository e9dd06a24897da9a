use crate::error::RollError;

/// Byte index of the `)` closing the `(` at `open`.
pub fn matching_paren(s: &str, open: usize) -> Result<usize, RollError> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(open + i);
                }
            }
            _ => {}
        }
    }
    Err(RollError::UnmatchedDelimiter {
        delimiter: '(',
        position: open,
    })
}

/// The contents of the first balanced parenthesis group in `s`, without the outer pair.
pub fn fullparenthesis(s: &str) -> Result<&str, RollError> {
    let open = s.find('(').ok_or_else(|| RollError::descriptive("no parenthesis found"))?;
    if let Some(close) = s[..open].find(')') {
        return Err(RollError::UnmatchedDelimiter {
            delimiter: ')',
            position: close,
        });
    }
    let close = matching_paren(s, open)?;
    Ok(&s[open + 1..close])
}

/// Whether `s` is a single parenthesis group and nothing else.
pub fn is_wrapped(s: &str) -> bool {
    s.starts_with('(') && matching_paren(s, 0).map_or(false, |close| close + 1 == s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullparenthesis() {
        assert_eq!(
            fullparenthesis("f______(-----((^^^^)~~~~~)---)___"),
            Ok("-----((^^^^)~~~~~)---")
        );
        assert_eq!(fullparenthesis("(a)(b)"), Ok("a"));
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(
            fullparenthesis("x((y)"),
            Err(RollError::UnmatchedDelimiter {
                delimiter: '(',
                position: 1
            })
        );
        assert_eq!(
            fullparenthesis("a)(b)"),
            Err(RollError::UnmatchedDelimiter {
                delimiter: ')',
                position: 1
            })
        );
    }

    #[test]
    fn test_is_wrapped() {
        assert!(is_wrapped("(1d10g)"));
        assert!(!is_wrapped("(1)(2)"));
        assert!(!is_wrapped("x(1)"));
    }
}
