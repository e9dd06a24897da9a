use crate::arith;
use crate::error::RollError;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-+]?\d+(?:\.\d+)?(?:\s*(?:\*\*|[-+*/])?\s*[-+]?\d+(?:\.\d+)?)*").unwrap()
});

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+(?:\.\d+)?").unwrap());

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*|[-+*/]|\d+(?:\.\d+)?").unwrap());

/// Folds every run of numbers and operators into its value. Adjacent numbers
/// without an operator between them add up. Numbers glued to a word, like the
/// `10` in `d10`, are left alone.
pub fn calc(code: &str) -> Result<String, RollError> {
    let code = WHITESPACE.replace_all(code.trim(), " ");
    let mut out = String::with_capacity(code.len());
    let mut pos = 0;

    while let Some(m) = RUN.find_at(&code, pos) {
        out.push_str(&code[pos..m.start()]);
        let glued = code[..m.start()]
            .chars()
            .next_back()
            .map_or(false, |c| c.is_alphanumeric() || c == '_' || c == '.');
        if glued {
            let skip = NUMBER.find(m.as_str()).map_or(m.len(), |n| n.end());
            out.push_str(&code[m.start()..m.start() + skip]);
            pos = m.start() + skip;
            continue;
        }

        out.push_str(&fold(m.as_str())?);
        pos = m.end();
    }
    out.push_str(&code[pos..]);
    Ok(out)
}

/// Evaluates one run of numbers and operators.
fn fold(run: &str) -> Result<String, RollError> {
    if run.chars().all(|c| c.is_ascii_digit()) {
        return Ok(run.to_string());
    }

    let mut expr = String::with_capacity(run.len());
    let mut after_number = false;
    for token in TOKEN.find_iter(run) {
        let is_number = token.as_str().starts_with(|c: char| c.is_ascii_digit());
        if is_number && after_number {
            expr.push('+');
        }
        expr.push_str(token.as_str());
        after_number = is_number;
    }

    let value = arith::evaluate(&expr, ())?;
    log::trace!("{:?} folds to {}", run, value);
    Ok(value.to_string())
}
