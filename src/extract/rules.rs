use super::ParamKey;
use crate::common::*;
use crate::error::RollError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Param {
    Amount(Amount),
    Sides(Int),
    Rerolls(Int),
    Sort,
    Explosion(Int),
    ReturnFunction(ReturnFunction),
    Difficulty(Int),
    OneBehaviour(bool),
}

impl Param {
    pub(crate) const fn key(&self) -> ParamKey {
        match self {
            Self::Amount(_) => ParamKey::Amount,
            Self::Sides(_) => ParamKey::Sides,
            Self::Rerolls(_) => ParamKey::Rerolls,
            Self::Sort => ParamKey::Sort,
            Self::Explosion(_) => ParamKey::Explosion,
            Self::ReturnFunction(_) => ParamKey::ReturnFunction,
            Self::Difficulty(_) => ParamKey::Difficulty,
            Self::OneBehaviour(_) => ParamKey::OneBehaviour,
        }
    }
}

type Handler = fn(&Captures<'_>) -> Result<Vec<Param>, RollError>;

/// One way of reading part of a dice code.
pub(crate) struct Rule {
    pub name: &'static str,
    pattern: Regex,
    /// The capture group whose text this rule accounts for.
    claim: usize,
    handler: Handler,
}

impl Rule {
    // Patterns are fixed at compile time, so a failure here is a bug in this file.
    fn new(name: &'static str, pattern: &str, claim: usize, handler: Handler) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            claim,
            handler,
        }
    }

    /// Every place this rule matches, with the byte range it claims.
    pub(crate) fn apply(
        &self,
        code: &str,
    ) -> Result<Vec<(std::ops::Range<usize>, Vec<Param>)>, RollError> {
        self.pattern
            .captures_iter(code)
            .filter_map(|caps| caps.get(self.claim).map(|m| (m.range(), caps)))
            .map(|(range, caps)| Ok((range, (self.handler)(&caps)?)))
            .collect()
    }
}

pub(crate) static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new("selectors", r"^((?:-?\d+,)*-?\d+)@", 0, selectors),
        Rule::new("sides", r"[\d\s-](d(\d+))", 1, sides),
        Rule::new("rerolls", r"[\d-]([rR]([+-]?\d+))", 1, rerolls),
        Rule::new("sort", r"[\d-](s)", 1, |_| Ok(vec![Param::Sort])),
        Rule::new("amount", r"^(?:(?:-?\d+,)*-?\d+@)?\s*(-?\d+)[^@]*$", 1, amount),
        Rule::new(
            "literal",
            r"^(?:(?:-?\d+,)*-?\d+@)?\s*(\[[^\]]*\]|-+)(?:[^\d-]|$)",
            1,
            literal,
        ),
        Rule::new("return", r"([ghl~=])!*$", 1, return_function),
        Rule::new("threshold", r"(([ef])(\d+))!*$", 1, threshold),
        Rule::new("explosion", r"(!+)$", 1, explosion),
    ]
});

fn int(s: &str) -> Result<Int, RollError> {
    s.trim()
        .trim_start_matches('+')
        .parse()
        .map_err(|_| RollError::usage(format!("{:?} is not a usable number", s)))
}

fn group<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}

fn selectors(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    let ranks = group(caps, 1)
        .split(',')
        .map(int)
        .collect::<Result<Vec<_>, _>>()?;
    let ranks = NonEmpty::try_from_vec(ranks)
        .map_err(|_| RollError::usage("selector list is empty"))?;
    Ok(vec![Param::ReturnFunction(ReturnFunction::Select(ranks))])
}

fn sides(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    Ok(vec![Param::Sides(int(group(caps, 2))?)])
}

fn rerolls(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    Ok(vec![Param::Rerolls(int(group(caps, 2))?)])
}

fn amount(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    Ok(vec![Param::Amount(Amount::Count(int(group(caps, 1))?))])
}

fn literal(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    let text = group(caps, 1);
    let amount = if let Some(inner) = text.strip_prefix('[') {
        let inner = inner.trim_end_matches(']');
        let faces = inner
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(int)
            .collect::<Result<Vec<_>, _>>()?;
        Amount::Literal(faces)
    } else {
        Amount::BackReference(text.len())
    };
    Ok(vec![Param::Amount(amount)])
}

fn return_function(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    let c = group(caps, 1).chars().next().unwrap_or('~');
    let function = ReturnFunction::from_suffix(c)
        .ok_or_else(|| RollError::usage(format!("unknown return function {:?}", c)))?;
    Ok(vec![Param::ReturnFunction(function)])
}

fn threshold(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    Ok(vec![
        Param::ReturnFunction(ReturnFunction::Threshold),
        Param::Difficulty(int(group(caps, 3))?),
        Param::OneBehaviour(group(caps, 2) == "f"),
    ])
}

fn explosion(caps: &Captures<'_>) -> Result<Vec<Param>, RollError> {
    let bangs = group(caps, 1).len();
    let bangs = Int::try_from(bangs).map_err(|_| RollError::usage("too many '!'"))?;
    Ok(vec![Param::Explosion(bangs)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static Rule {
        RULES.iter().find(|r| r.name == name).unwrap()
    }

    fn check(name: &str, code: &str, expected: Vec<Param>) {
        let found: Vec<_> = rule(name)
            .apply(code)
            .unwrap()
            .into_iter()
            .flat_map(|(_, params)| params)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_amount_needs_no_later_at() {
        check("amount", "3d6", vec![Param::Amount(Amount::Count(3))]);
        check("amount", "1,2@6", vec![Param::Amount(Amount::Count(6))]);
        check("amount", "-2@12d6", vec![Param::Amount(Amount::Count(12))]);
        check("amount", "1@2@3", vec![]);
        check("amount", "---g", vec![]);
    }

    #[test]
    fn test_literal() {
        check("literal", "---g", vec![Param::Amount(Amount::BackReference(3))]);
        check(
            "literal",
            "[1, 1, 9]f6",
            vec![Param::Amount(Amount::Literal(vec![1, 1, 9]))],
        );
        check("literal", "-3d6", vec![]);
    }

    #[test]
    fn test_modifiers() {
        check("sides", "3d10", vec![Param::Sides(10)]);
        check("sides", "d10", vec![]);
        check("rerolls", "5d10R-2", vec![Param::Rerolls(-2)]);
        check("threshold", "5f7!", vec![
            Param::ReturnFunction(ReturnFunction::Threshold),
            Param::Difficulty(7),
            Param::OneBehaviour(true),
        ]);
        check("explosion", "5d10!!!", vec![Param::Explosion(3)]);
        check("return", "5d10h!", vec![Param::ReturnFunction(ReturnFunction::Max)]);
    }
}
