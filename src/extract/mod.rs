//! Reads a flattened dice code such as `1,2@5d10R1s!` into [RollParameters].
//!
//! Every rule in [rules::RULES] runs over the whole code. A key may be set by only
//! one rule, and together the rules have to account for every non-whitespace
//! character of the code.

mod rules;

use crate::common::*;
use crate::error::RollError;
use rules::{Param, RULES};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParamKey {
    Amount,
    Sides,
    Rerolls,
    Sort,
    Explosion,
    ReturnFunction,
    Difficulty,
    OneBehaviour,
}

impl ParamKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Sides => "sides",
            Self::Rerolls => "rerolls",
            Self::Sort => "sort",
            Self::Explosion => "explosion",
            Self::ReturnFunction => "returnfun",
            Self::Difficulty => "difficulty",
            Self::OneBehaviour => "onebehaviour",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dice code asked for. Unset fields fall back to session defaults.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollParameters {
    pub amount: Option<Amount>,
    pub sides: Option<Int>,
    pub rerolls: Int,
    pub sort: bool,
    pub explosion: Int,
    pub return_function: Option<ReturnFunction>,
    pub difficulty: Option<Int>,
    pub one_behaviour: bool,
}

impl RollParameters {
    fn set(&mut self, param: Param) {
        match param {
            Param::Amount(x) => self.amount = Some(x),
            Param::Sides(x) => self.sides = Some(x),
            Param::Rerolls(x) => self.rerolls = x,
            Param::Sort => self.sort = true,
            Param::Explosion(x) => self.explosion = x,
            Param::ReturnFunction(x) => self.return_function = Some(x),
            Param::Difficulty(x) => self.difficulty = Some(x),
            Param::OneBehaviour(x) => self.one_behaviour = x,
        }
    }
}

pub fn extract(code: &str) -> Result<RollParameters, RollError> {
    let code = code.trim();
    let mut params = RollParameters::default();
    let mut owners: HashMap<ParamKey, &'static str> = HashMap::new();
    let mut claimed = vec![false; code.len()];

    for rule in RULES.iter() {
        for (range, found) in rule.apply(code)? {
            log::trace!("{} matched {:?} in {:?}", rule.name, &code[range.clone()], code);
            claimed[range].iter_mut().for_each(|c| *c = true);
            for param in found {
                let key = param.key();
                if let Some(first) = owners.insert(key, rule.name) {
                    return Err(RollError::Conflict {
                        key: key.as_str(),
                        first,
                        second: rule.name,
                    });
                }
                params.set(param);
            }
        }
    }

    let unclaimed: String = code
        .char_indices()
        .filter(|&(i, c)| !claimed[i] && !c.is_whitespace())
        .map(|(_, c)| c)
        .collect();
    if !unclaimed.is_empty() {
        return Err(RollError::usage(format!(
            "{:?} is not a full match, {:?} left over",
            code, unclaimed
        )));
    }

    if code.contains('@') && !matches!(params.return_function, Some(ReturnFunction::Select(_))) {
        return Err(RollError::usage(format!(
            "{:?} uses '@' without a selector list",
            code
        )));
    }
    if params.amount.is_none() {
        return Err(RollError::usage(format!("{:?} has no amount", code)));
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn check(code: &str, expected: RollParameters) {
        assert_eq!(extract(code).unwrap(), expected);
    }

    fn check_usage(code: &str) {
        let err = extract(code).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Usage, "{}", err);
    }

    #[test]
    fn test_threshold_code() {
        check(
            "113d04f9",
            RollParameters {
                amount: Some(Amount::Count(113)),
                sides: Some(4),
                return_function: Some(ReturnFunction::Threshold),
                difficulty: Some(9),
                one_behaviour: true,
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_exploding_code() {
        check(
            "999d77777e3000!!",
            RollParameters {
                amount: Some(Amount::Count(999)),
                sides: Some(77777),
                return_function: Some(ReturnFunction::Threshold),
                difficulty: Some(3000),
                one_behaviour: false,
                explosion: 2,
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_selectors() {
        check(
            "1,2@5d10R1s",
            RollParameters {
                amount: Some(Amount::Count(5)),
                sides: Some(10),
                rerolls: 1,
                sort: true,
                return_function: Some(ReturnFunction::Select(vec1![1, 2])),
                ..Default::default()
            },
        );
        check(
            "-2@12d6",
            RollParameters {
                amount: Some(Amount::Count(12)),
                sides: Some(6),
                return_function: Some(ReturnFunction::Select(vec1![-2])),
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_bare_and_literal() {
        check(
            "7",
            RollParameters {
                amount: Some(Amount::Count(7)),
                ..Default::default()
            },
        );
        check(
            " 6 g ",
            RollParameters {
                amount: Some(Amount::Count(6)),
                return_function: Some(ReturnFunction::Sum),
                ..Default::default()
            },
        );
        check(
            "--h",
            RollParameters {
                amount: Some(Amount::BackReference(2)),
                return_function: Some(ReturnFunction::Max),
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_conflicts() {
        assert_eq!(
            extract("5d6 d8"),
            Err(RollError::Conflict {
                key: "sides",
                first: "sides",
                second: "sides",
            })
        );
        assert_eq!(
            extract("2@5d10g"),
            Err(RollError::Conflict {
                key: "returnfun",
                first: "selectors",
                second: "return",
            })
        );
    }

    #[test]
    fn test_incomplete() {
        check_usage("3d6x");
        check_usage("b.a");
        check_usage("d10");
        check_usage("1@2@3");
        check_usage("");
    }
}
