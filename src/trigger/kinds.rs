use super::{state::ProjectRecord, Surroundings};
use crate::common::Int;
use crate::error::{proceed, Outcome, RResult, RollError};
use crate::resolve::is_wrapped;
use crate::roll::Roller;
use crate::session::Session;
use once_cell::sync::Lazy;
use regex::Regex;

static IF_THEN_ELSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?s)(.*?)\bthen\b(.*?)\belse\b(.*?)\bdone\b\s*$").unwrap()
});

const PROJECT_CAP: usize = 50;
const LOOP_CAP: usize = 100;
/// Multiplier for both caps once `limitbreak` is set.
const LIMITBREAK_FACTOR: usize = 10;
const MAX_CAP: Int = 100;

#[enum_dispatch::enum_dispatch]
pub(crate) trait Trigger {
    /// Runs the trigger. The returned text replaces its `&...&` span.
    fn fire<R: Roller>(&self, session: &mut Session<R>, scope: &mut Surroundings) -> RResult<String>;
}

#[enum_dispatch::enum_dispatch(Trigger)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TriggerKind {
    LimitBreak(LimitBreak),
    Shift(Shift),
    Max(Max),
    Project(Project),
    Toggle(Toggle),
    Loop(Loop),
    Values(Values),
    Resonances(Resonances),
    Param(Param),
    IfThenElse(IfThenElse),
}

impl TriggerKind {
    /// Parses the inside of one `&...&` span.
    pub fn parse(inner: &str) -> Result<Self, RollError> {
        let inner = inner.trim();
        let (name, body) = inner
            .split_once(char::is_whitespace)
            .unwrap_or((inner, ""));
        let body = body.trim();

        Ok(match name {
            "limitbreak" => LimitBreak.into(),
            "shift" => Shift {
                value: parse_int(name, body)?,
            }
            .into(),
            "max" => Max {
                value: parse_int(name, body)?,
            }
            .into(),
            "project" => {
                let (roll, goal) = split_last(name, body)?;
                Project { roll, goal }.into()
            }
            "ignore" | "verbose" => Toggle {
                flag: if name == "ignore" { Flag::Ignore } else { Flag::Verbose },
                on: !body.split_whitespace().any(|word| word == "off"),
            }
            .into(),
            "loop" | "loopsum" => {
                let (roll, times) = split_last(name, body)?;
                Loop {
                    roll,
                    times,
                    sum: name == "loopsum",
                }
                .into()
            }
            "values" => Values {
                assignments: body.to_string(),
            }
            .into(),
            "resonances" => Resonances.into(),
            "param" => Param {
                keys: body.split_whitespace().map(str::to_string).collect(),
            }
            .into(),
            "if" => {
                let caps = IF_THEN_ELSE.captures(body).ok_or_else(|| {
                    RollError::descriptive("expected `if <roll> then <a> else <b> done`")
                })?;
                IfThenElse {
                    condition: caps[1].trim().to_string(),
                    then: caps[2].trim().to_string(),
                    otherwise: caps[3].trim().to_string(),
                }
                .into()
            }
            _ => return Err(RollError::UnknownTrigger(name.to_string())),
        })
    }
}

fn parse_int(name: &str, body: &str) -> Result<Int, RollError> {
    body.parse()
        .map_err(|_| RollError::descriptive(format!("{} needs a whole number, not {:?}", name, body)))
}

/// `"<roll> <last>"` split at the final word.
fn split_last(name: &str, body: &str) -> Result<(String, String), RollError> {
    match body.rsplit_once(char::is_whitespace) {
        Some((roll, last)) if !roll.trim().is_empty() => {
            Ok((roll.trim().to_string(), last.to_string()))
        }
        _ => Err(RollError::descriptive(format!(
            "{} expects a roll followed by a number",
            name
        ))),
    }
}

/// Resolves `text` and reads the result as a whole number.
fn resolve_int<R: Roller>(session: &mut Session<R>, text: &str) -> RResult<Int> {
    let code = proceed!(session.resolve(text));
    let code = code.trim();
    code.parse().map(Outcome::Done).map_err(|_| {
        RollError::descriptive(format!("{:?} does not resolve to a whole number", text))
    })
}

fn cap<R: Roller>(session: &Session<R>, base: usize) -> usize {
    if session.triggers().limitbreak() {
        base * LIMITBREAK_FACTOR
    } else {
        base
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct LimitBreak;

impl Trigger for LimitBreak {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        if session.config().is_administrator() {
            session.triggers_mut().limitbreak = true;
        } else {
            log::warn!("limitbreak requested without permission");
            session.triggers_mut().rights_violation = true;
        }
        Ok(Outcome::Done(String::new()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Shift {
    pub value: Int,
}

impl Trigger for Shift {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        session.triggers_mut().shift = Some(self.value);
        Ok(Outcome::Done(String::new()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Max {
    pub value: Int,
}

impl Trigger for Max {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        session.triggers_mut().max = Some(self.value.min(MAX_CAP));
        Ok(Outcome::Done(String::new()))
    }
}

/// Rolls until the running total reaches the goal. Gives back the number of rolls.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Project {
    pub roll: String,
    pub goal: String,
}

impl Trigger for Project {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        let goal = proceed!(resolve_int(session, &self.goal));
        let mut limit = cap(session, PROJECT_CAP);
        if let Some(max) = session.triggers().max() {
            limit = limit.min(max.max(0) as usize);
        }

        let mut record = ProjectRecord {
            goal,
            ..ProjectRecord::default()
        };
        while record.total < goal && record.iterations < limit {
            let interp = proceed!(session.evaluate(&self.roll));
            let value = interp.result().unwrap_or(0);
            record.iterations += 1;
            record.total = record.total.saturating_add(value);
            record.log.push(format!(
                "{}: {} rolled {}, {} of {}",
                record.iterations, interp.dice.code, value, record.total, goal
            ));
        }
        if record.total < goal {
            log::warn!(
                "project {:?} stopped at {} of {} after {} rolls",
                self.roll,
                record.total,
                goal,
                record.iterations
            );
        }

        let iterations = record.iterations;
        session.triggers_mut().project = Some(record);
        Ok(Outcome::Done(iterations.to_string()))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Flag {
    Ignore,
    Verbose,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Toggle {
    pub flag: Flag,
    pub on: bool,
}

impl Trigger for Toggle {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        let state = session.triggers_mut();
        match self.flag {
            Flag::Ignore => state.set_ignore(self.on),
            Flag::Verbose => state.set_verbose(self.on),
        }
        Ok(Outcome::Done(String::new()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Loop {
    pub roll: String,
    pub times: String,
    /// `loopsum` gives back the total, `loop` nothing.
    pub sum: bool,
}

impl Trigger for Loop {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        let times = proceed!(resolve_int(session, &self.times)).max(0) as usize;
        let limit = cap(session, LOOP_CAP);
        if times > limit {
            log::warn!("loop of {} rolls capped at {}", times, limit);
        }

        let mut total: Int = 0;
        for _ in 0..times.min(limit) {
            let interp = proceed!(session.evaluate(&self.roll));
            total = total.saturating_add(interp.result().unwrap_or(0));
        }
        Ok(Outcome::Done(if self.sum {
            total.to_string()
        } else {
            String::new()
        }))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Values {
    pub assignments: String,
}

impl Trigger for Values {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        session.defines_mut().parse_assignments(&self.assignments)?;
        Ok(Outcome::Done(String::new()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Resonances;

impl Trigger for Resonances {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        Ok(Outcome::ShortCircuit(session.history().resonance_report()))
    }
}

/// Binds the trailing words around the trigger to defines, last key first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Param {
    pub keys: Vec<String>,
}

impl Trigger for Param {
    fn fire<R: Roller>(&self, session: &mut Session<R>, scope: &mut Surroundings) -> RResult<String> {
        for key in self.keys.iter().rev() {
            let word = match scope.take_trailing_word() {
                Some(word) => word,
                None => {
                    return Err(RollError::descriptive(format!("no value left for {}", key)))
                }
            };
            let value = if is_wrapped(&word) {
                let interp = proceed!(session.evaluate(&word[1..word.len() - 1]));
                interp.result().unwrap_or(0).to_string()
            } else {
                word
            };
            session.defines_mut().insert(key.as_str(), value);
        }
        Ok(Outcome::Done(String::new()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct IfThenElse {
    pub condition: String,
    pub then: String,
    pub otherwise: String,
}

impl Trigger for IfThenElse {
    fn fire<R: Roller>(&self, session: &mut Session<R>, _: &mut Surroundings) -> RResult<String> {
        let interp = proceed!(session.evaluate(&self.condition));
        let value = interp.result().unwrap_or(0);
        let branch = if value > 0 { &self.then } else { &self.otherwise };
        Ok(Outcome::Done(branch.replace('$', &value.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(inner: &str, expected: TriggerKind) {
        assert_eq!(TriggerKind::parse(inner), Ok(expected), "{}", inner);
    }

    #[test]
    fn test_parse() {
        check("limitbreak", LimitBreak.into());
        check("max 12", Max { value: 12 }.into());
        check(
            " loopsum 2d6g  8 ",
            Loop {
                roll: "2d6g".to_string(),
                times: "8".to_string(),
                sum: true,
            }
            .into(),
        );
        check(
            "verbose off",
            Toggle {
                flag: Flag::Verbose,
                on: false,
            }
            .into(),
        );
        check(
            "if 1d6g then $ else 0 done",
            IfThenElse {
                condition: "1d6g".to_string(),
                then: "$".to_string(),
                otherwise: "0".to_string(),
            }
            .into(),
        );
        check(
            "param a b",
            Param {
                keys: vec!["a".to_string(), "b".to_string()],
            }
            .into(),
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            TriggerKind::parse("dance 3"),
            Err(RollError::UnknownTrigger("dance".to_string()))
        );
        assert!(TriggerKind::parse("max lots").is_err());
        assert!(TriggerKind::parse("loop 5").is_err());
        assert!(TriggerKind::parse("if 1 then 2 done").is_err());
    }
}
