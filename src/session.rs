use crate::common::*;
use crate::config::SessionConfig;
use crate::error::{proceed, Outcome, RResult, RollError};
use crate::extract::{extract, RollParameters};
use crate::resolve::{DefinesTable, Resolver};
use crate::roll::*;
use crate::trigger::TriggerState;
use rand::SeedableRng;

/// Everything one user's rolls share: defines, trigger flags, history and the dice.
///
/// ```
/// use dicecode::Session;
///
/// let mut session = Session::seeded(7);
/// session.defines_mut().insert("str", "3");
/// let rolls = session.roll("str d10g; 2 + 2").unwrap().done().unwrap();
/// assert_eq!(rolls.len(), 2);
/// assert_eq!(rolls[1].result(), Some(4));
/// ```
pub struct Session<R = DefaultRoller> {
    config: SessionConfig,
    defines: DefinesTable,
    triggers: TriggerState,
    history: RollHistory,
    ctx: RollContext<R>,
    depth: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::with_roller(config, DefaultRoller::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_roller(SessionConfig::default(), DefaultRoller::seed_from_u64(seed))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Roller> Session<R> {
    pub fn with_roller(config: SessionConfig, roller: R) -> Self {
        Self {
            history: RollHistory::new(config.history_capacity, config.backref_capacity),
            ctx: RollContext::new(config.max_rolls, roller),
            config,
            defines: DefinesTable::new(),
            triggers: TriggerState::default(),
            depth: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn defines(&self) -> &DefinesTable {
        &self.defines
    }

    pub fn defines_mut(&mut self) -> &mut DefinesTable {
        &mut self.defines
    }

    pub fn triggers(&self) -> &TriggerState {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerState {
        &mut self.triggers
    }

    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    pub fn roller_mut(&mut self) -> &mut R {
        self.ctx.roller_mut()
    }

    /// Rolls every `;`-separated segment of `text`. Blank segments give empty rolls.
    /// The dice budget covers the whole request.
    pub fn roll(&mut self, text: &str) -> RResult<Vec<DiceInterpretation>> {
        self.ctx.reset();
        let mut rolls = Vec::new();
        for segment in split_segments(text) {
            if segment.trim().is_empty() {
                rolls.push(DiceInterpretation::empty());
            } else {
                rolls.push(proceed!(self.evaluate(segment)));
            }
        }
        Ok(Outcome::Done(rolls))
    }

    /// Resolves and rolls one segment. Triggers that roll come back through here.
    pub fn evaluate(&mut self, text: &str) -> RResult<DiceInterpretation> {
        let limit = self.config.max_depth;
        if self.depth >= limit {
            return Err(RollError::RecursionLimit { limit });
        }
        self.depth += 1;
        let ret = self.evaluate_unguarded(text);
        self.depth -= 1;
        ret
    }

    fn evaluate_unguarded(&mut self, text: &str) -> RResult<DiceInterpretation> {
        let code = proceed!(self.resolve(text));
        log::debug!("{:?} resolved to {:?}", text, code);
        self.roll_code(&code).map(Outcome::Done)
    }

    /// Runs triggers, sub-rolls and defines over `text`, leaving a flat dice code.
    pub fn resolve(&mut self, text: &str) -> RResult<String> {
        Resolver::new(self).resolve(text)
    }

    /// Rolls an already flat dice code and records it in the history.
    pub fn roll_code(&mut self, code: &str) -> Result<DiceInterpretation, RollError> {
        let params = extract(code)?;
        let sideless = params.sides.is_none();
        let (return_function, spec) = self.specify(params)?;

        // counting one-sided dice has nothing to roll
        let counting = sideless
            && return_function == ReturnFunction::Id
            && matches!(spec.amount, Amount::Count(_));
        let dice = if counting {
            Dice::from_faces(code.trim(), spec, Vec::new())
        } else {
            Dice::roll(&mut self.ctx, code.trim(), spec)?
        };

        let interp = DiceInterpretation::new(return_function, dice);
        interp.try_result()?;
        log::debug!("rolled {}", interp);
        self.history.push(interp.clone());
        Ok(interp)
    }

    fn specify(&self, params: RollParameters) -> Result<(ReturnFunction, DiceSpec), RollError> {
        let mut referenced_sides = None;
        let amount = match params.amount {
            Some(Amount::BackReference(n)) => {
                let backref = self.history.back_reference(n).ok_or_else(|| {
                    RollError::descriptive(format!("there is no roll {} back to refer to", n))
                })?;
                referenced_sides = Some(backref.sides);
                Amount::Literal(backref.faces.clone())
            }
            Some(amount) => amount,
            None => return Err(RollError::usage("no amount given")),
        };

        let return_function = match params.return_function {
            Some(f) => f,
            None if params.sides.is_none() && referenced_sides.is_none() => ReturnFunction::Id,
            None => self.config.default_return.clone(),
        };
        let sides = match (params.sides, &return_function) {
            (Some(sides), _) => sides,
            (None, ReturnFunction::Id) => 1,
            (None, _) => referenced_sides.unwrap_or(self.config.default_sides),
        };

        let spec = DiceSpec {
            rerolls: params.rerolls,
            sort: params.sort,
            explosion: params.explosion,
            difficulty: params.difficulty,
            one_behaviour: params.one_behaviour,
            ..DiceSpec::with_amount(amount, sides)
        };
        Ok((return_function, spec))
    }

    /// A line for people, honouring the `ignore` and `verbose` trigger flags.
    pub fn describe(&self, interp: &DiceInterpretation) -> String {
        if self.triggers.ignore() {
            TerseStringifier.str_interpretation(interp)
        } else if self.triggers.verbose() {
            VerboseStringifier.str_interpretation(interp)
        } else {
            SimpleStringifier.str_interpretation(interp)
        }
    }
}

/// Splits on `;` outside of `&...&` spans.
fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut in_trigger = false;
    let mut last = 0;
    for (i, c) in text.char_indices() {
        match c {
            '&' => in_trigger = !in_trigger,
            ';' if !in_trigger => {
                segments.push(&text[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&text[last..]);
    segments
}
