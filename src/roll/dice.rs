use super::ctx::RollContext;
use super::roller::Roller;
use crate::arith::ArithError;
use crate::common::*;
use crate::error::RollError;
use std::cmp::Reverse;

/// Fully resolved instructions for one roll. Nothing here is optional any more.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceSpec {
    pub amount: Amount,
    pub min: Int,
    pub sides: Int,
    /// Positive drops that many lowest faces, negative that many highest.
    pub rerolls: Int,
    pub sort: bool,
    /// Faces `>= sides + 1 - explosion` roll another die. Zero disables.
    pub explosion: Int,
    pub difficulty: Option<Int>,
    /// Threshold rolls count ones against successes.
    pub one_behaviour: bool,
}

impl DiceSpec {
    pub fn new(amount: Int, sides: Int) -> Self {
        Self::with_amount(Amount::Count(amount), sides)
    }

    pub fn with_amount(amount: Amount, sides: Int) -> Self {
        Self {
            amount,
            min: 1,
            sides,
            rerolls: 0,
            sort: false,
            explosion: 0,
            difficulty: None,
            one_behaviour: false,
        }
    }

    pub fn explosion_threshold(&self) -> Option<Int> {
        if self.explosion <= 0 {
            return None;
        }
        let threshold = self.sides.saturating_add(1).saturating_sub(self.explosion);
        if threshold <= self.min {
            None
        } else {
            Some(threshold)
        }
    }
}

/// The outcome of rolling a [DiceSpec].
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dice {
    pub code: String,
    pub spec: DiceSpec,
    /// Faces still counted after dropping.
    pub faces: Vec<Int>,
    pub dropped: Vec<Int>,
    /// `-1` when a negative amount was rolled.
    pub sign: Int,
    pub explosions: usize,
    pub log: Vec<String>,
}

impl Dice {
    /// A roll of nothing, used for blank segments.
    pub fn empty() -> Self {
        Self::settle(String::new(), DiceSpec::new(0, 1), Vec::new(), 1, 0, Vec::new())
    }

    pub fn roll<R: Roller>(
        ctx: &mut RollContext<R>,
        code: impl Into<String>,
        spec: DiceSpec,
    ) -> Result<Self, RollError> {
        let mut log = Vec::new();
        let (mut faces, sign) = match &spec.amount {
            Amount::Count(n) => {
                let num = usize::try_from(n.unsigned_abs())
                    .map_err(|_| RollError::TooManyRolls)?;
                let faces = ctx.roll(num, spec.min, spec.sides)?;
                log.push(format!("rolled {}d{}: {:?}", n, spec.sides, faces));
                (faces, if *n < 0 { -1 } else { 1 })
            }
            Amount::Literal(faces) => {
                log.push(format!("given faces {:?}", faces));
                return Ok(Self::settle(code.into(), spec.clone(), faces.clone(), 1, 0, log));
            }
            Amount::BackReference(n) => {
                return Err(RollError::descriptive(format!(
                    "back-reference {} was not resolved",
                    n
                )))
            }
        };

        let mut explosions = 0;
        if let Some(threshold) = spec.explosion_threshold() {
            let mut pending = faces.iter().filter(|&&x| x >= threshold).count();
            while pending > 0 {
                let extra = ctx.roll(pending, spec.min, spec.sides)?;
                log.push(format!("{} exploded into {:?}", pending, extra));
                explosions += pending;
                pending = extra.iter().filter(|&&x| x >= threshold).count();
                faces.extend(extra);
            }
        }

        Ok(Self::settle(code.into(), spec, faces, sign, explosions, log))
    }

    /// Build from faces that were decided elsewhere. Dropping and sorting still apply.
    pub fn from_faces(code: impl Into<String>, spec: DiceSpec, faces: Vec<Int>) -> Self {
        let sign = match spec.amount {
            Amount::Count(n) if n < 0 => -1,
            _ => 1,
        };
        Self::settle(code.into(), spec, faces, sign, 0, Vec::new())
    }

    fn settle(
        code: String,
        spec: DiceSpec,
        mut faces: Vec<Int>,
        sign: Int,
        explosions: usize,
        mut log: Vec<String>,
    ) -> Self {
        let dropped = drop_extremes(&mut faces, spec.rerolls);
        if !dropped.is_empty() {
            log.push(format!("dropped {:?}", dropped));
        }
        if spec.sort {
            faces.sort_unstable();
        }
        Self {
            code,
            spec,
            faces,
            dropped,
            sign,
            explosions,
            log,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn signed(&self, x: Int) -> Result<Int, RollError> {
        x.checked_mul(self.sign).ok_or(RollError::Arith(ArithError::Overflow))
    }

    fn total<'f>(&self, faces: impl IntoIterator<Item = &'f Int>) -> Result<Int, RollError> {
        let sum = faces
            .into_iter()
            .try_fold(0 as Int, |acc, &x| acc.checked_add(x))
            .ok_or(RollError::Arith(ArithError::Overflow))?;
        self.signed(sum)
    }

    pub fn sum(&self) -> Result<Option<Int>, RollError> {
        if self.faces.is_empty() {
            Ok(None)
        } else {
            self.total(&self.faces).map(Some)
        }
    }

    pub fn max(&self) -> Result<Option<Int>, RollError> {
        self.faces.iter().max().map(|&x| self.signed(x)).transpose()
    }

    pub fn min(&self) -> Result<Option<Int>, RollError> {
        self.faces.iter().min().map(|&x| self.signed(x)).transpose()
    }

    /// The signed amount, or the number of given faces.
    pub fn id(&self) -> Option<Int> {
        match &self.spec.amount {
            Amount::Count(n) => Some(*n),
            Amount::Literal(faces) => Int::try_from(faces.len()).ok(),
            Amount::BackReference(_) => None,
        }
    }

    /// Successes at or above the difficulty, minus ones when they count against.
    /// A roll whose ones cancel all its successes is a botch and yields 0.
    pub fn threshold(&self) -> Result<Option<Int>, RollError> {
        let difficulty = match self.spec.difficulty {
            Some(difficulty) => difficulty,
            None => return Ok(None),
        };
        let successes = self.faces.iter().filter(|&&x| x >= difficulty).count() as Int;
        let antisuccesses = if self.spec.one_behaviour {
            self.faces.iter().filter(|&&x| x == 1).count() as Int
        } else {
            0
        };
        let net = if successes > 0 && successes <= antisuccesses {
            0
        } else {
            successes - antisuccesses
        };
        self.signed(net).map(Some)
    }

    /// Sum of the faces at the given 1-based ranks of the ascending sort.
    /// Ranks past the end clamp to the highest face, ranks below 1 count nothing.
    pub fn select(&self, ranks: &[Int]) -> Result<Int, RollError> {
        let mut sorted = self.faces.clone();
        sorted.sort_unstable();
        let len = sorted.len() as Int;
        let picked = ranks
            .iter()
            .map(|&rank| rank.min(len))
            .filter(|&rank| rank > 0)
            .map(|rank| &sorted[(rank - 1) as usize]);
        self.total(picked)
    }
}

/// Removes `|rerolls|` lowest (positive) or highest (negative) faces.
/// Ties go by original order. Returns what was removed.
fn drop_extremes(faces: &mut Vec<Int>, rerolls: Int) -> Vec<Int> {
    let n = (rerolls.unsigned_abs() as usize).min(faces.len());
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..faces.len()).collect();
    if rerolls > 0 {
        order.sort_by_key(|&i| faces[i]);
    } else {
        order.sort_by_key(|&i| Reverse(faces[i]));
    }
    let mut doomed = vec![false; faces.len()];
    for &i in &order[..n] {
        doomed[i] = true;
    }

    let mut dropped = Vec::with_capacity(n);
    let mut kept = Vec::with_capacity(faces.len() - n);
    for (face, doomed) in faces.drain(..).zip(doomed) {
        if doomed {
            dropped.push(face);
        } else {
            kept.push(face);
        }
    }
    *faces = kept;
    dropped
}
