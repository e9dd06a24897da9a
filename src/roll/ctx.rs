use super::roller::Roller;
use crate::common::Int;
use crate::error::RollError;
use rand::SeedableRng;

pub type DefaultRoller = rand::rngs::StdRng;

/// A [Roller] together with a budget on how many dice it may roll.
pub struct RollContext<R = DefaultRoller> {
    max_rolls: Option<usize>,
    rolls: usize,
    roller: R,
}

impl<R: Roller> RollContext<R> {
    pub fn new(max_rolls: Option<usize>, roller: R) -> Self {
        Self {
            max_rolls,
            rolls: 0,
            roller,
        }
    }

    pub fn new_bounded(max_rolls: usize, roller: R) -> Self {
        Self::new(Some(max_rolls), roller)
    }

    pub fn new_unbounded(roller: R) -> Self {
        Self::new(None, roller)
    }

    fn count_rolls(&mut self, n: usize) -> Result<(), RollError> {
        self.rolls += n;
        if self.max_rolls.map_or(false, |max| self.rolls > max) {
            Err(RollError::TooManyRolls)
        } else {
            Ok(())
        }
    }

    pub fn rolls(&self) -> usize {
        self.rolls
    }

    pub fn reset(&mut self) {
        self.rolls = 0;
    }

    pub fn roll(&mut self, num: usize, min: Int, max: Int) -> Result<Vec<Int>, RollError> {
        self.count_rolls(num)?;
        Ok(self.roller.roll_n(num, min, max))
    }

    pub fn roller_mut(&mut self) -> &mut R {
        &mut self.roller
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(Some(10_000), DefaultRoller::from_entropy())
    }
}
