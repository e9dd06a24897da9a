use crate::common::Int;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use std::collections::VecDeque;

/// A source of die faces.
pub trait Roller {
    /// A face in `min..=max`. `max <= min` always yields `min`.
    fn roll(&mut self, min: Int, max: Int) -> Int;

    fn roll_n(&mut self, num: usize, min: Int, max: Int) -> Vec<Int> {
        (0..num).map(|_| self.roll(min, max)).collect()
    }
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, min: Int, max: Int) -> Int {
        if max <= min {
            min
        } else {
            self.gen_range(min..=max)
        }
    }

    fn roll_n(&mut self, num: usize, min: Int, max: Int) -> Vec<Int> {
        if max <= min {
            return vec![min; num];
        }
        Uniform::new_inclusive(min, max)
            .sample_iter(self)
            .take(num)
            .collect()
    }
}

/// Replays a fixed sequence of faces, then keeps returning `min`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    faces: VecDeque<Int>,
}

impl ScriptedRoller {
    pub fn new(faces: impl IntoIterator<Item = Int>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl Roller for ScriptedRoller {
    fn roll(&mut self, min: Int, _max: Int) -> Int {
        self.faces.pop_front().unwrap_or(min)
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;

    pub(crate) struct StepRoller {
        current: Int,
        step: Int,
    }

    impl StepRoller {
        pub fn new(initial: Int, step: Int) -> Self {
            Self {
                current: initial,
                step,
            }
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, min: Int, max: Int) -> Int {
            let span = (max - min + 1).max(1);
            let ret = (self.current - 1).rem_euclid(span) + min;
            self.current += self.step;
            ret
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_rng_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let faces = rng.roll_n(200, 1, 6);
        assert_eq!(faces.len(), 200);
        assert!(faces.iter().all(|x| (1..=6).contains(x)));
        assert_eq!(rng.roll(3, 3), 3);
        assert_eq!(rng.roll_n(2, 1, 1), vec![1, 1]);
    }

    #[test]
    fn test_step_roller() {
        let mut roller = StepRoller::new(5, 1);
        assert_eq!(roller.roll_n(4, 1, 6), vec![5, 6, 1, 2]);
    }

    #[test]
    fn test_scripted_roller() {
        let mut roller = ScriptedRoller::new([4, 2]);
        assert_eq!(roller.roll_n(3, 1, 10), vec![4, 2, 1]);
        assert_eq!(roller.remaining(), 0);
    }
}
