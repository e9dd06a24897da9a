use super::dice::Dice;
use crate::common::*;
use crate::error::RollError;

/// A rolled [Dice] and the function that reduces it to a result.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceInterpretation {
    pub return_function: ReturnFunction,
    pub dice: Dice,
}

impl DiceInterpretation {
    pub fn new(return_function: ReturnFunction, dice: Dice) -> Self {
        Self {
            return_function,
            dice,
        }
    }

    pub fn empty() -> Self {
        Self::new(ReturnFunction::None, Dice::empty())
    }

    /// The numeric result, if the return function gives one.
    pub fn try_result(&self) -> Result<Option<Int>, RollError> {
        match &self.return_function {
            ReturnFunction::Sum => self.dice.sum(),
            ReturnFunction::Max => self.dice.max(),
            ReturnFunction::Min => self.dice.min(),
            ReturnFunction::None => Ok(None),
            ReturnFunction::Id => Ok(self.dice.id()),
            ReturnFunction::Threshold => self.dice.threshold(),
            ReturnFunction::Select(ranks) => self.dice.select(ranks).map(Some),
        }
    }

    /// Like [try_result](Self::try_result), with totals too large for an [Int] as `None`.
    /// A [Session](crate::Session) never hands out such a roll.
    pub fn result(&self) -> Option<Int> {
        self.try_result().ok().flatten()
    }

    /// For selector rolls, how often each of the faces 1 to 10 repeats.
    /// Faces that never show up are left out.
    pub fn resonances(&self) -> Option<Vec<(Int, usize)>> {
        if !self.return_function.is_selector() {
            return None;
        }
        let counts = (1..=10)
            .filter_map(|face| {
                let seen = self.dice.faces.iter().filter(|&&x| x == face).count();
                (seen > 0).then(|| (face, seen - 1))
            })
            .collect();
        Some(counts)
    }
}

impl std::fmt::Display for DiceInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use super::stringify::{SimpleStringifier, Stringify};
        f.write_str(&SimpleStringifier.str_interpretation(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::dice::DiceSpec;

    fn interp(return_function: ReturnFunction, faces: &[Int]) -> DiceInterpretation {
        let dice = Dice::from_faces("", DiceSpec::new(faces.len() as Int, 10), faces.to_vec());
        DiceInterpretation::new(return_function, dice)
    }

    fn check(return_function: ReturnFunction, expected: Option<Int>) {
        let actual = interp(return_function, &[2, 3, 4, 5, 6, 7]).result();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_return_functions() {
        check(ReturnFunction::Sum, Some(27));
        check(ReturnFunction::Max, Some(7));
        check(ReturnFunction::Min, Some(2));
        check(ReturnFunction::Id, Some(6));
        check(ReturnFunction::None, None);
        check(ReturnFunction::Select(vec1![1, 2]), Some(5));
        check(ReturnFunction::Select(vec1![6, 2]), Some(10));
    }

    #[test]
    fn test_empty_sum() {
        assert_eq!(interp(ReturnFunction::Sum, &[]).result(), None);
        assert_eq!(DiceInterpretation::empty().result(), None);
    }

    #[test]
    fn test_resonances() {
        let selected = interp(ReturnFunction::Select(vec1![1]), &[3, 3, 3, 7, 7, 1]);
        assert_eq!(selected.resonances(), Some(vec![(1, 0), (3, 2), (7, 1)]));
        assert_eq!(interp(ReturnFunction::Sum, &[3, 3]).resonances(), None);
    }
}
