use super::interpret::DiceInterpretation;
use crate::common::Int;
use std::collections::VecDeque;

/// Faces kept around so later codes can reuse them with `-`.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackReference {
    pub faces: Vec<Int>,
    pub sides: Int,
}

/// Bounded memory of past rolls, oldest first.
#[derive(Debug, Clone)]
pub struct RollHistory {
    rolls: VecDeque<DiceInterpretation>,
    capacity: usize,
    backrefs: VecDeque<BackReference>,
    backref_capacity: usize,
}

impl RollHistory {
    pub fn new(capacity: usize, backref_capacity: usize) -> Self {
        Self {
            rolls: VecDeque::with_capacity(capacity),
            capacity,
            backrefs: VecDeque::with_capacity(backref_capacity),
            backref_capacity,
        }
    }

    pub fn push(&mut self, interp: DiceInterpretation) {
        if !interp.dice.faces.is_empty() && self.backref_capacity > 0 {
            if self.backrefs.len() == self.backref_capacity {
                self.backrefs.pop_front();
            }
            self.backrefs.push_back(BackReference {
                faces: interp.dice.faces.clone(),
                sides: interp.dice.spec.sides,
            });
        }
        if self.capacity > 0 {
            if self.rolls.len() == self.capacity {
                self.rolls.pop_front();
            }
            self.rolls.push_back(interp);
        }
    }

    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DiceInterpretation> {
        self.rolls.iter()
    }

    pub fn last(&self) -> Option<&DiceInterpretation> {
        self.rolls.back()
    }

    /// Up to `n` of the latest rolls, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &DiceInterpretation> {
        self.rolls.iter().rev().take(n)
    }

    /// The `n`-th latest face vector, counting from 1.
    pub fn back_reference(&self, n: usize) -> Option<&BackReference> {
        let index = self.backrefs.len().checked_sub(n)?;
        self.backrefs.get(index).filter(|_| n > 0)
    }

    /// One line per remembered selector roll, oldest first.
    pub fn resonance_report(&self) -> String {
        let lines: Vec<_> = self
            .rolls
            .iter()
            .filter_map(|interp| {
                let counts = interp.resonances()?;
                let body = if counts.is_empty() {
                    "no resonances".to_string()
                } else {
                    counts
                        .iter()
                        .map(|(face, count)| format!("{}\u{d7}{}", face, count))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                Some(format!("{}: {}", interp.dice.code, body))
            })
            .collect();
        if lines.is_empty() {
            "no selector rolls".to_string()
        } else {
            lines.join("\n")
        }
    }

    pub fn clear(&mut self) {
        self.rolls.clear();
        self.backrefs.clear();
    }
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::new(100, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::*;
    use crate::roll::dice::{Dice, DiceSpec};

    fn interp(code: &str, return_function: ReturnFunction, faces: &[Int]) -> DiceInterpretation {
        let spec = DiceSpec::new(faces.len() as Int, 10);
        DiceInterpretation::new(return_function, Dice::from_faces(code, spec, faces.to_vec()))
    }

    #[test]
    fn test_ring_buffers() {
        let mut history = RollHistory::new(3, 2);
        for i in 1..=4 {
            history.push(interp(&format!("r{}", i), ReturnFunction::Sum, &[i]));
        }
        history.push(interp("empty", ReturnFunction::None, &[]));

        let codes: Vec<_> = history.iter().map(|i| i.dice.code.as_str()).collect();
        assert_eq!(codes, vec!["r3", "r4", "empty"]);
        assert_eq!(history.back_reference(1).map(|b| b.faces.clone()), Some(vec![4]));
        assert_eq!(history.back_reference(2).map(|b| b.faces.clone()), Some(vec![3]));
        assert_eq!(history.back_reference(3), None);
        assert_eq!(history.back_reference(0), None);
        assert_eq!(history.recent(1).next().map(|i| i.dice.code.as_str()), Some("empty"));
    }

    #[test]
    fn test_resonance_report() {
        let mut history = RollHistory::default();
        assert_eq!(history.resonance_report(), "no selector rolls");
        history.push(interp("1@5", ReturnFunction::Select(vec1![1]), &[3, 3, 8, 8, 8]));
        history.push(interp("5g", ReturnFunction::Sum, &[1, 1]));
        history.push(interp("2@3", ReturnFunction::Select(vec1![2]), &[1, 2, 3]));
        history.push(interp("1@2", ReturnFunction::Select(vec1![1]), &[12, 15]));
        assert_eq!(
            history.resonance_report(),
            "1@5: 3\u{d7}1, 8\u{d7}2\n2@3: 1\u{d7}0, 2\u{d7}0, 3\u{d7}0\n1@2: no resonances"
        );
    }
}
