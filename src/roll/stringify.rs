use super::dice::Dice;
use super::interpret::DiceInterpretation;
use crate::common::Int;

/// Renders rolls for people, as `code (faces) = result`.
pub trait Stringify {
    fn str_interpretation(&mut self, interp: &DiceInterpretation) -> String {
        let dice = self.str_dice(&interp.dice);
        let result = self.str_result(interp.result());
        if result.is_empty() {
            dice
        } else {
            format!("{} = {}", dice, result)
        }
    }

    fn str_dice(&mut self, dice: &Dice) -> String {
        let faces = self.str_faces(&dice.faces);
        let mut ret = if dice.code.is_empty() {
            format!("({})", faces)
        } else {
            format!("{} ({})", dice.code, faces)
        };
        if !dice.dropped.is_empty() {
            ret.push_str(&format!(" dropped ({})", self.str_faces(&dice.dropped)));
        }
        ret
    }

    fn str_faces(&mut self, faces: &[Int]) -> String {
        faces
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn str_result(&mut self, result: Option<Int>) -> String {
        result.map(|x| x.to_string()).unwrap_or_default()
    }
}

#[derive(Default)]
pub struct SimpleStringifier;

impl SimpleStringifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stringify(&mut self, interp: &DiceInterpretation) -> String {
        self.str_interpretation(interp)
    }
}

impl Stringify for SimpleStringifier {}

/// Also lists what happened while rolling, one step per line.
#[derive(Default)]
pub struct VerboseStringifier;

impl VerboseStringifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stringify(&mut self, interp: &DiceInterpretation) -> String {
        self.str_interpretation(interp)
    }
}

impl Stringify for VerboseStringifier {
    fn str_interpretation(&mut self, interp: &DiceInterpretation) -> String {
        let mut ret = SimpleStringifier.str_interpretation(interp);
        ret.push_str(&format!("\nreturn: {}", interp.return_function));
        for line in &interp.dice.log {
            ret.push('\n');
            ret.push_str(line);
        }
        if interp.dice.explosions > 0 {
            ret.push_str(&format!("\n{} explosions", interp.dice.explosions));
        }
        ret
    }
}

/// Only the result, for rolls whose details are ignored.
#[derive(Default)]
pub struct TerseStringifier;

impl Stringify for TerseStringifier {
    fn str_interpretation(&mut self, interp: &DiceInterpretation) -> String {
        self.str_result(interp.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::*;
    use crate::roll::dice::DiceSpec;

    fn interp(code: &str, return_function: ReturnFunction, spec: DiceSpec, faces: &[Int]) -> DiceInterpretation {
        DiceInterpretation::new(return_function, Dice::from_faces(code, spec, faces.to_vec()))
    }

    #[test]
    fn test_simple() {
        let i = interp("2d20g", ReturnFunction::Sum, DiceSpec::new(2, 20), &[10, 11]);
        assert_eq!(SimpleStringifier::new().stringify(&i), "2d20g (10, 11) = 21");
        assert_eq!(i.to_string(), "2d20g (10, 11) = 21");
    }

    #[test]
    fn test_dropped_and_no_result() {
        let spec = DiceSpec {
            rerolls: 1,
            ..DiceSpec::new(3, 10)
        };
        let i = interp("3d10R1", ReturnFunction::None, spec, &[4, 1, 8]);
        assert_eq!(i.to_string(), "3d10R1 (4, 8) dropped (1)");
    }

    #[test]
    fn test_verbose_and_terse() {
        let i = interp("2d6h", ReturnFunction::Max, DiceSpec::new(2, 6), &[2, 5]);
        let verbose = VerboseStringifier::new().stringify(&i);
        assert!(verbose.starts_with("2d6h (2, 5) = 5\nreturn: max"));
        assert_eq!(TerseStringifier.str_interpretation(&i), "5");
    }
}
