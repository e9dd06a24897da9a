mod ctx;
mod dice;
mod history;
mod interpret;
mod roller;
mod stringify;

pub use ctx::{DefaultRoller, RollContext};
pub use dice::{Dice, DiceSpec};
pub use history::{BackReference, RollHistory};
pub use interpret::DiceInterpretation;
pub use roller::{Roller, ScriptedRoller};
pub use stringify::{SimpleStringifier, Stringify, TerseStringifier, VerboseStringifier};

#[cfg(test)]
pub(crate) use roller::StepRoller;
