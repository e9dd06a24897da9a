//! An interpreter for dice codes such as `3d10g`, `1,2@6d10e7!` or `[4,8]h`,
//! with `&trigger&` macros, named defines and parenthesised sub-rolls.
//!
//! Everything goes through a [Session], which owns the defines, trigger flags,
//! roll history and the dice themselves.

pub mod arith;
mod common;
mod config;
mod error;
mod extract;
mod resolve;
mod roll;
mod session;
mod trigger;

pub use arith::{evaluate, ArithError, Number};
pub use common::{vec1, Amount, Float, Int, NonEmpty, ReturnFunction};
pub use config::{SessionConfig, ADMINISTRATOR};
pub use error::{ErrorCategory, Outcome, RResult, RollError, USAGE};
pub use extract::{extract, ParamKey, RollParameters};
pub use resolve::{calc, fullparenthesis, matching_paren, DefinesTable};
pub use roll::{
    BackReference, DefaultRoller, Dice, DiceInterpretation, DiceSpec, RollContext, RollHistory,
    Roller, ScriptedRoller, SimpleStringifier, Stringify, TerseStringifier, VerboseStringifier,
};
pub use session::Session;
pub use trigger::{ProjectRecord, TriggerState};
