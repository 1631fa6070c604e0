mod ctx;
mod error;
mod roller;

pub(crate) type RResult<T> = Result<T, RollError>;

pub use ctx::{DefaultRoller, Evaluator, RollContext};
pub use error::RollError;
pub use roller::Roller;

#[cfg(test)]
pub(crate) use roller::StepRoller;
