use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RollError {
    /// Only a bounded [`RollContext`](super::RollContext) reports this.
    #[error("too many dice rolled")]
    TooManyRolls,
    /// A literal rule matched on its own; its node carries no action.
    #[error("{0:?} is punctuation and has no value")]
    NoValue(String),
}
