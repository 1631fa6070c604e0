use crate::parse::LexError;
use crate::roll::RollError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DiceError {
    #[error("input is {len} bytes long; the limit is {max}")]
    InputTooLong { len: usize, max: usize },
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("no production matches the input")]
    CannotParse,
    #[error("{0}")]
    Roll(#[from] RollError),
}
