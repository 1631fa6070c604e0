//! A small dice language: integer arithmetic, `dN` dice and the `n term`
//! repeat form, parsed by a tail-anchored backtracking grammar.
//!
//! ```
//! let values = dicelang::roll("(1 + 2) * 3, 10 / 3").unwrap();
//! assert_eq!(values.as_slice(), &[9, 3]);
//! ```

mod app;
mod common;
mod error;
pub mod parse;
pub mod roll;

pub use app::{format_roll, Config, DiceRoller, CANNOT_PARSE};
pub use common::{Int, NonEmpty, Values};
pub use error::DiceError;
pub use parse::{parse, tokenize};

/// Evaluates `node` with the thread's random generator and no roll budget.
///
/// Trees parsed by [`parse`] always evaluate; only [`DiceRoller`] bounds the
/// number of rolls.
pub fn evaluate(node: &parse::Node<'_>) -> Result<Values, roll::RollError> {
    roll::RollContext::default().evaluate(node)
}

/// Tokenizes, parses and evaluates `text` in one go.
pub fn roll(text: &str) -> Result<Values, DiceError> {
    let tokens = tokenize(text)?;
    let node = parse(&tokens).ok_or(DiceError::CannotParse)?;
    Ok(evaluate(&node)?)
}
