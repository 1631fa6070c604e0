use crate::common::Values;
use crate::error::DiceError;
use crate::parse::{self, Token};
use crate::roll::{DefaultRoller, RollContext, Roller};

/// Message shown for any input that cannot be rolled.
pub const CANNOT_PARSE: &str = "String can't be parsed.";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// Longest input, in bytes, that is tokenized at all.
    pub max_input_len: usize,
    /// Dice (and repetitions) one evaluation may use; `None` for no limit.
    pub max_rolls: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_input_len: 256,
            max_rolls: Some(1000),
        }
    }
}

/// Tokenizes, parses and evaluates dice expressions and renders the outcome
/// as text.
pub struct DiceRoller<R = DefaultRoller> {
    config: Config,
    ctx: RollContext<R>,
}

impl DiceRoller {
    pub fn new(config: Config) -> Self {
        Self::with_roller(config, rand::thread_rng())
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<R: Roller> DiceRoller<R> {
    pub fn with_roller(config: Config, roller: R) -> Self {
        Self {
            config,
            ctx: RollContext::new(config.max_rolls, roller),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the tokens of `text` and the values it rolled.
    pub fn roll(&mut self, text: &str) -> Result<(Vec<Token>, Values), DiceError> {
        if text.len() > self.config.max_input_len {
            return Err(DiceError::InputTooLong {
                len: text.len(),
                max: self.config.max_input_len,
            });
        }

        let tokens = parse::tokenize(text)?;
        let node = parse::parse(&tokens).ok_or(DiceError::CannotParse)?;
        self.ctx.reset();
        let values = self.ctx.evaluate(&node)?;
        Ok((tokens, values))
    }

    /// Renders the token dump and the values, one per line, or
    /// [`CANNOT_PARSE`] if `text` could not be rolled.
    pub fn evaluate(&mut self, text: &str) -> String {
        match self.roll(text) {
            Ok((tokens, values)) => format_roll(&tokens, &values),
            Err(why) => {
                log::info!("cannot roll {:?}: {}", text, why);
                CANNOT_PARSE.to_owned()
            }
        }
    }
}

/// `[2=NUMBER, d6=DICE]` on the first line, `[7]` on the second.
pub fn format_roll(tokens: &[Token], values: &Values) -> String {
    let tokens = tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let values = values
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]\n[{}]", tokens, values)
}
