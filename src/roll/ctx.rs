use super::{error::RollError, roller::Roller, RResult};
use crate::common::*;
use crate::parse::Node;

pub type DefaultRoller = rand::rngs::ThreadRng;

/// What a semantic action may ask of whoever is evaluating it.
pub trait Evaluator {
    /// Draws one face of a die with `sides` faces.
    fn roll_die(&mut self, sides: NonZeroUInt) -> RResult<UInt>;

    /// Announces that a term is about to be evaluated `n` times over.
    fn repeat(&mut self, n: usize) -> RResult<()>;
}

/// Owns the random source for one evaluation and counts the dice it draws.
///
/// Each repetition of an `n term` expression counts as one roll towards
/// `max_rolls` as well, so large repeat counts are bounded even when the
/// repeated term holds no dice.
pub struct RollContext<R = DefaultRoller> {
    max_rolls: Option<usize>,
    rolls: usize,
    roller: R,
}

impl<R: Roller> RollContext<R> {
    pub fn new(max_rolls: Option<usize>, roller: R) -> Self {
        Self {
            max_rolls,
            rolls: 0,
            roller,
        }
    }

    pub fn new_bounded(max_rolls: usize, roller: R) -> Self {
        Self::new(Some(max_rolls), roller)
    }

    pub fn new_unbounded(roller: R) -> Self {
        Self::new(None, roller)
    }

    /// Rolls counted so far, repetitions included.
    pub fn rolls(&self) -> usize {
        self.rolls
    }

    pub fn roller(&self) -> &R {
        &self.roller
    }

    pub fn reset(&mut self) {
        self.rolls = 0;
    }

    fn count_rolls(&mut self, n: usize) -> RResult<()> {
        self.rolls = self.rolls.saturating_add(n);
        if self.max_rolls.map_or(false, |max| self.rolls > max) {
            Err(RollError::TooManyRolls)
        } else {
            Ok(())
        }
    }

    /// Evaluates `node`, drawing fresh dice for every die it contains.
    pub fn evaluate(&mut self, node: &Node<'_>) -> RResult<Values> {
        let values = node.evaluate(self)?;
        log::debug!("evaluated to {:?} using {} rolls", values, self.rolls);
        Ok(values)
    }
}

impl<R: Roller> Evaluator for RollContext<R> {
    fn roll_die(&mut self, sides: NonZeroUInt) -> RResult<UInt> {
        self.count_rolls(1)?;
        Ok(self.roller.roll(sides))
    }

    fn repeat(&mut self, n: usize) -> RResult<()> {
        self.count_rolls(n)
    }
}

/// Thread RNG with no roll budget; limits belong to [`Config`](crate::Config).
impl Default for RollContext {
    fn default() -> Self {
        Self::new_unbounded(rand::thread_rng())
    }
}
