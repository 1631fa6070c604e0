use crate::common::{NonZeroUInt, UInt};
use rand::Rng;

/// A source of die faces.
pub trait Roller {
    /// Returns a face in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;

    /// Deterministic roller yielding `initial`, `initial + step`, ... wrapped
    /// into the die's range.
    pub(crate) struct StepRoller {
        current: UInt,
        step: UInt,
        pub(crate) rolls: usize,
    }

    impl StepRoller {
        pub fn new(initial: NonZeroUInt, step: UInt) -> Self {
            Self {
                current: initial.get(),
                step,
                rolls: 0,
            }
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, sides: NonZeroUInt) -> UInt {
            let ret = (self.current - 1) % sides.get() + 1;
            self.current += self.step;
            self.rolls += 1;
            ret
        }
    }
}
