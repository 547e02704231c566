//! What to do when an I2C transaction is not acknowledged

use embedded_hal::delay::DelayNs;

/// Retry policy for bus transactions
///
/// [`RetryPolicy::unbounded`] (the default) spins until the expander answers, which is what
/// the classic Arduino LCD backpack code does. A device that never answers hangs the caller.
/// [`RetryPolicy::bounded`] gives up and hands the last bus error back instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    backoff_us: u32,
}

impl RetryPolicy {
    /// Retry forever, no delay between attempts
    pub const fn unbounded() -> Self {
        Self {
            max_attempts: None,
            backoff_us: 0,
        }
    }

    /// Try at most `max_attempts` times (a value of 0 is treated as 1)
    pub const fn bounded(max_attempts: u32) -> Self {
        let max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        Self {
            max_attempts: Some(max_attempts),
            backoff_us: 0,
        }
    }

    /// Wait `backoff_us` between two attempts
    pub const fn with_backoff_us(mut self, backoff_us: u32) -> Self {
        self.backoff_us = backoff_us;
        self
    }

    #[allow(missing_docs)]
    pub fn get_max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    #[allow(missing_docs)]
    pub fn get_backoff_us(&self) -> u32 {
        self.backoff_us
    }

    /// Run `op` until it succeeds or the policy gives up
    pub fn run<T, E>(
        &self,
        delayer: &mut impl DelayNs,
        mut op: impl FnMut() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            let err = match op() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if let Some(max) = self.max_attempts {
                if attempt >= max {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("bus transaction failed, giving up after {} attempts", attempt);
                    return Err(err);
                }
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("bus transaction failed, attempt {}", attempt);

            if self.backoff_us > 0 {
                delayer.delay_us(self.backoff_us);
            }
        }
    }
}
