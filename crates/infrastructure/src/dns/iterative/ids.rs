use std::sync::Mutex;

/// Source of DNS transaction ids.
///
/// The engine draws one id per stage query. Swap in a deterministic source
/// to pin ids in tests.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> u16;
}

/// Uniformly random ids from `fastrand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> u16 {
        fastrand::u16(..)
    }
}

/// A seeded `fastrand` generator; the same seed yields the same id
/// sequence.
#[derive(Debug)]
pub struct SeededIds(Mutex<fastrand::Rng>);

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(fastrand::Rng::with_seed(seed)))
    }
}

impl IdSource for SeededIds {
    fn next_id(&self) -> u16 {
        match self.0.lock() {
            Ok(mut rng) => rng.u16(..),
            Err(poisoned) => poisoned.into_inner().u16(..),
        }
    }
}

impl<F> IdSource for F
where
    F: Fn() -> u16 + Send + Sync,
{
    fn next_id(&self) -> u16 {
        self()
    }
}
