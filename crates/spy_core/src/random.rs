//! Uniform random selection of the secret word and the spy.
//!
//! Randomness is injected through [`Entropy`] so tests can script the
//! exact picks. Rounds are independent: nothing here remembers who was
//! the spy before.

use rand::Rng;
use tracing::{debug, instrument};

use crate::{Player, PlayerId, Pool, SpyError, WordBank};

/// A source of uniform random indices.
pub trait Entropy {
    /// Returns an index uniformly distributed over `0..upper`.
    ///
    /// Callers guarantee `upper > 0`.
    fn index(&mut self, upper: usize) -> usize;
}

/// [`Entropy`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngEntropy<R>(R);

impl<R: Rng> RngEntropy<R> {
    /// Wraps a random number generator.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngEntropy<rand::rngs::ThreadRng> {
    /// Entropy drawn from the thread-local generator.
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> Entropy for RngEntropy<R> {
    fn index(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }
}

/// [`Entropy`] that replays a fixed sequence of indices, cycling.
///
/// Each scripted value is reduced modulo the requested bound.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    picks: Vec<usize>,
    cursor: usize,
}

impl ScriptedEntropy {
    /// Creates a scripted source. An empty script always yields zero.
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, cursor: 0 }
    }
}

impl Entropy for ScriptedEntropy {
    fn index(&mut self, upper: usize) -> usize {
        let pick = self.picks.get(self.cursor % self.picks.len().max(1)).copied().unwrap_or(0);
        self.cursor += 1;
        pick % upper
    }
}

/// Picks a word uniformly from the bank.
#[instrument(skip(bank, entropy), fields(bank_len = bank.len()))]
pub fn pick_word<E: Entropy + ?Sized>(bank: &WordBank, entropy: &mut E) -> Result<String, SpyError> {
    pick(bank.words(), Pool::Words, entropy).cloned()
}

/// Picks the spy uniformly from the roster.
#[instrument(skip(players, entropy), fields(player_count = players.len()))]
pub fn pick_spy<E: Entropy + ?Sized>(players: &[Player], entropy: &mut E) -> Result<PlayerId, SpyError> {
    pick(players, Pool::Players, entropy).map(|p| *p.id())
}

fn pick<'a, T, E: Entropy + ?Sized>(items: &'a [T], pool: Pool, entropy: &mut E) -> Result<&'a T, SpyError> {
    if items.is_empty() {
        return Err(SpyError::EmptyPool(pool));
    }
    let index = entropy.index(items.len());
    debug!(%pool, index, "Random pick");
    items.get(index).ok_or(SpyError::EmptyPool(pool))
}
