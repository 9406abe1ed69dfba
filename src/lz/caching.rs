use super::MatchFinder;
use crate::deflate::tokens::Candidate;
use crate::error::Result;
use std::ops::Range;

/// Slot for a position whose candidates are not cached yet
const EMPTY: (u32, u16) = (u32::MAX, 0);

/// Memoizes another finder's results for a range of positions
///
/// Only positions inside the focused range are cached; lookups outside it go
/// straight to the wrapped finder. [`reset`](MatchFinder::reset) focuses the
/// whole buffer, [`focus`](Self::focus) narrows the cache to one block and
/// frees everything cached before. A fresh wrapper caches nothing until one of
/// the two is called. Candidates share one flat pool, so each
/// cached position costs a slot plus its candidates.
#[derive(Clone, Debug)]
pub struct CachingMatchFinder<F> {
    inner: F,
    base: usize,
    /// (offset into `pool`, count) per position from `base`
    slots: Vec<(u32, u16)>,
    pool: Vec<Candidate>,
    hits: u64,
    misses: u64,
}

impl<F> CachingMatchFinder<F> {
    pub fn new(inner: F) -> Self {
        Self { inner, base: 0, slots: Vec::new(), pool: Vec::new(), hits: 0, misses: 0 }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Drop the cache and start caching `range` only
    pub fn focus(&mut self, range: Range<usize>) {
        self.base = range.start;
        self.slots.clear();
        self.slots.shrink_to(range.len());
        self.slots.resize(range.len(), EMPTY);
        self.pool.clear();
    }

    /// Positions cached so far in the current focus
    pub fn cached_positions(&self) -> usize {
        self.slots.iter().filter(|&&slot| slot != EMPTY).count()
    }

    /// Lookups answered from the cache since the last reset
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups forwarded to the wrapped finder since the last reset
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl<'a, F: MatchFinder<'a>> MatchFinder<'a> for CachingMatchFinder<F> {
    fn reset(&mut self, input: &'a [u8]) {
        self.inner.reset(input);
        self.focus(0..input.len());
        self.hits = 0;
        self.misses = 0;
    }

    fn matches_at(&mut self, index: usize, out: &mut Vec<Candidate>) -> Result<()> {
        let slot = index.checked_sub(self.base).filter(|&i| i < self.slots.len());
        if let Some(i) = slot {
            let (offset, count) = self.slots[i];
            if offset != EMPTY.0 {
                let offset = offset as usize;
                out.clear();
                out.extend_from_slice(&self.pool[offset..offset + count as usize]);
                self.hits += 1;
                return Ok(());
            }
        }

        self.inner.matches_at(index, out)?;
        self.misses += 1;
        if let Some(i) = slot {
            // Positions past a u32 pool offset are simply not cached
            if let Ok(offset) = u32::try_from(self.pool.len()) {
                if offset != EMPTY.0 {
                    self.slots[i] = (offset, out.len() as u16);
                    self.pool.extend_from_slice(out);
                }
            }
        }
        Ok(())
    }
}
