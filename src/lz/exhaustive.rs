use super::{effective_window, match_length, MatchFinder, DEFAULT_WINDOW_SIZE};
use crate::deflate::tables::{MAX_MATCH, MIN_MATCH};
use crate::deflate::tokens::Candidate;
use crate::error::Result;

/// Scans every earlier position in the window
///
/// O(window) per call. Slow, but it finds every match, which makes it the
/// reference the other finders are checked against.
#[derive(Clone, Debug)]
pub struct ExhaustiveMatchFinder<'a> {
    input: &'a [u8],
    window_size: usize,
}

impl<'a> ExhaustiveMatchFinder<'a> {
    /// Create a finder with a window of `window_size` bytes (clamped to 1-32768)
    pub fn new(window_size: usize) -> Self {
        Self { input: &[], window_size: effective_window(window_size) }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl Default for ExhaustiveMatchFinder<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl<'a> MatchFinder<'a> for ExhaustiveMatchFinder<'a> {
    fn reset(&mut self, input: &'a [u8]) {
        self.input = input;
    }

    fn matches_at(&mut self, index: usize, out: &mut Vec<Candidate>) -> Result<()> {
        out.clear();
        let data = self.input;
        if index + MIN_MATCH as usize > data.len() {
            return Ok(());
        }

        let max_len = (MAX_MATCH as usize).min(data.len() - index);
        for older in index.saturating_sub(self.window_size)..index {
            let len = match_length(data, older, index, max_len);
            if len >= MIN_MATCH as usize {
                out.push(Candidate::new(len as u16, (index - older) as u16));
            }
        }
        Ok(())
    }
}
