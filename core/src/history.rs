use serde::Serialize;
use smallvec::SmallVec;

pub const MATCH_HISTORY_LEN: usize = 3;

/// Most recently matched symbols, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatchHistory {
    entries: SmallVec<[&'static str; MATCH_HISTORY_LEN]>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: &'static str) {
        self.entries.insert(0, symbol);
        self.entries.truncate(MATCH_HISTORY_LEN);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn as_slice(&self) -> &[&'static str] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_and_bounded() {
        let mut history = MatchHistory::new();
        for symbol in ["a", "b", "c", "d"] {
            history.push(symbol);
        }

        assert_eq!(history.as_slice(), &["d", "c", "b"]);
        assert_eq!(history.len(), MATCH_HISTORY_LEN);
    }

    #[test]
    fn clear_empties() {
        let mut history = MatchHistory::new();
        history.push("a");
        history.clear();
        assert!(history.is_empty());
    }
}
