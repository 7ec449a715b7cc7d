//! Bounded conversation-memory window.

use std::collections::VecDeque;

/// One user/assistant exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

/// Keeps the last `window` exchanges; older ones fall off the front.
#[derive(Debug)]
pub struct ConversationMemory {
    window: usize,
    exchanges: VecDeque<Exchange>,
}

impl ConversationMemory {
    /// Default window of 5 exchanges.
    pub fn new() -> Self {
        Self::with_window(5)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
            exchanges: VecDeque::new(),
        }
    }

    pub fn record(&mut self, user: String, assistant: String) {
        if self.exchanges.len() >= self.window {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(Exchange { user, assistant });
    }

    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_last_five_exchanges() {
        let mut memory = ConversationMemory::new();
        for i in 0..7 {
            memory.record(format!("q{}", i), format!("a{}", i));
        }
        assert_eq!(memory.len(), 5);
        let first = memory.exchanges().next().unwrap();
        assert_eq!(first.user, "q2");
        let last = memory.exchanges().last().unwrap();
        assert_eq!(last.assistant, "a6");
    }

    #[test]
    fn window_of_zero_still_keeps_one() {
        let mut memory = ConversationMemory::with_window(0);
        memory.record("q".into(), "a".into());
        memory.record("q2".into(), "a2".into());
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.exchanges().next().unwrap().user, "q2");
    }
}
