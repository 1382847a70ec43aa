use bevy::prelude::*;

/// Releases once after exactly `expected` signals, in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionBarrier {
    expected: usize,
    count: usize,
    released: bool,
}

impl CompletionBarrier {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            count: 0,
            released: false,
        }
    }

    /// Record one arrival. Returns true on the signal that releases the barrier.
    pub fn signal(&mut self) -> bool {
        if self.count >= self.expected {
            error!(
                target: "counting",
                "barrier signalled {} times, expected {}", self.count + 1, self.expected
            );
            debug_assert!(self.count < self.expected, "barrier over-signalled");
            return false;
        }
        self.count += 1;
        if self.count == self.expected {
            self.released = true;
            return true;
        }
        false
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_on_last_signal_only() {
        let mut b = CompletionBarrier::new(3);
        assert!(!b.signal());
        assert!(!b.signal());
        assert!(!b.is_released());
        assert!(b.signal());
        assert!(b.is_released());
        assert_eq!(b.count(), 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "over-signalled")]
    fn extra_signal_is_a_bug() {
        let mut b = CompletionBarrier::new(1);
        b.signal();
        b.signal();
    }
}
