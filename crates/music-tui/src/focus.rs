//! FocusRing: keyboard focus cycling over a fixed set of items.

pub struct FocusRing<T> {
    items: Vec<T>,
    current: usize,
}

impl<T: Copy + PartialEq> FocusRing<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<T> {
        self.items.get(self.current).copied()
    }

    /// Position of the focused item in the ring.
    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn is_focused(&self, item: T) -> bool {
        self.current().map_or(false, |c| c == item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_directions() {
        let mut ring = FocusRing::new(vec!['a', 'b', 'c']);
        assert_eq!(ring.prev(), Some('c'));
        assert_eq!(ring.position(), 2);
        assert_eq!(ring.next(), Some('a'));
        assert_eq!(ring.position(), 0);
        assert!(ring.is_focused('a'));
    }

    #[test]
    fn test_empty_ring() {
        let mut ring: FocusRing<u8> = FocusRing::new(Vec::new());
        assert_eq!(ring.next(), None);
        assert_eq!(ring.prev(), None);
        assert_eq!(ring.current(), None);
    }
}
