//! Single-use slot shared between event handlers

use std::cell::RefCell;
use std::rc::Rc;

/// Holds a value that can be taken exactly once. Clones share the slot.
#[derive(Debug)]
pub struct OneShot<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> OneShot<T> {
    pub fn empty() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn fill(&self, value: T) {
        *self.slot.borrow_mut() = Some(value);
    }

    /// First caller gets the value, everyone after gets `None`
    pub fn take(&self) -> Option<T> {
        self.slot.borrow_mut().take()
    }
}

impl<T> Clone for OneShot<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_take_wins() {
        let shot = OneShot::empty();
        let handler = shot.clone();
        assert_eq!(handler.take(), None);

        shot.fill("resolve");
        assert_eq!(handler.take(), Some("resolve"));
        assert_eq!(shot.take(), None);
        assert_eq!(handler.take(), None);
    }
}
