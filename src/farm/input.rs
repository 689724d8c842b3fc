use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// The five keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Scythe,
}

impl Key {
    /// Map a `KeyboardEvent.key` value. Everything unrecognized is `None`.
    pub fn from_key_name(name: &str) -> Option<Key> {
        match name {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            " " => Some(Key::Scythe),
            _ => None,
        }
    }
}

/// Source of key presses polled by the session once per frame.
pub trait InputSource {
    fn poll(&mut self) -> Option<Key>;
}

/// FIFO of pending keys. Clones share the same queue, so the keyboard listener
/// can push while the frame loop drains. A closed queue drops pushes.
#[derive(Clone, Debug, Default)]
pub struct KeyQueue {
    pending: Rc<RefCell<VecDeque<Key>>>,
    closed: Rc<Cell<bool>>,
}

impl KeyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, key: Key) {
        if self.closed.get() {
            return;
        }
        self.pending.borrow_mut().push_back(key);
    }

    /// Open or close the queue for every clone. New queues start open.
    pub fn set_open(&self, open: bool) {
        self.closed.set(!open);
    }

    pub fn is_open(&self) -> bool {
        !self.closed.get()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }
}

impl InputSource for KeyQueue {
    fn poll(&mut self) -> Option<Key> {
        self.pending.borrow_mut().pop_front()
    }
}
