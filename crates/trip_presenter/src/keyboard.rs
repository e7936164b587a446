//! Scoped keyboard listeners.
//!
//! An open form holds a [`KeySubscription`]; dropping it unregisters the
//! listener, so every exit path of a form releases it.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use shared::domain::PointId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
}

impl Key {
    pub fn is_escape(self) -> bool {
        self == Key::Escape
    }
}

/// Which form a listener belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerOwner {
    Point(PointId),
    NewPoint,
}

#[derive(Debug, Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, ListenerOwner)>,
}

#[derive(Debug, Clone, Default)]
pub struct KeyListeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl KeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, owner: ListenerOwner) -> KeySubscription {
        let mut table = self.table.borrow_mut();
        table.next_id += 1;
        let id = table.next_id;
        table.entries.push((id, owner));
        KeySubscription {
            id,
            table: Rc::downgrade(&self.table),
        }
    }

    /// Owners of live subscriptions, oldest first.
    pub fn owners(&self) -> Vec<ListenerOwner> {
        self.table
            .borrow()
            .entries
            .iter()
            .map(|(_, owner)| owner.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct KeySubscription {
    id: u64,
    table: Weak<RefCell<ListenerTable>>,
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
#[path = "tests/keyboard_tests.rs"]
mod tests;
