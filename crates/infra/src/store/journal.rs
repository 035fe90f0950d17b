use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockSpace {
    /// Reminders and their notifications
    Reminders,
    AddressBook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEvent {
    Acquired(LockSpace, LockMode),
    Released(LockSpace),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("lock on the reminder space acquired while holding the address book (event #{position})")]
pub struct LockOrderViolation {
    /// Index of the offending acquisition in `LockJournal::events`
    pub position: usize,
}

/// Records every lock acquisition and release of a `Store` handle so that
/// tests can audit the lock order of a complete operation.
#[derive(Debug, Default)]
pub struct LockJournal {
    events: Mutex<Vec<LockEvent>>,
}

impl LockJournal {
    pub fn new() -> Self {
        Default::default()
    }

    fn events_mut(&self) -> MutexGuard<'_, Vec<LockEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn record(&self, event: LockEvent) {
        self.events_mut().push(event);
    }

    pub fn events(&self) -> Vec<LockEvent> {
        self.events_mut().clone()
    }

    /// The reminder space must always be locked before the address book.
    /// Fails on the first acquisition of the reminder space that happens
    /// while an address book lock is still held.
    pub fn verify_order(&self) -> Result<(), LockOrderViolation> {
        let mut address_book_held = 0usize;
        for (position, event) in self.events_mut().iter().enumerate() {
            match event {
                LockEvent::Acquired(LockSpace::AddressBook, _) => address_book_held += 1,
                LockEvent::Released(LockSpace::AddressBook) => {
                    address_book_held = address_book_held.saturating_sub(1)
                }
                LockEvent::Acquired(LockSpace::Reminders, _) if address_book_held > 0 => {
                    return Err(LockOrderViolation { position });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
