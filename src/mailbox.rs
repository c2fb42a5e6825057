use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// One-slot handoff of decoded command bytes from the edge context to the
/// control loop.
///
/// The edge context calls [`CommandMailbox::publish`]; the control loop calls
/// [`CommandMailbox::take`]. Each call holds a critical section only for the
/// duration of the read/clear or write. A command published before the previous
/// one was taken replaces it (latest wins, nothing is queued).
///
/// # Examples
/// ```
/// use fan_kit::CommandMailbox;
///
/// static MAILBOX: CommandMailbox = CommandMailbox::new();
///
/// MAILBOX.publish(0x30);
/// MAILBOX.publish(0x90);
/// assert_eq!(MAILBOX.take(), Some(0x90));
/// assert_eq!(MAILBOX.take(), None);
/// ```
pub struct CommandMailbox {
    slot: Mutex<CriticalSectionRawMutex, Cell<Option<u8>>>,
}

impl CommandMailbox {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Store a validated command, overwriting any undelivered one.
    pub fn publish(&self, command: u8) {
        self.slot.lock(|slot| slot.set(Some(command)));
    }

    /// Read and clear the pending command in one critical section.
    #[must_use]
    pub fn take(&self) -> Option<u8> {
        self.slot.lock(Cell::take)
    }

    /// Whether a command is waiting, without consuming it.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.slot.lock(|slot| slot.get().is_some())
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}
