//! Read-only `command -> (priority, body_size)` defaults, indexed directly by
//! command id. Lookups are range-checked: a command outside the table is an
//! error, never an out-of-bounds read.
use crate::core::{CommandConfig, Message, INFERRED};
use crate::error::DecodeError;

//==================================================================================COMMAND_TABLE
/// Borrowed view over a command configuration table.
///
/// The table is populated once at startup and shared read-only between interrupt
/// handlers and tasks, so it is `Copy` and carries no interior state.
#[derive(Debug, Clone, Copy)]
pub struct CommandTable<'t> {
    entries: &'t [CommandConfig],
}

impl<'t> CommandTable<'t> {
    /// Wrap `entries`, where `entries[c]` holds the defaults of command `c`.
    pub const fn new(entries: &'t [CommandConfig]) -> Self {
        Self { entries }
    }

    /// Number of commands covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Defaults for `command`, if the table covers it.
    #[inline]
    pub fn lookup(&self, command: u8) -> Option<&'t CommandConfig> {
        self.entries.get(command as usize)
    }

    /// Replace every [`INFERRED`] field of `message` with the command default.
    ///
    /// Messages without inferred fields pass through untouched, even when the
    /// command is unknown. An entry whose own default is the marker is treated
    /// as absent so that a resolved message never carries [`INFERRED`].
    pub fn resolve(&self, message: &mut Message) -> Result<(), DecodeError> {
        if message.is_resolved() {
            return Ok(());
        }

        let unknown = DecodeError::UnknownCommand {
            command: message.command,
        };
        let config = self.lookup(message.command).ok_or(unknown)?;

        let body_size = match message.body_size {
            INFERRED => config.body_size,
            explicit => explicit,
        };
        let priority = match message.priority {
            INFERRED => config.priority,
            explicit => explicit,
        };
        if body_size == INFERRED || priority == INFERRED {
            return Err(unknown);
        }

        message.body_size = body_size;
        message.priority = priority;
        Ok(())
    }
}
