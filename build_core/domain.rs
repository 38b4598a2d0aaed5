use crate::build_core::conf::{BODY_LEN, INFERRED, MAX_PRIORITY};
use crate::build_core::errors::BuildError;
use crate::build_core::name_helpers::to_pascal_case;
use serde::Deserialize;
use std::collections::HashSet;

//==================================================================================MANIFEST
// Structures to deserialize `command_manifest.json`.
#[derive(Debug, Deserialize)]
/// Full command catalog.
pub(crate) struct Manifest {
    pub(crate) commands: Vec<CommandDef>,
}

#[derive(Debug, Deserialize)]
/// One command and the defaults used when a frame leaves fields to be inferred.
pub(crate) struct CommandDef {
    pub(crate) id: u8,
    pub(crate) name: String,
    pub(crate) priority: u8,
    pub(crate) body_size: u8,
}

impl CommandDef {
    /// Rust variant name (`CDH_SET_RTC` -> `CdhSetRtc`).
    pub(crate) fn variant_name(&self) -> String {
        to_pascal_case(&self.name)
    }
}

impl Manifest {
    /// The runtime table is indexed directly by command id, so ids must be unique,
    /// sorted and contiguous from zero. Defaults must never be the inferred marker.
    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        if self.commands.is_empty() {
            return Err(BuildError::EmptyManifest);
        }

        let mut variants = HashSet::new();
        for (index, command) in self.commands.iter().enumerate() {
            if command.id as usize != index {
                return Err(BuildError::NonContiguousId {
                    expected: index,
                    found: command.id,
                });
            }
            if command.priority == INFERRED || command.priority > MAX_PRIORITY {
                return Err(BuildError::InvalidDefault {
                    name: command.name.clone(),
                    field: "priority",
                    value: command.priority,
                });
            }
            if command.body_size > BODY_LEN {
                return Err(BuildError::InvalidDefault {
                    name: command.name.clone(),
                    field: "body_size",
                    value: command.body_size,
                });
            }
            if !variants.insert(command.variant_name()) {
                return Err(BuildError::DuplicateName {
                    name: command.name.clone(),
                });
            }
        }

        Ok(())
    }
}
