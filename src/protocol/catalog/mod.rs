//! Command catalog generated at build time from the command manifest.
//! `generated_commands.rs` exposes [`CmdId`], [`COMMAND_COUNT`] and the
//! [`DEFAULT_COMMAND_CONFIGS`] table consumed by the frame codec.
include!(concat!(env!("OUT_DIR"), "/generated_commands.rs"));

use crate::core::CommandConfig;
use crate::infra::codec::table::CommandTable;

/// Table built from the manifest compiled into the crate.
pub const fn builtin_table() -> CommandTable<'static> {
    CommandTable::new(&DEFAULT_COMMAND_CONFIGS)
}

//==================================================================================NODE_ID
/// Bus endpoints. Two bits on the CAN identifier, so four at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum NodeId {
    /// Command and data handling.
    Cdh = 0,
    /// Power board.
    Pwr = 1,
    /// Attitude determination and control.
    Adcs = 2,
    /// Payload.
    Pld = 3,
}

impl NodeId {
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            NodeId::Cdh => "CDH",
            NodeId::Pwr => "PWR",
            NodeId::Adcs => "ADCS",
            NodeId::Pld => "PLD",
        }
    }
}

impl TryFrom<u8> for NodeId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NodeId::Cdh),
            1 => Ok(NodeId::Pwr),
            2 => Ok(NodeId::Adcs),
            3 => Ok(NodeId::Pld),
            other => Err(other),
        }
    }
}
