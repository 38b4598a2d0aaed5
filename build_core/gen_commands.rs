//! Generate the `CmdId` enumeration and the default command table.
use super::domain::*;
use super::errors::*;

use std::fmt::Write;

/// Emit the whole catalog as Rust source.
pub(crate) fn run_commands_gen(manifest: &Manifest) -> Result<String, BuildError> {
    let mut code = String::new();
    let count = manifest.commands.len();

    writeln!(code, "// @generated by build.rs from the command manifest. Do not edit.")?;
    writeln!(code)?;

    // ---- enum
    writeln!(code, "/// Command identifiers known on the bus.")?;
    writeln!(code, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(
        code,
        "#[cfg_attr(feature = \"defmt\", derive(defmt::Format))]"
    )?;
    writeln!(code, "#[repr(u8)]")?;
    writeln!(code, "pub enum CmdId {{")?;
    for command in &manifest.commands {
        writeln!(code, "    /// `{}`", command.name)?;
        writeln!(code, "    {} = {},", command.variant_name(), command.id)?;
    }
    writeln!(code, "}}")?;
    writeln!(code)?;

    // ---- inherent helpers
    writeln!(code, "impl CmdId {{")?;
    writeln!(code, "    /// Every known command, in id order.")?;
    writeln!(code, "    pub const ALL: [CmdId; {count}] = [")?;
    for command in &manifest.commands {
        writeln!(code, "        CmdId::{},", command.variant_name())?;
    }
    writeln!(code, "    ];")?;
    writeln!(code)?;
    writeln!(code, "    /// Raw wire identifier.")?;
    writeln!(code, "    pub const fn id(self) -> u8 {{")?;
    writeln!(code, "        self as u8")?;
    writeln!(code, "    }}")?;
    writeln!(code)?;
    writeln!(code, "    /// Name as written in the command manifest.")?;
    writeln!(code, "    pub const fn name(self) -> &'static str {{")?;
    writeln!(code, "        match self {{")?;
    for command in &manifest.commands {
        writeln!(
            code,
            "            CmdId::{} => \"{}\",",
            command.variant_name(),
            command.name
        )?;
    }
    writeln!(code, "        }}")?;
    writeln!(code, "    }}")?;
    writeln!(code)?;
    writeln!(code, "    /// Defaults applied to inferred fields of this command.")?;
    writeln!(code, "    pub const fn config(self) -> CommandConfig {{")?;
    writeln!(code, "        DEFAULT_COMMAND_CONFIGS[self as usize]")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    writeln!(code)?;

    // ---- TryFrom<u8>
    writeln!(code, "impl TryFrom<u8> for CmdId {{")?;
    writeln!(code, "    type Error = u8;")?;
    writeln!(code)?;
    writeln!(code, "    fn try_from(value: u8) -> Result<Self, Self::Error> {{")?;
    writeln!(code, "        match value {{")?;
    for command in &manifest.commands {
        writeln!(
            code,
            "            {} => Ok(CmdId::{}),",
            command.id,
            command.variant_name()
        )?;
    }
    writeln!(code, "            other => Err(other),")?;
    writeln!(code, "        }}")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    writeln!(code)?;

    // ---- table
    writeln!(code, "/// Number of commands in the catalog.")?;
    writeln!(code, "pub const COMMAND_COUNT: usize = {count};")?;
    writeln!(code)?;
    writeln!(
        code,
        "/// Default `(priority, body_size)` per command, indexed by command id."
    )?;
    writeln!(
        code,
        "pub const DEFAULT_COMMAND_CONFIGS: [CommandConfig; COMMAND_COUNT] = ["
    )?;
    for command in &manifest.commands {
        writeln!(
            code,
            "    CommandConfig::new({}, {}), // {}",
            command.priority, command.body_size, command.name
        )?;
    }
    writeln!(code, "];")?;

    Ok(code)
}
