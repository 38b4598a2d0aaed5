//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Command catalog shipped with the crate.
pub(crate) const COMMAND_MANIFEST_PATH: &str = "build_core/var/command_manifest.json";
/// Environment variable pointing at a deployment-specific catalog.
pub(crate) const COMMAND_MANIFEST_ENV: &str = "SATBRIDGE_COMMAND_MANIFEST";
/// Generated catalog file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_COMMAND_FILE_NAME: &str = "generated_commands.rs";
/// Reserved "infer from command" marker; never a valid default.
pub(crate) const INFERRED: u8 = 255;
/// Highest priority that still fits the 7-bit priority field of the CAN identifier.
pub(crate) const MAX_PRIORITY: u8 = 0x7F;
/// Length of a message body in bytes.
pub(crate) const BODY_LEN: u8 = 7;
