//! Cargo build script: generates the command catalog (identifiers and default table).

mod build_core;
use crate::build_core::{
    conf::*, domain::Manifest, errors::BuildError, gen_commands::run_commands_gen,
};

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

// The bus commands and their default priority/body size live in a JSON manifest so that
// deployments can swap the catalog without touching the relay code. This script validates
// the manifest and turns it into a `CmdId` enum plus the static table the codec resolves
// inferred fields against.

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={COMMAND_MANIFEST_PATH}");
    println!("cargo:rerun-if-env-changed={COMMAND_MANIFEST_ENV}");

    // 1. Locate the manifest.
    // Priority order:
    //   1. SATBRIDGE_COMMAND_MANIFEST environment variable (absolute or relative path)
    //   2. Default manifest shipped with the crate
    let default_manifest_path =
        PathBuf::from_str(COMMAND_MANIFEST_PATH).map_err(|_| BuildError::ReadPath {
            path: COMMAND_MANIFEST_PATH,
        })?;

    let user_manifest_path = std::env::var(COMMAND_MANIFEST_ENV)
        .ok()
        .map(PathBuf::from);

    let manifest_path = match user_manifest_path {
        Some(path) if path.exists() => {
            println!("cargo:warning=Using custom command manifest from {:?}", path);
            println!("cargo:rerun-if-changed={}", path.display());
            path
        }
        Some(path) => {
            println!(
                "cargo:warning=Custom command manifest not found: {:?}, falling back to the default",
                path
            );
            default_manifest_path
        }
        None => default_manifest_path,
    };

    // 2. Parse and validate.
    let manifest_string =
        fs::read_to_string(&manifest_path).map_err(|e| BuildError::ReadFile {
            path: manifest_path.to_path_buf(),
            source: e,
        })?;
    let manifest: Manifest = serde_json::from_str(&manifest_string)?;
    manifest.validate()?;

    // 3. Generate code.
    let buffer_command_code = run_commands_gen(&manifest)?;

    // 4. Write the generated code into `OUT_DIR`.
    // `src/protocol/catalog/mod.rs` pulls it in through `include!`.
    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let command_file_path = PathBuf::from(out_dir_str).join(OUT_DIR_COMMAND_FILE_NAME);

    fs::write(&command_file_path, &buffer_command_code).map_err(|e| BuildError::WriteFile {
        path: command_file_path,
        source: e,
    })?;

    Ok(())
}
