//! Workspace for the build script: manifest model and code generator.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_commands;
pub mod name_helpers;
