//! Core types and configuration for maru.
//!
//! This crate defines the `maru.yaml` schema ([`ProjectConfig`]), the flavor
//! registry ([`Flavor`], [`FlavorParams`]), the [`Prompter`] seam used by the
//! interactive setup, and shared error types.

pub mod config;
pub mod error;
pub mod flavor;
pub mod prompt;
pub mod setup;

pub use config::{CONFIG_FILE_NAME, GIT_TAG_ARG, ProjectConfig, Recipe, TOOL_VERSION};
pub use error::{Error, Result};
pub use flavor::{
    ExecutableParams, FijiMacroParams, Flavor, FlavorParams, JavaMavenParams, PythonCondaParams,
    list_flavors,
};
pub use prompt::{Prompter, ScriptedPrompter};
pub use setup::configure;
