use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Config store ──
    #[error("failed to read config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize project config")]
    ConfigSerialize { source: serde_yaml::Error },

    #[error("failed to write config to {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no maru project configuration found at {0}; run `maru init` first")]
    ConfigAbsent(PathBuf),

    // ── Validation ──
    #[error("unknown flavor '{0}' (valid flavors: {valid})", valid = crate::flavor::list_flavors().join(", "))]
    UnknownFlavor(String),

    #[error("flavor '{0}' is currently not supported")]
    UnsupportedFlavor(String),

    #[error("invalid repository URL '{url}': {reason}")]
    InvalidRepoUrl { url: String, reason: String },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("unrecognized variable '{0}' (supported variables: version, git_tag)")]
    UnknownVariable(String),

    #[error("remote '{0}' not found")]
    RemoteNotFound(String),

    #[error("there are no remotes configured for the current project")]
    NoRemotes,

    // ── Interaction ──
    #[error("{0}")]
    Aborted(String),

    #[error("interrupted")]
    Interrupted,

    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl Error {
    /// True when the user chose to stop; callers exit cleanly instead of failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Aborted(_) | Error::Interrupted)
    }
}
