use std::path::PathBuf;

use maru_core::Flavor;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("flavor '{0}' has no Dockerfile template; maintain the Dockerfile by hand")]
    NoTemplate(Flavor),

    #[error("failed to read template {path}")]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render template '{name}'")]
    Template { name: String, source: tera::Error },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] maru_core::Error),
}

impl RenderError {
    /// True when the user declined a prompt or interrupted it.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RenderError::Core(e) if e.is_cancellation())
    }
}
