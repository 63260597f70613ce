//! Dockerfile generation and drift detection for maru.
//!
//! # Drift detection
//!
//! ```text
//! maru init
//!   scaffold()
//!     DockerfileRenderer::write()  ── "# <checksum>" + rendered template
//!     ProjectConfig::save()        ── only after the Dockerfile is in place
//! maru build
//!   drift()                        ── first line vs ProjectConfig::checksum()
//!     Missing   → generate
//!     Drifted   → offer to regenerate, or continue, or abort
//!     UpToDate  → build
//! ```
//!
//! Templates are embedded at compile time. Setting `MARU_TEMPLATE_DIR`
//! loads `<dir>/<flavor>.Dockerfile` instead, which is handy while editing
//! templates.

pub mod drift;
pub mod error;
pub mod render;
pub mod scaffold;

pub use drift::{DriftStatus, drift, read_checksum};
pub use error::RenderError;
pub use render::{
    DirStatus, DockerfileRenderer, TemplateSource, dockerfile_path, ensure_flavor_dirs,
    has_template, missing_macro,
};
pub use scaffold::{Scaffolded, scaffold};
