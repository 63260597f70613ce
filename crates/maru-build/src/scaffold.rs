use std::path::{Path, PathBuf};

use maru_core::{ProjectConfig, Prompter};

use crate::RenderError;
use crate::render::{DirStatus, DockerfileRenderer, ensure_flavor_dirs, has_template, missing_macro};

/// Files touched by [`scaffold`] besides the config itself.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Scaffolded {
    /// `None` for flavors without a template.
    pub dockerfile: Option<PathBuf>,
    pub dirs: Vec<DirStatus>,
    pub missing_macro: Option<PathBuf>,
}

/// Generate the project files for `config`, then save it to `config_path`.
///
/// The config is saved last. Declining to replace an existing Dockerfile
/// returns `Aborted` with nothing on disk changed.
pub fn scaffold(
    renderer: &DockerfileRenderer,
    project_dir: &Path,
    config_path: &Path,
    config: &mut ProjectConfig,
    prompter: &mut dyn Prompter,
) -> Result<Scaffolded, RenderError> {
    let mut out = Scaffolded::default();
    if has_template(config.flavor.flavor()) {
        out.dockerfile = Some(renderer.write(project_dir, config, prompter, false)?);
        out.dirs = ensure_flavor_dirs(project_dir, config)?;
        out.missing_macro = missing_macro(project_dir, config);
    }
    config.save(config_path)?;
    tracing::debug!(config = %config_path.display(), "project scaffolded");
    Ok(out)
}
