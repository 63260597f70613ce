use std::path::{Path, PathBuf};

use maru_core::{Error as CoreError, FijiMacroParams, Flavor, FlavorParams, ProjectConfig, Prompter};
use tera::{Context, Tera};

use crate::RenderError;

/// Environment variable pointing at a directory of `<flavor>.Dockerfile` templates.
pub const TEMPLATE_DIR_ENV: &str = "MARU_TEMPLATE_DIR";

pub const DOCKERFILE_NAME: &str = "Dockerfile";

const OVERWRITE_PROMPT: &str = "Found existing Dockerfile. Replace?";

/// Where templates are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary.
    #[default]
    Embedded,
    /// `<dir>/<flavor>.Dockerfile` files on disk.
    Directory(PathBuf),
}

impl TemplateSource {
    /// `Directory` when `MARU_TEMPLATE_DIR` is set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var_os(TEMPLATE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => TemplateSource::Directory(PathBuf::from(dir)),
            _ => TemplateSource::Embedded,
        }
    }

    fn load(&self, flavor: Flavor) -> Result<String, RenderError> {
        match self {
            TemplateSource::Embedded => embedded_template(flavor)
                .map(str::to_owned)
                .ok_or(RenderError::NoTemplate(flavor)),
            TemplateSource::Directory(dir) => {
                if !has_template(flavor) {
                    return Err(RenderError::NoTemplate(flavor));
                }
                let path = dir.join(format!("{flavor}.{DOCKERFILE_NAME}"));
                tracing::debug!(path = %path.display(), "loading template from disk");
                std::fs::read_to_string(&path)
                    .map_err(|e| RenderError::TemplateRead { path, source: e })
            }
        }
    }
}

fn embedded_template(flavor: Flavor) -> Option<&'static str> {
    match flavor {
        Flavor::Executable => Some(include_str!("../templates/executable.Dockerfile.tera")),
        Flavor::PythonConda => Some(include_str!("../templates/python_conda.Dockerfile.tera")),
        Flavor::JavaMaven => Some(include_str!("../templates/java_maven.Dockerfile.tera")),
        Flavor::JavafxMaven => Some(include_str!("../templates/javafx_maven.Dockerfile.tera")),
        Flavor::FijiMacro => Some(include_str!("../templates/fiji_macro.Dockerfile.tera")),
        Flavor::Custom | Flavor::MatlabCompiled => None,
    }
}

/// Whether maru generates the Dockerfile for `flavor`.
pub fn has_template(flavor: Flavor) -> bool {
    embedded_template(flavor).is_some()
}

pub fn dockerfile_path(project_dir: &Path) -> PathBuf {
    project_dir.join(DOCKERFILE_NAME)
}

/// Renders a project's Dockerfile from its flavor template.
///
/// The output always starts with `# <checksum>` so a later build can tell
/// whether the config changed since the file was generated. The git tag is
/// left to `ARG GIT_TAG`, so `maru set git_tag` needs no regeneration.
#[derive(Debug, Clone, Default)]
pub struct DockerfileRenderer {
    source: TemplateSource,
}

impl DockerfileRenderer {
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    pub fn render(&self, config: &ProjectConfig) -> Result<String, RenderError> {
        let flavor = config.flavor.flavor();
        let template = self.source.load(flavor)?;
        let name = format!("{flavor}.{DOCKERFILE_NAME}");

        let template_err = |e: tera::Error| RenderError::Template {
            name: name.clone(),
            source: e,
        };
        let mut tera = Tera::default();
        tera.add_raw_template(&name, &template)
            .map_err(template_err)?;

        // Templates see the recipe and nothing else, so the checksum covers all of it.
        let checksum = config.checksum();
        let mut context = Context::from_serialize(config.recipe()).map_err(template_err)?;
        context.insert("checksum", &checksum);

        let body = tera.render(&name, &context).map_err(template_err)?;
        tracing::debug!(%flavor, %checksum, "rendered Dockerfile");
        Ok(format!("# {checksum}\n{body}"))
    }

    /// Render and write `<project_dir>/Dockerfile`.
    ///
    /// An existing file is only replaced after the user confirms, unless
    /// `force` is set; declining yields an `Aborted` error and leaves the
    /// file untouched.
    pub fn write(
        &self,
        project_dir: &Path,
        config: &ProjectConfig,
        prompter: &mut dyn Prompter,
        force: bool,
    ) -> Result<PathBuf, RenderError> {
        let path = dockerfile_path(project_dir);
        if path.exists() && !force && !prompter.confirm(OVERWRITE_PROMPT, true)? {
            return Err(CoreError::Aborted("Dockerfile left unchanged".to_owned()).into());
        }

        let content = self.render(config)?;
        std::fs::write(&path, content).map_err(|e| RenderError::Write {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "wrote Dockerfile");
        Ok(path)
    }
}

/// Outcome of ensuring one flavor directory exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirStatus {
    Created(PathBuf),
    Existing(PathBuf),
}

/// Create the directories a flavor expects inside the project.
pub fn ensure_flavor_dirs(
    project_dir: &Path,
    config: &ProjectConfig,
) -> Result<Vec<DirStatus>, RenderError> {
    let FlavorParams::FijiMacro(params) = &config.flavor else {
        return Ok(Vec::new());
    };
    [&params.plugin_dir, &params.macro_dir]
        .into_iter()
        .map(|rel| {
            let path = project_dir.join(rel);
            if path.is_dir() {
                return Ok(DirStatus::Existing(path));
            }
            std::fs::create_dir_all(&path).map_err(|e| RenderError::CreateDir {
                path: path.clone(),
                source: e,
            })?;
            Ok(DirStatus::Created(path))
        })
        .collect()
}

/// Path of the Fiji macro when the flavor expects one that does not exist yet.
pub fn missing_macro(project_dir: &Path, config: &ProjectConfig) -> Option<PathBuf> {
    match &config.flavor {
        FlavorParams::FijiMacro(params) => {
            let path = macro_file(project_dir, params);
            (!path.is_file()).then_some(path)
        }
        _ => None,
    }
}

fn macro_file(project_dir: &Path, params: &FijiMacroParams) -> PathBuf {
    project_dir.join(params.macro_path())
}
