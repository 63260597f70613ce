mod build;
mod init;
mod push;
mod remote;
mod run;
mod set;
mod singularity;
mod status;
mod version;

use std::path::{Path, PathBuf};

use maru_build::TemplateSource;
use maru_core::ProjectConfig;
use maru_docker::RunOptions;

pub use build::build;
pub use init::init_project;
pub use push::push;
pub use remote::{remote_add, remote_list, remote_remove};
pub use run::{run, shell};
pub use set::set;
pub use singularity::{singularity_build, singularity_run};
pub use status::status;
pub use version::version;

/// Runtime options from the global flags, passed to every command.
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub config_path: PathBuf,
    pub debug: bool,
    /// `KEY=VALUE` pairs for containers started by `run`, `shell` and `singularity run`.
    pub env: Vec<String>,
    pub user: Option<String>,
}

impl GlobalOpts {
    /// Directory holding the config file; also the build context.
    pub fn project_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn load(&self) -> anyhow::Result<ProjectConfig> {
        Ok(ProjectConfig::load_mandatory(&self.config_path)?)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            env: self.env.clone(),
            user: self.user.clone(),
        }
    }

    pub fn template_source(&self) -> TemplateSource {
        let source = TemplateSource::from_env();
        if self.debug {
            tracing::debug!(?source, "template source");
        }
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(path: &str) -> GlobalOpts {
        GlobalOpts {
            config_path: PathBuf::from(path),
            debug: false,
            env: vec!["A=1".to_owned()],
            user: Some("1000".to_owned()),
        }
    }

    #[test]
    fn project_dir_is_config_parent() {
        assert_eq!(opts("maru.yaml").project_dir(), PathBuf::from("."));
        assert_eq!(
            opts("projects/seg/maru.yaml").project_dir(),
            PathBuf::from("projects/seg")
        );
    }

    #[test]
    fn run_options_mirror_global_flags() {
        let run = opts("maru.yaml").run_options();
        assert_eq!(run.env, ["A=1"]);
        assert_eq!(run.user.as_deref(), Some("1000"));
    }
}
