use std::path::{Path, PathBuf};

use maru_core::ProjectConfig;

use crate::CommandError;
use crate::docker::args;
use crate::executor::{CommandExecutor, RealExecutor};

const SINGULARITY: &str = "singularity";

/// Default SIF location: `<dir>/<name>_<version>.sif`.
pub fn default_output(config: &ProjectConfig, dir: &Path) -> PathBuf {
    dir.join(format!("{}_{}.sif", config.name, config.resolve_version()))
}

/// `singularity build <out> docker-daemon://image`
pub fn build_args(config: &ProjectConfig, output: &Path) -> Vec<String> {
    vec![
        "build".to_owned(),
        output.display().to_string(),
        format!("docker-daemon://{}", config.image_ref()),
    ]
}

/// `singularity run [--env K=V ...] docker-daemon:image [extra...]`
pub fn run_args(config: &ProjectConfig, env: &[String], extra: &[String]) -> Vec<String> {
    let mut out = args(["run"]);
    for e in env {
        out.push("--env".to_owned());
        out.push(e.clone());
    }
    out.push(format!("docker-daemon:{}", config.image_ref()));
    out.extend(extra.iter().cloned());
    out
}

/// Singularity conversions of the locally built Docker image.
pub struct SingularityClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl SingularityClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for SingularityClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> SingularityClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Probe PATH for the `singularity` binary.
    pub async fn is_available(&self) -> bool {
        match self
            .executor
            .exec("sh", &args(["-c", "command -v singularity"]))
            .await
        {
            Ok(path) => {
                tracing::debug!(path = path.trim(), "found singularity");
                !path.trim().is_empty()
            }
            Err(e) => {
                tracing::debug!(error = %e, "singularity not available");
                false
            }
        }
    }

    pub async fn build(&self, config: &ProjectConfig, output: &Path) -> Result<(), CommandError> {
        self.executor
            .exec_streaming(SINGULARITY, &build_args(config, output))
            .await
    }

    pub async fn run(
        &self,
        config: &ProjectConfig,
        env: &[String],
        extra: &[String],
    ) -> Result<(), CommandError> {
        self.executor
            .exec_interactive(SINGULARITY, &run_args(config, env, extra))
            .await
    }
}
