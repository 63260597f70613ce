use std::collections::BTreeMap;
use std::path::Path;

use maru_core::ProjectConfig;

use crate::CommandError;
use crate::executor::{CommandExecutor, RealExecutor};

const DOCKER: &str = "docker";
const SHELL_ENTRYPOINT: &str = "/bin/bash";

/// Per-invocation container options from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// `KEY=VALUE` pairs passed with `-e`.
    pub env: Vec<String>,
    pub user: Option<String>,
}

impl RunOptions {
    fn push_flags(&self, out: &mut Vec<String>) {
        for e in &self.env {
            out.push("-e".to_owned());
            out.push(e.clone());
        }
        if let Some(user) = &self.user {
            out.push("--user".to_owned());
            out.push(user.clone());
        }
    }
}

/// `docker build` arguments: resolved build args in key order, then tags and context.
///
/// `overrides` replace or extend the configured build args for this call only,
/// and are resolved the same way.
pub fn build_args(
    config: &ProjectConfig,
    overrides: &BTreeMap<String, String>,
    context: &Path,
) -> Vec<String> {
    let mut resolved: BTreeMap<String, String> = config.resolved_build_args().into_iter().collect();
    resolved.extend(
        overrides
            .iter()
            .map(|(k, v)| (k.clone(), config.resolve_placeholders(v))),
    );

    let mut out = vec!["build".to_owned()];
    for (key, value) in resolved {
        out.push("--build-arg".to_owned());
        out.push(format!("{key}={value}"));
    }
    out.extend([
        "-t".to_owned(),
        config.latest_ref(),
        "-t".to_owned(),
        config.image_ref(),
        context_arg(context),
    ]);
    out
}

/// `docker run -i [-e K=V ...] [--user U] image [extra...]`
pub fn run_args(config: &ProjectConfig, opts: &RunOptions, extra: &[String]) -> Vec<String> {
    let mut out = args(["run", "-i"]);
    opts.push_flags(&mut out);
    out.push(config.image_ref());
    out.extend(extra.iter().cloned());
    out
}

/// `docker run -i -t [-e K=V ...] [--user U] --entrypoint /bin/bash image`
pub fn shell_args(config: &ProjectConfig, opts: &RunOptions) -> Vec<String> {
    let mut out = args(["run", "-i", "-t"]);
    opts.push_flags(&mut out);
    out.extend(args(["--entrypoint", SHELL_ENTRYPOINT]));
    out.push(config.image_ref());
    out
}

fn context_arg(context: &Path) -> String {
    if context.as_os_str().is_empty() {
        ".".to_owned()
    } else {
        context.display().to_string()
    }
}

/// Docker operations, parameterized over the executor for testability.
pub struct DockerClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Build ──

    pub async fn build(
        &self,
        config: &ProjectConfig,
        overrides: &BTreeMap<String, String>,
        context: &Path,
    ) -> Result<(), CommandError> {
        let args = build_args(config, overrides, context);
        tracing::info!(image = %config.image_ref(), "building image");
        self.executor.exec_streaming(DOCKER, &args).await
    }

    // ── Run ──

    pub async fn run(
        &self,
        config: &ProjectConfig,
        opts: &RunOptions,
        extra: &[String],
    ) -> Result<(), CommandError> {
        self.executor
            .exec_interactive(DOCKER, &run_args(config, opts, extra))
            .await
    }

    pub async fn shell(&self, config: &ProjectConfig, opts: &RunOptions) -> Result<(), CommandError> {
        self.executor
            .exec_interactive(DOCKER, &shell_args(config, opts))
            .await
    }

    // ── Push ──

    /// Tag and push the image to every remote, in list order.
    ///
    /// Both steps run for every remote regardless of earlier failures.
    pub async fn push(&self, config: &ProjectConfig) -> PushReport {
        let mut report = PushReport::default();
        let local = config.image_ref();

        for remote in &config.remotes {
            let target = config.remote_ref(remote);

            let tagged = self
                .executor
                .exec_streaming(DOCKER, &args(["tag", local.as_str(), target.as_str()]))
                .await;
            if let Err(e) = tagged {
                tracing::warn!(remote = %remote, error = %e, "docker tag failed");
                report.failures.push(PushFailure {
                    remote: remote.clone(),
                    step: PushStep::Tag,
                    error: e,
                });
            }

            match self
                .executor
                .exec_streaming(DOCKER, &args(["push", target.as_str()]))
                .await
            {
                Ok(()) => report.pushed.push(target),
                Err(e) => {
                    tracing::warn!(remote = %remote, error = %e, "docker push failed");
                    report.failures.push(PushFailure {
                        remote: remote.clone(),
                        step: PushStep::Push,
                        error: e,
                    });
                }
            }
        }

        report
    }

    // ── Status ──

    /// Whether the image is present in the local daemon.
    ///
    /// A failing inspect means the image is absent; a missing `docker`
    /// binary is still an error.
    pub async fn image_exists(&self, config: &ProjectConfig) -> Result<bool, CommandError> {
        let image = config.image_ref();
        match self
            .executor
            .exec(DOCKER, &args(["image", "inspect", "--format", "{{.Id}}", image.as_str()]))
            .await
        {
            Ok(_) => Ok(true),
            Err(CommandError::Failed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Default)]
pub struct PushReport {
    /// Remote references that were pushed.
    pub pushed: Vec<String>,
    pub failures: Vec<PushFailure>,
}

impl PushReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct PushFailure {
    pub remote: String,
    pub step: PushStep,
    pub error: CommandError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStep {
    Tag,
    Push,
}

impl std::fmt::Display for PushStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushStep::Tag => f.write_str("tag"),
            PushStep::Push => f.write_str("push"),
        }
    }
}

pub(crate) fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
