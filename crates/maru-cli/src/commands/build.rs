use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::Path;

use maru_build::{DockerfileRenderer, DriftStatus, dockerfile_path, drift, has_template};
use maru_core::{Error, ProjectConfig, Prompter};
use maru_docker::DockerClient;

use super::GlobalOpts;
use crate::output;
use crate::prompt::TerminalPrompter;

pub async fn build(opts: &GlobalOpts, build_args: Vec<(String, String)>) -> anyhow::Result<()> {
    let config = opts.load()?;
    let project_dir = opts.project_dir();

    if has_template(config.flavor.flavor()) {
        ensure_current_dockerfile(opts, &project_dir, &config)?;
    } else if !dockerfile_path(&project_dir).exists() {
        output::warn(format!("No Dockerfile found in {}", project_dir.display()));
    }

    let overrides: BTreeMap<String, String> = build_args.into_iter().collect();
    output::info(format!("Building `{}`", config.image_ref()));
    match DockerClient::new()
        .build(&config, &overrides, &project_dir)
        .await
    {
        Ok(()) => output::success(format!(
            "Built `{}` and `{}`",
            config.image_ref(),
            config.latest_ref()
        )),
        Err(e) => output::error(e),
    }
    Ok(())
}

/// Regenerate a missing Dockerfile and offer to regenerate a drifted one.
fn ensure_current_dockerfile(
    opts: &GlobalOpts,
    project_dir: &Path,
    config: &ProjectConfig,
) -> anyhow::Result<()> {
    let renderer = DockerfileRenderer::new(opts.template_source());
    let mut prompter = TerminalPrompter::new();

    match drift(project_dir, config)? {
        DriftStatus::UpToDate => {}
        DriftStatus::Missing => {
            output::info("No Dockerfile found; generating one");
            renderer.write(project_dir, config, &mut prompter, true)?;
        }
        DriftStatus::Drifted { recorded, current } => {
            tracing::debug!(%recorded, %current, "Dockerfile drifted");
            output::warn("The Dockerfile does not match the current project configuration");
            if !std::io::stdin().is_terminal() {
                output::hint("Building with the existing Dockerfile; run `maru init` to regenerate it");
                return Ok(());
            }
            if prompter.confirm("Regenerate the Dockerfile?", true)? {
                renderer.write(project_dir, config, &mut prompter, true)?;
                output::success("Regenerated Dockerfile");
            } else if !prompter.confirm("Continue building with the existing Dockerfile?", false)? {
                return Err(Error::Aborted("Build cancelled".to_owned()).into());
            }
        }
    }
    Ok(())
}
