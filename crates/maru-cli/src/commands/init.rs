use std::io::IsTerminal;

use anyhow::bail;
use maru_build::{DirStatus, DockerfileRenderer, scaffold};
use maru_core::ProjectConfig;

use super::GlobalOpts;
use crate::output;
use crate::prompt::TerminalPrompter;

pub fn init_project(opts: &GlobalOpts, flavor: Option<&str>) -> anyhow::Result<()> {
    verify_tty()?;

    let existing = ProjectConfig::load(&opts.config_path)?;
    match &existing {
        Some(config) => output::info(format!("Updating maru project `{}`", config.name)),
        None => output::info("Creating a new maru project"),
    }

    let mut prompter = TerminalPrompter::new();
    let mut config = maru_core::configure(&mut prompter, existing.as_ref(), flavor)?;

    let project_dir = opts.project_dir();
    let renderer = DockerfileRenderer::new(opts.template_source());
    let scaffolded = scaffold(
        &renderer,
        &project_dir,
        &opts.config_path,
        &mut config,
        &mut prompter,
    )?;

    if let Some(path) = &scaffolded.dockerfile {
        output::success(format!("Generated {}", path.display()));
    }
    for status in scaffolded.dirs {
        match status {
            DirStatus::Created(path) => output::success(format!("Created {}", path.display())),
            DirStatus::Existing(path) => output::info(format!("{} already exists", path.display())),
        }
    }
    output::success(format!("Saved {}", opts.config_path.display()));

    if let Some(path) = scaffolded.missing_macro {
        output::warn(format!(
            "Macro {} does not exist yet; add it before building",
            path.display()
        ));
    }
    if scaffolded.dockerfile.is_none() {
        output::hint(format!(
            "Flavor `{}` has no template; maintain your own Dockerfile in {}",
            config.flavor.flavor(),
            project_dir.display()
        ));
    } else {
        output::hint("Run `maru build` to build the container image");
    }
    Ok(())
}

/// Interactive setup needs a terminal on stdin.
fn verify_tty() -> anyhow::Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "No TTY detected. `maru init` asks questions interactively.\n\
             Use `maru set` to change the version or git tag of an existing project."
        );
    }
    Ok(())
}
