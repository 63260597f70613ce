use maru_build::{DriftStatus, drift, has_template};
use maru_docker::{CommandError, DockerClient};

use super::GlobalOpts;
use crate::output;

pub async fn status(opts: &GlobalOpts) -> anyhow::Result<()> {
    let config = opts.load()?;
    let flavor = config.flavor.flavor();

    output::info(format!("{} {}", config.name, config.resolve_version()));
    output::message(format!("  Flavor: {flavor}"));
    if !config.build_repo_url.is_empty() {
        output::message(format!("  Repository: {}", config.build_repo_url));
    }
    output::message("  Tags:");
    if config.remotes.is_empty() {
        output::message(format!("  - {}", config.image_ref()));
    } else {
        for remote in &config.remotes {
            output::message(format!("  - {}", config.remote_ref(remote)));
        }
    }

    let dockerfile = if has_template(flavor) {
        match drift(&opts.project_dir(), &config)? {
            DriftStatus::UpToDate => "up to date",
            DriftStatus::Missing => "missing",
            DriftStatus::Drifted { .. } => "out of date",
        }
    } else {
        "maintained by hand"
    };
    output::message(format!("  Dockerfile: {dockerfile}"));

    let image = match DockerClient::new().image_exists(&config).await {
        Ok(true) => "built".to_owned(),
        Ok(false) => "not built".to_owned(),
        Err(e @ CommandError::NotFound { .. }) => e.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "image inspect failed");
            "unknown".to_owned()
        }
    };
    output::message(format!("  Image: {image}"));
    Ok(())
}
