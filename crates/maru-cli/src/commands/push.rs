use maru_docker::DockerClient;

use super::GlobalOpts;
use crate::output;

pub async fn push(opts: &GlobalOpts) -> anyhow::Result<()> {
    let config = opts.load()?;
    if config.remotes.is_empty() {
        output::message("There are no remotes configured for the current project.");
        output::hint("Use `maru remote add <remote>` to add one");
        return Ok(());
    }

    let report = DockerClient::new().push(&config).await;
    for target in &report.pushed {
        output::success(format!("Pushed `{target}`"));
    }
    for failure in &report.failures {
        output::error(format!(
            "{} failed for {}: {}",
            failure.step, failure.remote, failure.error
        ));
    }
    Ok(())
}
