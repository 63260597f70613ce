use maru_docker::DockerClient;

use super::GlobalOpts;
use crate::output;

pub async fn run(opts: &GlobalOpts, args: &[String]) -> anyhow::Result<()> {
    let config = opts.load()?;
    if let Err(e) = DockerClient::new()
        .run(&config, &opts.run_options(), args)
        .await
    {
        output::error(e);
    }
    Ok(())
}

pub async fn shell(opts: &GlobalOpts) -> anyhow::Result<()> {
    let config = opts.load()?;
    if let Err(e) = DockerClient::new()
        .shell(&config, &opts.run_options())
        .await
    {
        output::error(e);
    }
    Ok(())
}
