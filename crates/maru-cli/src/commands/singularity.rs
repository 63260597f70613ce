use std::path::PathBuf;

use anyhow::bail;
use maru_docker::SingularityClient;
use maru_docker::singularity::default_output;

use super::GlobalOpts;
use crate::output;

async fn client() -> anyhow::Result<SingularityClient> {
    let client = SingularityClient::new();
    if !client.is_available().await {
        bail!("`singularity` was not found on PATH; install it to use this command");
    }
    Ok(client)
}

pub async fn singularity_build(opts: &GlobalOpts, output_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = opts.load()?;
    let client = client().await?;
    let out = output_path.unwrap_or_else(|| default_output(&config, &std::env::temp_dir()));

    output::info(format!("Converting `{}` to {}", config.image_ref(), out.display()));
    match client.build(&config, &out).await {
        Ok(()) => output::success(format!("Built {}", out.display())),
        Err(e) => output::error(e),
    }
    Ok(())
}

pub async fn singularity_run(opts: &GlobalOpts, args: &[String]) -> anyhow::Result<()> {
    let config = opts.load()?;
    let client = client().await?;
    if let Err(e) = client.run(&config, &opts.env, args).await {
        output::error(e);
    }
    Ok(())
}
