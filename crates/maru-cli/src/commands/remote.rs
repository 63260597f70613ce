use super::GlobalOpts;
use crate::output;

pub fn remote_list(opts: &GlobalOpts) -> anyhow::Result<()> {
    let config = opts.load()?;
    if config.remotes.is_empty() {
        output::message("There are no remotes configured for the current project.");
    } else {
        output::message("Remotes configured for the current project:");
        for (i, remote) in config.remotes.iter().enumerate() {
            output::message(format!("{}) {remote}", i + 1));
        }
    }
    output::hint("Use `maru remote add` to add a remote, and `maru remote rm` to delete one.");
    Ok(())
}

pub fn remote_add(opts: &GlobalOpts, remote: &str) -> anyhow::Result<()> {
    let mut config = opts.load()?;
    config.add_remote(remote);
    config.save(&opts.config_path)?;
    output::success(format!("Added remote {remote}"));
    Ok(())
}

/// Removes the remote from the config only; images already pushed stay put.
pub fn remote_remove(opts: &GlobalOpts, remote: &str) -> anyhow::Result<()> {
    let mut config = opts.load()?;
    config.remove_remote(remote)?;
    config.save(&opts.config_path)?;
    output::success(format!("Removed remote {remote}"));
    Ok(())
}
