use super::GlobalOpts;
use crate::output;

pub fn set(opts: &GlobalOpts, variable: &str, value: &str) -> anyhow::Result<()> {
    let mut config = opts.load()?;
    config.set_variable(variable, value)?;
    config.save(&opts.config_path)?;
    output::success(format!("Set {variable} to `{}`", value.trim()));
    Ok(())
}
