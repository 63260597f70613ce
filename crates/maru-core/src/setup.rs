//! Interactive project configuration (`maru init`).

use url::Url;

use crate::config::ProjectConfig;
use crate::flavor::{Flavor, list_flavors};
use crate::prompt::Prompter;
use crate::{Error, Result};

const DEFAULT_VERSION: &str = "1.0.0";

/// Run one full interactive configuration pass.
///
/// Starts from `existing` when present, otherwise from an empty config. The
/// returned config has not been written anywhere; callers persist it.
pub fn configure(
    prompter: &mut dyn Prompter,
    existing: Option<&ProjectConfig>,
    flavor_arg: Option<&str>,
) -> Result<ProjectConfig> {
    let is_new_project = existing.is_none();
    let mut config = existing.cloned().unwrap_or_default();
    let current = config.flavor.flavor();

    let flavor = match flavor_arg {
        Some(name) => name.parse::<Flavor>()?,
        None => select_flavor(prompter, current)?,
    };
    if flavor == Flavor::MatlabCompiled {
        return Err(Error::UnsupportedFlavor(flavor.as_str().to_owned()));
    }
    tracing::debug!(%flavor, is_new_project, "configuring project");

    let repo_url = prompter.input("Build repository URL (https):", &config.build_repo_url)?;
    config.build_repo_url = validate_repo_url(&repo_url)?;

    let git_tag = prompter.input("Git tag (leave empty for none):", config.git_tag())?;
    config.set_git_tag(&git_tag);

    let name_default = if config.name.is_empty() {
        derive_name_from_url(&config.build_repo_url).unwrap_or_default()
    } else {
        config.name.clone()
    };
    let name = prompter.input("Container name:", &name_default)?;
    config.name = non_empty("name", &name)?;

    let version_default = if config.version.is_empty() {
        DEFAULT_VERSION.to_owned()
    } else {
        config.version.clone()
    };
    let version = prompter.input("Container version:", &version_default)?;
    config.version = non_empty("version", &version)?;

    // A changed flavor starts over from that flavor's defaults.
    let fresh_params = is_new_project || flavor != current;
    config.flavor = flavor.collect_params(prompter, &config, fresh_params)?;

    Ok(config)
}

fn select_flavor(prompter: &mut dyn Prompter, current: Flavor) -> Result<Flavor> {
    let names = list_flavors();
    let default = names
        .iter()
        .position(|n| *n == current.as_str())
        .unwrap_or(0);
    let idx = prompter.select("Project flavor:", &names, default)?;
    let name = names
        .get(idx)
        .ok_or_else(|| Error::Prompt(format!("flavor selection {idx} out of range")))?;
    name.parse()
}

/// Accept only absolute `https` URLs with a host. Returns the trimmed input.
pub fn validate_repo_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let invalid = |reason: &str| Error::InvalidRepoUrl {
        url: raw.to_owned(),
        reason: reason.to_owned(),
    };
    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "https" {
        return Err(invalid("scheme must be https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("host is required"));
    }
    Ok(raw.to_owned())
}

/// Last path segment of `url` without extension, lowercased.
pub fn derive_name_from_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let segment = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()?;
    let stem = match segment.rfind('.') {
        Some(0) | None => segment,
        Some(idx) => &segment[..idx],
    };
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_lowercase())
}

fn non_empty(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::EmptyField { field });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_urls() {
        assert_eq!(
            validate_repo_url(" https://github.com/acme/tool.git ").unwrap(),
            "https://github.com/acme/tool.git"
        );
    }

    #[test]
    fn rejects_non_https_and_garbage() {
        for bad in ["http://x.com", "ftp://x.com/a", "x.com/repo", "", "https://"] {
            let err = validate_repo_url(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidRepoUrl { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn derives_name_from_repo_url() {
        assert_eq!(
            derive_name_from_url("https://github.com/Acme/My-Tool.git").as_deref(),
            Some("my-tool")
        );
        assert_eq!(
            derive_name_from_url("https://gitlab.com/acme/segmenter/").as_deref(),
            Some("segmenter")
        );
        assert_eq!(derive_name_from_url("https://example.org"), None);
    }
}
