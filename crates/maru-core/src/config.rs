use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::flavor::FlavorParams;
use crate::{Error, Result};

/// File name of the per-project configuration.
pub const CONFIG_FILE_NAME: &str = "maru.yaml";

/// Version stamped into every saved config.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build argument holding the git tag.
pub const GIT_TAG_ARG: &str = "GIT_TAG";

const VERSION_PLACEHOLDER: &str = "$version";
const GIT_TAG_PLACEHOLDER: &str = "$git_tag";

/// maru.yaml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Version of maru that last wrote the file
    #[serde(rename = "maru_version", default)]
    pub tool_version: String,
    #[serde(default)]
    pub name: String,
    /// Image version; may reference `$git_tag`
    #[serde(default)]
    pub version: String,
    /// Registry namespaces the image is pushed to, in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<String>,
    /// Values may reference `$version` and `$git_tag`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub build_args: BTreeMap<String, String>,
    #[serde(default)]
    pub build_repo_url: String,
    #[serde(default)]
    pub flavor: FlavorParams,
}

/// Everything a generated Dockerfile is rendered from, and so everything
/// its checksum covers.
///
/// The git tag and image identity are not part of it: templates read the
/// tag from `ARG GIT_TAG` when the image is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe<'a> {
    pub flavor: &'a FlavorParams,
    pub build_repo_url: &'a str,
    /// Build args declared with `ARG`, except `GIT_TAG` which templates always declare.
    pub build_arg_names: Vec<&'a str>,
}

impl ProjectConfig {
    /// Default config path inside `project_dir`.
    pub fn default_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE_NAME)
    }

    /// Load from `path`, or `None` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no project config");
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "loaded project config");
        Ok(Some(config))
    }

    /// Load from `path`; a missing file is an error.
    pub fn load_mandatory(path: &Path) -> Result<Self> {
        Self::load(path)?.ok_or_else(|| Error::ConfigAbsent(path.to_path_buf()))
    }

    /// Stamp the running tool version and overwrite the file at `path`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.tool_version = TOOL_VERSION.to_owned();
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigSerialize { source: e })?;
        std::fs::write(path, content).map_err(|e| Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "saved project config");
        Ok(())
    }

    pub fn git_tag(&self) -> &str {
        self.build_args
            .get(GIT_TAG_ARG)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// `build_args[key]` with one `$version` and one `$git_tag` substituted.
    pub fn resolve_build_arg(&self, key: &str) -> Option<String> {
        self.build_args.get(key).map(|raw| self.resolve_placeholders(raw))
    }

    /// `raw` with one `$version` and one `$git_tag` substituted, in that order.
    pub fn resolve_placeholders(&self, raw: &str) -> String {
        raw.replacen(VERSION_PLACEHOLDER, &self.version, 1)
            .replacen(GIT_TAG_PLACEHOLDER, self.git_tag(), 1)
    }

    /// `version` with one `$git_tag` substituted.
    pub fn resolve_version(&self) -> String {
        self.version.replacen(GIT_TAG_PLACEHOLDER, self.git_tag(), 1)
    }

    /// Every build arg, resolved, in key order.
    pub fn resolved_build_args(&self) -> Vec<(String, String)> {
        self.build_args
            .keys()
            .filter_map(|k| self.resolve_build_arg(k).map(|v| (k.clone(), v)))
            .collect()
    }

    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.name, self.resolve_version())
    }

    pub fn latest_ref(&self) -> String {
        format!("{}:latest", self.name)
    }

    pub fn remote_ref(&self, remote: &str) -> String {
        format!("{}/{}", remote.trim_end_matches('/'), self.image_ref())
    }

    pub fn add_remote(&mut self, remote: impl Into<String>) {
        self.remotes.push(remote.into());
    }

    /// Remove the first entry equal to `remote`, preserving order.
    pub fn remove_remote(&mut self, remote: &str) -> Result<()> {
        if self.remotes.is_empty() {
            return Err(Error::NoRemotes);
        }
        let idx = self
            .remotes
            .iter()
            .position(|r| r == remote)
            .ok_or_else(|| Error::RemoteNotFound(remote.to_owned()))?;
        self.remotes.remove(idx);
        Ok(())
    }

    /// Apply `maru set <variable> <value>`.
    pub fn set_variable(&mut self, variable: &str, value: &str) -> Result<()> {
        match variable {
            "version" => {
                if value.trim().is_empty() {
                    return Err(Error::EmptyField { field: "version" });
                }
                self.version = value.trim().to_owned();
            }
            "git_tag" => self.set_git_tag(value),
            other => return Err(Error::UnknownVariable(other.to_owned())),
        }
        Ok(())
    }

    /// Store the git tag; an empty value removes it.
    pub fn set_git_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            self.build_args.remove(GIT_TAG_ARG);
        } else {
            self.build_args
                .insert(GIT_TAG_ARG.to_owned(), tag.to_owned());
        }
    }

    /// The template inputs of this config.
    pub fn recipe(&self) -> Recipe<'_> {
        Recipe {
            flavor: &self.flavor,
            build_repo_url: &self.build_repo_url,
            build_arg_names: self
                .build_args
                .keys()
                .map(String::as_str)
                .filter(|k| *k != GIT_TAG_ARG)
                .collect(),
        }
    }

    /// SHA-256 over [`recipe`](Self::recipe).
    ///
    /// Only ever compared against another value produced by this function.
    pub fn checksum(&self) -> String {
        // Serializing plain strings and enums into a Vec cannot fail.
        let bytes = serde_json::to_vec(&self.recipe()).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        format!("{:x}", hasher.finalize())
    }
}
