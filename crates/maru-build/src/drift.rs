use std::path::Path;

use maru_core::ProjectConfig;

use crate::RenderError;
use crate::render::dockerfile_path;

/// Relation between the config and the checksum baked into the Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftStatus {
    /// No Dockerfile in the project directory.
    Missing,
    UpToDate,
    Drifted { recorded: String, current: String },
}

impl DriftStatus {
    pub fn is_drifted(&self) -> bool {
        matches!(self, DriftStatus::Drifted { .. })
    }
}

/// Checksum recorded on the first line of `dockerfile`, or `None` if the file is absent.
pub fn read_checksum(dockerfile: &Path) -> Result<Option<String>, RenderError> {
    if !dockerfile.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(dockerfile).map_err(|e| RenderError::Read {
        path: dockerfile.to_path_buf(),
        source: e,
    })?;
    let first = content.lines().next().unwrap_or_default();
    let recorded = first.strip_prefix("# ").unwrap_or(first).trim();
    Ok(Some(recorded.to_owned()))
}

/// Compare the project's Dockerfile against the current config.
pub fn drift(project_dir: &Path, config: &ProjectConfig) -> Result<DriftStatus, RenderError> {
    let Some(recorded) = read_checksum(&dockerfile_path(project_dir))? else {
        return Ok(DriftStatus::Missing);
    };
    let current = config.checksum();
    tracing::debug!(%recorded, %current, "comparing Dockerfile checksum");
    if recorded == current {
        Ok(DriftStatus::UpToDate)
    } else {
        Ok(DriftStatus::Drifted { recorded, current })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_single_comment_marker() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("Dockerfile");

        std::fs::write(&path, "# abc123  \nFROM scratch\n").unwrap();
        assert_eq!(read_checksum(&path).unwrap().as_deref(), Some("abc123"));

        std::fs::write(&path, "# # abc\n").unwrap();
        assert_eq!(read_checksum(&path).unwrap().as_deref(), Some("# abc"));

        std::fs::write(&path, "").unwrap();
        assert_eq!(read_checksum(&path).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn absent_dockerfile_has_no_checksum() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert_eq!(read_checksum(&tmp.path().join("Dockerfile")).unwrap(), None);
    }
}
