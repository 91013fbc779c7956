// config.rs — WardenConfig: governance directory resolution.
//
// Resolution cascade: an explicit path wins, then a project-local file,
// then the platform config directory, then built-in defaults. Parsed
// with `toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use warden_constraint::Strictness;

use crate::error::AgentError;

const CONFIG_FILE_NAME: &str = "warden.toml";

/// Resolved configuration for a `GovernedAgent`. Every field has a
/// built-in default so a brand-new project with no `warden.toml` still
/// starts up — the built-in defaults are deliberately conservative
/// (governance under `./governance`, violations under `./.warden/violations`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub governance_dir: PathBuf,
    pub default_profile: String,
    pub violation_dir: PathBuf,
    /// Where strictness-C per-entry audit flushing writes
    /// `audit_<YYYYMMDD>.log` files. Unused at strictness A/B, where the
    /// audit log stays in memory for the duration of the task.
    pub audit_dir: PathBuf,
    /// Forces the active profile's enforcement strictness regardless of
    /// what the profile file says — applied by
    /// [`crate::facade::GovernedAgent::create`] after loading, by
    /// overriding `LoadedProfile.profile.strictness` and recomputing the
    /// `constraint_hash` so the override is part of the hashed surface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strictness_override: Option<Strictness>,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            governance_dir: PathBuf::from("./governance"),
            default_profile: "default".to_string(),
            violation_dir: PathBuf::from("./.warden/violations"),
            audit_dir: PathBuf::from("./.warden/audit"),
            strictness_override: None,
        }
    }
}

impl WardenConfig {
    /// Resolution order: `explicit_path` if given and the file exists;
    /// else a `warden.toml` in `project_root`; else
    /// `dirs::config_dir()/warden/warden.toml`; else the built-in
    /// defaults. The first candidate that exists on disk wins — a
    /// missing file at any earlier step is not an error, it just falls
    /// through to the next candidate.
    pub fn resolve(
        project_root: &Path,
        explicit_path: Option<&Path>,
    ) -> Result<Self, AgentError> {
        if let Some(path) = explicit_path {
            if path.is_file() {
                return Self::load_from(path);
            }
        }

        let project_local = project_root.join(CONFIG_FILE_NAME);
        if project_local.is_file() {
            return Self::load_from(&project_local);
        }

        if let Some(dir) = dirs::config_dir() {
            let global = dir.join("warden").join(CONFIG_FILE_NAME);
            if global.is_file() {
                return Self::load_from(&global);
            }
        }

        tracing::debug!("no warden.toml found, using built-in defaults");
        Ok(Self::default())
    }

    fn load_from(path: &Path) -> Result<Self, AgentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| AgentError::ConfigReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config: WardenConfig =
            toml::from_str(&raw).map_err(|source| AgentError::ConfigParseFailed {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), "loaded warden config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn falls_back_to_defaults_when_nothing_present() {
        let dir = tempdir().unwrap();
        let config = WardenConfig::resolve(dir.path(), None).unwrap();
        assert_eq!(config.default_profile, "default");
        assert_eq!(config.governance_dir, PathBuf::from("./governance"));
    }

    #[test]
    fn loads_project_local_warden_toml() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("warden.toml"),
            "governance_dir = \"./gov\"\ndefault_profile = \"strict\"\nviolation_dir = \"./v\"\n",
        )
        .unwrap();
        let config = WardenConfig::resolve(dir.path(), None).unwrap();
        assert_eq!(config.default_profile, "strict");
        assert_eq!(config.governance_dir, PathBuf::from("./gov"));
    }

    #[test]
    fn explicit_path_wins_over_project_local() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("warden.toml"),
            "default_profile = \"project-local\"\n",
        )
        .unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "default_profile = \"explicit\"\n").unwrap();

        let config = WardenConfig::resolve(dir.path(), Some(&explicit)).unwrap();
        assert_eq!(config.default_profile, "explicit");
    }
}
