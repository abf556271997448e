//! Run configuration
//!
//! Flags are carried in immutable values threaded into the orchestrator
//! and every stage; nothing reads ambient process state. CLI flags
//! override the optional config file, which overrides the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Region used when neither the CLI nor the config file names any
pub const DEFAULT_REGION: &str = "us-west-2";

/// Policy switches consumed by the teardown engine.
///
/// `force` gates every mutating call: when false, stages discover and
/// report only. `ignore_errors` gates containment: when set, a failed
/// stage is recorded and the run continues; when unset, the first failure
/// aborts the enclosing scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeardownConfig {
    pub force: bool,
    pub ignore_errors: bool,
}

/// Which accounts and regions the run covers.
#[derive(Debug, Clone, Default)]
pub struct FleetConfig {
    /// AWS regions to process, in order
    pub regions: Vec<String>,
    /// AWS profiles to process, in order; empty means the default
    /// credential chain only
    pub profiles: Vec<String>,
    /// Scope deletion to a single VPC instead of all VPCs per region
    pub vpc_id: Option<String>,
}

impl FleetConfig {
    /// Profiles to iterate, normalized so an empty list still yields one
    /// pass with the default credential chain.
    pub fn profile_list(&self) -> Vec<Option<String>> {
        if self.profiles.is_empty() {
            vec![None]
        } else {
            self.profiles
                .iter()
                .map(|p| if p.is_empty() { None } else { Some(p.clone()) })
                .collect()
        }
    }
}

/// Optional on-disk configuration, layered under the CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub region_list: Option<Vec<String>>,
    pub profile_list: Option<Vec<String>>,
    pub force: Option<bool>,
    pub ignore_errors: Option<bool>,
}

impl FileConfig {
    /// Candidate config file locations, highest precedence first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("vpc-nuke.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("vpc-nuke").join("config.toml"));
        }
        paths
    }

    /// Load the first config file found, or defaults if none exists.
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.is_file() {
                return Self::from_path(&path);
            }
        }
        Ok(Self::default())
    }

    /// Parse a specific config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Merge CLI values over file values over defaults.
///
/// A non-empty CLI list wins outright; boolean flags win whenever set on
/// the command line (they cannot be unset from there).
pub fn resolve(
    file: &FileConfig,
    cli_regions: Vec<String>,
    cli_profiles: Vec<String>,
    cli_force: bool,
    cli_ignore_errors: bool,
    vpc_id: Option<String>,
) -> (FleetConfig, TeardownConfig) {
    let regions = if !cli_regions.is_empty() {
        cli_regions
    } else {
        file.region_list
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_REGION.to_string()])
    };

    let profiles = if !cli_profiles.is_empty() {
        cli_profiles
    } else {
        file.profile_list.clone().unwrap_or_default()
    };

    let fleet = FleetConfig {
        regions,
        profiles,
        vpc_id,
    };
    let teardown = TeardownConfig {
        force: cli_force || file.force.unwrap_or(false),
        ignore_errors: cli_ignore_errors || file.ignore_errors.unwrap_or(false),
    };

    (fleet, teardown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let (fleet, teardown) = resolve(&FileConfig::default(), vec![], vec![], false, false, None);
        assert_eq!(fleet.regions, vec![DEFAULT_REGION.to_string()]);
        assert!(fleet.profiles.is_empty());
        assert_eq!(fleet.profile_list(), vec![None]);
        assert!(!teardown.force);
        assert!(!teardown.ignore_errors);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            region_list: Some(vec!["eu-west-1".to_string()]),
            profile_list: Some(vec!["staging".to_string()]),
            force: Some(false),
            ignore_errors: Some(true),
        };
        let (fleet, teardown) = resolve(
            &file,
            vec!["us-east-1".to_string()],
            vec!["prod".to_string()],
            true,
            false,
            Some("vpc-123".to_string()),
        );
        assert_eq!(fleet.regions, vec!["us-east-1".to_string()]);
        assert_eq!(fleet.profiles, vec!["prod".to_string()]);
        assert_eq!(fleet.vpc_id.as_deref(), Some("vpc-123"));
        assert!(teardown.force);
        // File value still applies where the CLI flag was not given
        assert!(teardown.ignore_errors);
    }

    #[test]
    fn test_file_values_apply_without_cli() {
        let file = FileConfig {
            region_list: Some(vec!["eu-central-1".to_string(), "eu-west-1".to_string()]),
            profile_list: Some(vec!["dev".to_string()]),
            force: Some(true),
            ignore_errors: None,
        };
        let (fleet, teardown) = resolve(&file, vec![], vec![], false, false, None);
        assert_eq!(fleet.regions.len(), 2);
        assert_eq!(fleet.profiles, vec!["dev".to_string()]);
        assert!(teardown.force);
        assert!(!teardown.ignore_errors);
    }

    #[test]
    fn test_empty_profile_entries_use_default_chain() {
        let fleet = FleetConfig {
            profiles: vec![String::new(), "ops".to_string()],
            ..Default::default()
        };
        assert_eq!(
            fleet.profile_list(),
            vec![None, Some("ops".to_string())]
        );
    }

    #[test]
    fn test_parse_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "region_list = [\"us-east-2\"]\nprofile_list = [\"ci\"]\nignore_errors = true"
        )
        .unwrap();

        let parsed = FileConfig::from_path(file.path()).unwrap();
        assert_eq!(parsed.region_list, Some(vec!["us-east-2".to_string()]));
        assert_eq!(parsed.profile_list, Some(vec!["ci".to_string()]));
        assert_eq!(parsed.ignore_errors, Some(true));
        assert_eq!(parsed.force, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "regoin_list = [\"us-east-2\"]").unwrap();
        assert!(FileConfig::from_path(file.path()).is_err());
    }
}
