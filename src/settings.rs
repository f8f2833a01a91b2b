//! Run configuration: filesystem roots, workspace, key name and the route table to inspect.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::environment::DEFAULT_SSH_KEY_NAME;
use crate::network::DEFAULT_ROUTE_TABLE;

pub const DEFAULT_WORKSPACE: &str = "var/lib/coreos-cloudinit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub root: PathBuf,
    pub config_root: PathBuf,
    pub workspace: PathBuf,
    pub ssh_key_name: String,
    pub route_table: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            config_root: PathBuf::new(),
            workspace: PathBuf::from(DEFAULT_WORKSPACE),
            ssh_key_name: DEFAULT_SSH_KEY_NAME.to_string(),
            route_table: PathBuf::from(DEFAULT_ROUTE_TABLE),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("invalid settings document")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Override fields from `CLOUDINIT_ENV_*` variables; unset or empty variables are ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| env::var(name).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("CLOUDINIT_ENV_ROOT") {
            self.root = PathBuf::from(v);
        }
        if let Some(v) = get("CLOUDINIT_ENV_CONFIG_ROOT") {
            self.config_root = PathBuf::from(v);
        }
        if let Some(v) = get("CLOUDINIT_ENV_WORKSPACE") {
            self.workspace = PathBuf::from(v);
        }
        if let Some(v) = get("CLOUDINIT_ENV_SSH_KEY_NAME") {
            self.ssh_key_name = v;
        }
        if let Some(v) = get("CLOUDINIT_ENV_ROUTE_TABLE") {
            self.route_table = PathBuf::from(v);
        }
    }
}
