#![allow(clippy::module_name_repetitions)]
//! Per-boot substitution environment: the token table and the paths of an initialization run.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::env_file::{render_environment_file, EnvFile};
use crate::metadata::Metadata;
use crate::network::{self, HostNetwork, SystemNetwork};
use crate::settings::Settings;
use crate::substitute::Substituter;

pub const DEFAULT_SSH_KEY_NAME: &str = "coreos-cloudinit";

/// Token for the first-family address of the default-route interface.
pub const DEFAULT_IFACE_IPV4_TOKEN: &str = "$iface_default_ipv4";
pub const DEFAULT_IFACE_IPV4_VAR: &str = "IFACE_DEFAULT_IPV4";

/// Well-known tokens and the process environment variables that back them.
pub const WELL_KNOWN_TOKENS: [(&str, &str); 4] = [
    ("$public_ipv4", "COREOS_PUBLIC_IPV4"),
    ("$private_ipv4", "COREOS_PRIVATE_IPV4"),
    ("$public_ipv6", "COREOS_PUBLIC_IPV6"),
    ("$private_ipv6", "COREOS_PRIVATE_IPV6"),
];

/// Resolved value of one token plus the variable name used when it is exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntry {
    pub variable_name: String,
    pub value: String,
}

impl TokenEntry {
    pub fn new(variable_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable_name: variable_name.into(),
            value: value.into(),
        }
    }
}

/// Token spelling (`$iface_eth0_ipv4`) to entry.
pub type TokenTable = BTreeMap<String, TokenEntry>;

/// Everything an initialization run substitutes into, and where it works.
///
/// The token table is fixed at construction. The SSH key name is the one field a later step may
/// change, through [`Environment::set_ssh_key_name`].
#[derive(Debug, Clone)]
pub struct Environment {
    root: PathBuf,
    config_root: PathBuf,
    workspace: PathBuf,
    ssh_key_name: String,
    substitutions: TokenTable,
    substituter: Substituter,
}

impl Environment {
    /// Build against the live host and the process environment.
    pub fn new(
        root: impl Into<PathBuf>,
        config_root: impl Into<PathBuf>,
        workspace: impl Into<PathBuf>,
        ssh_key_name: impl Into<String>,
        metadata: &Metadata,
    ) -> Self {
        Self::build(
            root,
            config_root,
            workspace,
            ssh_key_name,
            metadata,
            &SystemNetwork::new(),
            |name| std::env::var(name).ok(),
        )
    }

    pub fn from_settings(settings: &Settings, metadata: &Metadata) -> Self {
        Self::build(
            &settings.root,
            &settings.config_root,
            &settings.workspace,
            settings.ssh_key_name.as_str(),
            metadata,
            &SystemNetwork::with_route_table(&settings.route_table),
            |name| std::env::var(name).ok(),
        )
    }

    /// Build from explicit sources: a host network and an environment lookup.
    pub fn build<H, F>(
        root: impl Into<PathBuf>,
        config_root: impl Into<PathBuf>,
        workspace: impl Into<PathBuf>,
        ssh_key_name: impl Into<String>,
        metadata: &Metadata,
        host: &H,
        env_lookup: F,
    ) -> Self
    where
        H: HostNetwork + ?Sized,
        F: Fn(&str) -> Option<String>,
    {
        let substitutions = build_token_table(metadata, host, env_lookup);
        let substituter = Substituter::new(&substitutions);
        Self {
            root: root.into(),
            config_root: config_root.into(),
            workspace: workspace.into(),
            ssh_key_name: ssh_key_name.into(),
            substitutions,
            substituter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Workspace joined under root. An absolute workspace stays under root.
    pub fn workspace(&self) -> PathBuf {
        let relative = self
            .workspace
            .strip_prefix("/")
            .unwrap_or(self.workspace.as_path());
        self.root.join(relative)
    }

    pub fn ssh_key_name(&self) -> &str {
        &self.ssh_key_name
    }

    pub fn set_ssh_key_name(&mut self, name: impl Into<String>) {
        self.ssh_key_name = name.into();
    }

    pub fn substitutions(&self) -> &TokenTable {
        &self.substitutions
    }

    pub fn lookup(&self, token: &str) -> Option<&TokenEntry> {
        self.substitutions.get(token)
    }

    pub fn substituter(&self) -> &Substituter {
        &self.substituter
    }

    /// Replace every token in `data`; `\$token` is kept as the literal `$token`.
    pub fn apply(&self, data: &str) -> String {
        self.substituter.apply(data)
    }

    /// `/etc/environment` content for the non-empty tokens, or `None` when there is nothing to write.
    pub fn default_environment_file(&self) -> Option<EnvFile> {
        render_environment_file(&self.substitutions)
    }
}

/// Build the token table.
///
/// Well-known tokens resolve from metadata, then `env_lookup`, then "". Interface tokens are named
/// `IFACE_<NAME>_<IPV4|IPV6>[_<n>]`, numbered per interface and family in enumeration order
/// (interfaces by name, addresses in host order). The default-route interface's IPv4 addresses
/// also set `$iface_default_ipv4`; the last one enumerated wins.
pub fn build_token_table<H, F>(metadata: &Metadata, host: &H, env_lookup: F) -> TokenTable
where
    H: HostNetwork + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    let mut table = TokenTable::new();

    let from_metadata = [
        metadata.public_ipv4,
        metadata.private_ipv4,
        metadata.public_ipv6,
        metadata.private_ipv6,
    ];
    for ((token, env_name), ip) in WELL_KNOWN_TOKENS.iter().zip(from_metadata) {
        let value = match ip {
            Some(ip) => ip.to_string(),
            None => env_lookup(env_name).unwrap_or_default(),
        };
        table.insert((*token).to_string(), TokenEntry::new(*env_name, value));
    }

    let default_iface = network::default_route_interface_name(host);
    let interfaces = network::list_addresses(host);
    if !interfaces.is_empty() {
        info!("fetching network interfaces info");
    }

    for iface in &interfaces {
        let stem = iface.name.to_uppercase().replace('.', "_");
        let mut ipv4 = 0usize;
        let mut ipv6 = 0usize;
        for addr in &iface.addrs {
            let Some((ip, _prefix)) = network::parse_cidr(addr) else {
                warn!("cannot parse '{addr}' CIDR on interface {}, skipping", iface.name);
                continue;
            };
            let ip = unmap_ipv4(ip);
            let (family, seq) = match ip {
                IpAddr::V4(_) => ("IPV4", &mut ipv4),
                IpAddr::V6(_) => ("IPV6", &mut ipv6),
            };
            let variable_name = if *seq > 0 {
                format!("IFACE_{stem}_{family}_{seq}")
            } else {
                format!("IFACE_{stem}_{family}")
            };
            *seq += 1;

            let value = ip.to_string();
            let token = format!("${}", variable_name.to_lowercase());
            table.insert(token, TokenEntry::new(variable_name, value.clone()));

            if ip.is_ipv4() && !default_iface.is_empty() && iface.name == default_iface {
                table.insert(
                    DEFAULT_IFACE_IPV4_TOKEN.to_string(),
                    TokenEntry::new(DEFAULT_IFACE_IPV4_VAR, value.clone()),
                );
            }
            info!("found '{}' network interface with '{value}' IP address", iface.name);
        }
    }

    table
}

/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) count as IPv4.
fn unmap_ipv4(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
        IpAddr::V4(_) => ip,
    }
}
