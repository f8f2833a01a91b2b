#![allow(clippy::module_name_repetitions)]
//! Interface survey: live interface addresses and the default-route interface.
//!
//! Host access goes through [`HostNetwork`]; the functions in this module turn its raw,
//! fallible answers into the degraded-but-never-failing view the token table needs.

mod ifaddrs;
mod route;

pub use route::{parse_route_table, DEFAULT_ROUTE_TABLE};

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::errors::NetworkError;

/// Addresses assigned to one interface, in CIDR form (`10.0.0.5/24`), in host order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceAddrs {
    pub name: String,
    pub addrs: Vec<String>,
}

impl InterfaceAddrs {
    pub fn new<I, S>(name: impl Into<String>, addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            addrs: addrs.into_iter().map(Into::into).collect(),
        }
    }
}

/// One row of the host routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Outgoing interface; `None` when the kernel reports no device.
    pub iface: Option<String>,
    pub is_default: bool,
}

/// Raw host network state.
pub trait HostNetwork {
    fn interface_addresses(&self) -> Result<Vec<InterfaceAddrs>, NetworkError>;
    fn routes(&self) -> Result<Vec<Route>, NetworkError>;
}

/// The live host: `getifaddrs(3)` for interfaces, the kernel IPv4 route table for routes.
#[derive(Debug, Clone)]
pub struct SystemNetwork {
    route_table: PathBuf,
}

impl SystemNetwork {
    pub fn new() -> Self {
        Self::with_route_table(DEFAULT_ROUTE_TABLE)
    }

    pub fn with_route_table(path: impl Into<PathBuf>) -> Self {
        Self {
            route_table: path.into(),
        }
    }
}

impl Default for SystemNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl HostNetwork for SystemNetwork {
    fn interface_addresses(&self) -> Result<Vec<InterfaceAddrs>, NetworkError> {
        ifaddrs::system_interface_addresses()
    }

    fn routes(&self) -> Result<Vec<Route>, NetworkError> {
        let content = std::fs::read_to_string(&self.route_table)?;
        Ok(parse_route_table(&content))
    }
}

/// Enumerate interfaces and their addresses.
///
/// Interfaces come back sorted by name; each keeps the address order reported by the host.
/// Duplicate interface entries are folded together. Enumeration failure yields an empty list.
pub fn list_addresses<H: HostNetwork + ?Sized>(host: &H) -> Vec<InterfaceAddrs> {
    let raw = match host.interface_addresses() {
        Ok(v) => v,
        Err(e) => {
            warn!("unable to enumerate network interfaces: {e}");
            return Vec::new();
        }
    };

    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for iface in raw {
        by_name.entry(iface.name).or_default().extend(iface.addrs);
    }
    by_name
        .into_iter()
        .map(|(name, addrs)| InterfaceAddrs { name, addrs })
        .collect()
}

/// Name of the interface carrying the default route, or "" when unknown.
pub fn default_route_interface_name<H: HostNetwork + ?Sized>(host: &H) -> String {
    let routes = match host.routes() {
        Ok(r) => r,
        Err(e) => {
            warn!("unable to read routing table: {e}");
            return String::new();
        }
    };

    match routes.into_iter().find(|r| r.is_default) {
        Some(Route {
            iface: Some(name), ..
        }) => {
            debug!("default route via {name}");
            name
        }
        Some(Route { iface: None, .. }) => {
            warn!("found default route but could not determine interface");
            String::new()
        }
        None => {
            warn!("unable to find default route");
            String::new()
        }
    }
}

/// Parse `addr/prefix`. The prefix must fit the address family.
pub fn parse_cidr(s: &str) -> Option<(IpAddr, u8)> {
    let (addr, prefix) = s.split_once('/')?;
    let ip: IpAddr = addr.parse().ok()?;
    let prefix: u8 = prefix.parse().ok()?;
    let max = if ip.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return None;
    }
    Some((ip, prefix))
}
