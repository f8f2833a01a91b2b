#![allow(dead_code)]

use cloudinit_env::{HostNetwork, InterfaceAddrs, NetworkError, Route};

/// Host network with a fixed interface list and an optional default-route interface.
#[derive(Default)]
pub struct FakeNetwork {
    pub interfaces: Vec<InterfaceAddrs>,
    pub default_iface: Option<String>,
    pub fail_interfaces: bool,
    pub fail_routes: bool,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iface(mut self, name: &str, addrs: &[&str]) -> Self {
        self.interfaces
            .push(InterfaceAddrs::new(name, addrs.iter().copied()));
        self
    }

    pub fn default_route(mut self, name: &str) -> Self {
        self.default_iface = Some(name.to_string());
        self
    }
}

impl HostNetwork for FakeNetwork {
    fn interface_addresses(&self) -> Result<Vec<InterfaceAddrs>, NetworkError> {
        if self.fail_interfaces {
            return Err(NetworkError::Message("interfaces unavailable".into()));
        }
        Ok(self.interfaces.clone())
    }

    fn routes(&self) -> Result<Vec<Route>, NetworkError> {
        if self.fail_routes {
            return Err(NetworkError::Message("routes unavailable".into()));
        }
        Ok(self
            .default_iface
            .iter()
            .map(|name| Route {
                iface: Some(name.clone()),
                is_default: true,
            })
            .collect())
    }
}

pub fn no_env(_: &str) -> Option<String> {
    None
}
