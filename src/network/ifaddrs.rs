use std::net::IpAddr;

use nix::ifaddrs::getifaddrs;
use nix::sys::socket::{SockaddrLike, SockaddrStorage};
use tracing::{debug, info};

use super::InterfaceAddrs;
use crate::errors::NetworkError;

/// Walk `getifaddrs(3)`, keeping IPv4/IPv6 entries grouped per interface in host order.
///
/// Link-layer and other non-IP entries only register the interface name.
pub(super) fn system_interface_addresses() -> Result<Vec<InterfaceAddrs>, NetworkError> {
    let mut out: Vec<InterfaceAddrs> = Vec::new();
    for ifaddr in getifaddrs()? {
        let pos = match out.iter().position(|i| i.name == ifaddr.interface_name) {
            Some(p) => p,
            None => {
                out.push(InterfaceAddrs {
                    name: ifaddr.interface_name.clone(),
                    addrs: Vec::new(),
                });
                out.len() - 1
            }
        };

        let Some(addr) = ifaddr.address.as_ref() else {
            debug!("{}: entry without address", ifaddr.interface_name);
            continue;
        };
        let Some(ip) = ip_of(addr) else {
            if addr.family().is_none() {
                info!(
                    "{}: skipping address of unknown family",
                    ifaddr.interface_name
                );
            }
            continue;
        };
        let prefix = ifaddr
            .netmask
            .as_ref()
            .and_then(prefix_len_of)
            .unwrap_or(if ip.is_ipv4() { 32 } else { 128 });
        out[pos].addrs.push(format!("{ip}/{prefix}"));
    }
    Ok(out)
}

fn ip_of(addr: &SockaddrStorage) -> Option<IpAddr> {
    if let Some(sin) = addr.as_sockaddr_in() {
        return Some(IpAddr::V4(sin.ip()));
    }
    addr.as_sockaddr_in6().map(|sin6| IpAddr::V6(sin6.ip()))
}

fn prefix_len_of(mask: &SockaddrStorage) -> Option<u32> {
    if let Some(sin) = mask.as_sockaddr_in() {
        return Some(u32::from(sin.ip()).count_ones());
    }
    mask.as_sockaddr_in6()
        .map(|sin6| u128::from(sin6.ip()).count_ones())
}
