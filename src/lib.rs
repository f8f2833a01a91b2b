//! Per-boot substitution environment for machine initialization.
//!
//! [`Environment`] gathers the host's addresses into a token table: the four well-known tokens
//! (`$public_ipv4`, `$private_ipv4`, `$public_ipv6`, `$private_ipv6`) from provider metadata or
//! `COREOS_*` variables, plus one token per interface address (`$iface_eth0_ipv4`,
//! `$iface_eth0_ipv4_1`, ...) and `$iface_default_ipv4`. The table feeds two consumers:
//! [`Environment::apply`] for configuration payloads and
//! [`Environment::default_environment_file`] for `/etc/environment`.
//!
//! Nothing here fails an initialization run. Missing metadata and unreadable host network state
//! degrade to empty or absent tokens and are reported through `tracing`.

pub mod env_file;
pub mod environment;
pub mod errors;
pub mod metadata;
pub mod network;
pub mod settings;
pub mod substitute;
pub mod telemetry;

pub use env_file::{render_environment_file, EnvFile, ENVIRONMENT_FILE_PATH};
pub use environment::{
    build_token_table, Environment, TokenEntry, TokenTable, DEFAULT_IFACE_IPV4_TOKEN,
    DEFAULT_SSH_KEY_NAME, WELL_KNOWN_TOKENS,
};
pub use errors::{EnvFileError, NetworkError};
pub use metadata::Metadata;
pub use network::{
    default_route_interface_name, list_addresses, HostNetwork, InterfaceAddrs, Route,
    SystemNetwork,
};
pub use settings::Settings;
pub use substitute::{apply, Substituter};
pub use telemetry::init_tracing;
