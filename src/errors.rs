//! Error mapping guide:
//! - Host introspection failures surface as NetworkError and are swallowed by the surveyor
//!   (warning + empty result); they never abort an initialization run.
//! - EnvFileError is the only error a caller sees from this crate's core, and only when it
//!   asks for the rendered /etc/environment content.
//! - Configuration loading uses anyhow with context instead of a dedicated enum.
use std::fmt;
use std::io;

/// Failure while reading host network state (interfaces or routes).
#[derive(Debug)]
pub enum NetworkError {
    Io(io::Error),
    Nix(nix::Error),
    Message(String),
}

impl From<io::Error> for NetworkError {
    fn from(e: io::Error) -> Self {
        NetworkError::Io(e)
    }
}

impl From<nix::Error> for NetworkError {
    fn from(e: nix::Error) -> Self {
        NetworkError::Nix(e)
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_for_network_error(self))
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Io(e) => Some(e),
            NetworkError::Nix(e) => Some(e),
            NetworkError::Message(_) => None,
        }
    }
}

/// Render a user-facing string for NetworkError.
pub fn display_for_network_error(e: &NetworkError) -> String {
    match e {
        NetworkError::Io(ioe) => ioe.to_string(),
        NetworkError::Nix(errno) => format!("{errno}"),
        NetworkError::Message(s) => s.clone(),
    }
}

/// Refusal to render an environment file assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileError {
    /// Variable name outside `[A-Za-z0-9_]+`.
    InvalidName(String),
    /// Value containing a newline, carriage return or NUL (named by its variable).
    InvalidValue(String),
}

impl fmt::Display for EnvFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvFileError::InvalidName(name) => {
                write!(f, "invalid environment variable name {name:?}")
            }
            EnvFileError::InvalidValue(name) => {
                write!(f, "value of {name} contains a newline or NUL")
            }
        }
    }
}

impl std::error::Error for EnvFileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_display_passes_message_through() {
        let e = NetworkError::Message("no route table".to_string());
        assert_eq!(e.to_string(), "no route table");
    }

    #[test]
    fn network_error_wraps_io_source() {
        let e: NetworkError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(e.to_string(), "gone");
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn env_file_error_names_variable() {
        let e = EnvFileError::InvalidValue("IFACE_ETH0_IPV4".to_string());
        assert!(e.to_string().contains("IFACE_ETH0_IPV4"));
    }
}
