//! `/etc/environment` projection of a token table.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::environment::TokenTable;
use crate::errors::EnvFileError;

pub const ENVIRONMENT_FILE_PATH: &str = "/etc/environment";

/// A flat `NAME=value` document destined for `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    pub path: PathBuf,
    pub vars: BTreeMap<String, String>,
}

/// Project every non-empty token into an environment file.
///
/// Returns `None` when every value is empty: there is nothing to write, which is different from
/// writing an empty file.
pub fn render_environment_file(table: &TokenTable) -> Option<EnvFile> {
    let vars: BTreeMap<String, String> = table
        .values()
        .filter(|entry| !entry.value.is_empty())
        .map(|entry| (entry.variable_name.clone(), entry.value.clone()))
        .collect();
    if vars.is_empty() {
        return None;
    }
    Some(EnvFile {
        path: PathBuf::from(ENVIRONMENT_FILE_PATH),
        vars,
    })
}

impl EnvFile {
    /// Target path below a filesystem root (`/media/root` + `/etc/environment`).
    pub fn path_under(&self, root: &Path) -> PathBuf {
        let relative = self.path.strip_prefix("/").unwrap_or(self.path.as_path());
        root.join(relative)
    }

    /// Full content: one `NAME=value` line per variable, sorted by name, newline terminated.
    pub fn render(&self) -> Result<String, EnvFileError> {
        self.validate()?;
        let mut out = String::new();
        for (name, value) in &self.vars {
            push_line(&mut out, &assignment(name, value));
        }
        Ok(out)
    }

    /// Update an existing file's content.
    ///
    /// Assignments to names this file carries are rewritten in place (every occurrence), all other
    /// lines are kept verbatim, and names not yet present are appended in sorted order.
    pub fn merge_into(&self, existing: &str) -> Result<String, EnvFileError> {
        self.validate()?;
        let mut written: BTreeSet<&str> = BTreeSet::new();
        let mut out = String::with_capacity(existing.len());
        for line in existing.lines() {
            let updated = assigned_name(line)
                .and_then(|name| self.vars.get_key_value(name));
            match updated {
                Some((name, value)) => {
                    push_line(&mut out, &assignment(name, value));
                    written.insert(name.as_str());
                }
                None => push_line(&mut out, line),
            }
        }
        for (name, value) in &self.vars {
            if !written.contains(name.as_str()) {
                push_line(&mut out, &assignment(name, value));
            }
        }
        Ok(out)
    }

    fn validate(&self) -> Result<(), EnvFileError> {
        for (name, value) in &self.vars {
            if !valid_name(name) {
                return Err(EnvFileError::InvalidName(name.clone()));
            }
            if value.contains('\n') || value.contains('\r') || value.contains('\0') {
                return Err(EnvFileError::InvalidValue(name.clone()));
            }
        }
        Ok(())
    }
}

fn assignment(name: &str, value: &str) -> String {
    format!("{name}={value}")
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_'))
}

/// Name on the left of `NAME=...`, when the line is a plain assignment.
fn assigned_name(line: &str) -> Option<&str> {
    let (name, _) = line.split_once('=')?;
    valid_name(name).then_some(name)
}
