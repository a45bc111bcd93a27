//! Mode gate.
//!
//! Decides which tools are reachable for the lifetime of the process. The
//! credential-free set is derived from each definition's [`Access`] class.

use std::collections::BTreeMap;

use serde::Serialize;

use super::handlers::ToolDefinition;
use super::registry::ToolRegistry;

/// Process-wide tool visibility mode, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// An API key is configured; every tool is reachable.
    Full,
    /// No API key (or `--info-only`); only credential-free tools are reachable.
    InformationOnly,
}

/// What a tool needs in order to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Forwards to the ABP API and cannot run without an API key.
    Credential,
    /// Answers from local reference data only.
    Public,
    /// Calls the ABP API when possible and falls back to local data.
    Hybrid,
}

impl Access {
    pub fn requires_credential(self) -> bool {
        matches!(self, Access::Credential)
    }
}

impl Mode {
    /// Whether a tool with the given access class may run in this mode.
    pub fn permits(self, access: Access) -> bool {
        match self {
            Mode::Full => true,
            Mode::InformationOnly => !access.requires_credential(),
        }
    }

    /// Whether tools may attempt remote calls.
    pub fn allows_remote(self) -> bool {
        matches!(self, Mode::Full)
    }
}

/// The subset of the registry visible in `mode`.
///
/// Returns references to the registry's own definitions, keyed by name.
pub fn filter_visible(registry: &ToolRegistry, mode: Mode) -> BTreeMap<&str, &ToolDefinition> {
    registry
        .iter()
        .filter(|def| mode.permits(def.access()))
        .map(|def| (def.name(), def))
        .collect()
}
