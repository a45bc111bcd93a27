//! Tool Registry - central registration of all tools.
//!
//! Each domain area under `definitions/` contributes one group of tools;
//! the registry merges them into a single name-keyed table that lives for
//! the whole process. Adding a tool means adding it to its group's `tools()`
//! list; nothing here changes.

use std::collections::BTreeMap;

use rmcp::model::Tool;
use tracing::debug;

use super::definitions;
use super::error::ToolError;
use super::handlers::ToolDefinition;

/// Name-keyed table of every tool definition.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, ToolDefinition>,
}

impl ToolRegistry {
    /// Merge tool groups into one registry.
    ///
    /// Fails if any name appears twice, within a group or across groups.
    pub fn from_groups(groups: Vec<Vec<ToolDefinition>>) -> Result<Self, ToolError> {
        let mut tools = BTreeMap::new();

        for definition in groups.into_iter().flatten() {
            let name = definition.name();
            if tools.insert(name, definition).is_some() {
                return Err(ToolError::DuplicateName(name.to_string()));
            }
        }

        debug!("Registered {} tools", tools.len());
        Ok(Self { tools })
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// All tool names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Iterate over the definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.iter().map(ToolDefinition::to_tool).collect()
    }
}

/// Build the registry with every tool group.
pub fn build_registry() -> Result<ToolRegistry, ToolError> {
    ToolRegistry::from_groups(vec![
        definitions::applications::tools(),
        definitions::modules::tools(),
        definitions::entities::tools(),
        definitions::identity::tools(),
        definitions::tenants::tools(),
        definitions::permissions::tools(),
        definitions::audit_logs::tools(),
        definitions::background_jobs::tools(),
        definitions::ui::tools(),
        definitions::suite::tools(),
        definitions::localization::tools(),
        definitions::docs::tools(),
    ])
}
