//! Tool Registry
//!
//! Built once at startup from [`ToolKind::ALL`] and never mutated, so it can
//! be shared across concurrent calls without locking.

use crate::catalog::ToolKind;
use crate::schema::ObjectSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Tool information as advertised in `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A registered tool: its name, schema and the handler it routes to
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: String,
    pub schema: ObjectSchema,
    pub kind: ToolKind,
}

impl ToolDescriptor {
    pub fn new(kind: ToolKind) -> Self {
        Self {
            name: kind.name(),
            description: kind.description(),
            schema: kind.schema(),
            kind,
        }
    }

    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.to_string(),
            description: self.description.clone(),
            input_schema: self.schema.to_json_schema(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let tools: Vec<ToolDescriptor> = ToolKind::ALL.into_iter().map(ToolDescriptor::new).collect();
        let by_name = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name, i))
            .collect();
        Self { tools, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    /// Listing in registration order
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(ToolDescriptor::info).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
