//! Component Model
//!
//! Registry entries as they arrive over the wire, and the normalized
//! descriptor the rest of the crate works with.

use serde::{Deserialize, Serialize};

/// A registry entry exactly as served by the component index.
///
/// Fields we do not use (`type`, `files`, `registryDependencies`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawComponent {
    /// Component identifier, e.g. `button`
    pub name: String,

    /// npm dependencies pulled in by the component
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

/// An installable component, normalized for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDescriptor {
    identifier: String,
    display_detail: String,
}

impl ComponentDescriptor {
    /// Build a descriptor from an identifier and its dependency list
    pub fn new(identifier: impl Into<String>, dependencies: &[String]) -> Self {
        let detail = if dependencies.is_empty() {
            "no dependency".to_string()
        } else {
            dependencies.join(" ")
        };

        Self {
            identifier: identifier.into(),
            display_detail: format!("dependencies: {}", detail),
        }
    }

    /// Identifier passed to the component CLI
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Human readable dependency summary
    pub fn display_detail(&self) -> &str {
        &self.display_detail
    }
}

impl From<RawComponent> for ComponentDescriptor {
    fn from(raw: RawComponent) -> Self {
        let dependencies = raw.dependencies.unwrap_or_default();
        ComponentDescriptor::new(raw.name, &dependencies)
    }
}
