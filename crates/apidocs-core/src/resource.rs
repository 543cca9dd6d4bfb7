//! Resource categories: the top-level grouping of the reference.

use serde::Deserialize;

use crate::definition::DefinitionKey;

/// A named group of resources with a static introduction file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceCategory {
    /// Category title (e.g., `Workloads APIs`).
    pub name: String,
    /// Stem of the static introduction file (e.g., `_workloads`).
    pub include: String,
    /// Resources in display order.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A top-level resource listed in the table of contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    /// Display name, usually the kind.
    pub name: String,
    /// Definition rendered for this resource. A resource whose definition
    /// is absent from the model is skipped during generation.
    #[serde(default)]
    pub definition: Option<DefinitionKey>,
    /// Warning banner text.
    #[serde(default)]
    pub description_warning: String,
    /// Notice banner text.
    #[serde(default)]
    pub description_note: String,
}

impl Resource {
    /// A bare resource for `definition`, named after it. Used for old API
    /// versions, which are rendered like resources but listed separately.
    #[must_use]
    pub fn for_definition(key: DefinitionKey) -> Self {
        Self {
            name: key.name.clone(),
            definition: Some(key),
            ..Self::default()
        }
    }
}
