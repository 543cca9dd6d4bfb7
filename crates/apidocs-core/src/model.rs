//! Loading and validating an API model document.

use std::collections::btree_map::Entry;
use std::path::Path;

use serde::Deserialize;

use crate::definition::{Definition, DefinitionKey, Definitions};
use crate::error::ModelError;
use crate::resource::{Resource, ResourceCategory};
use crate::version::GroupVersions;

/// Serialized form of the model, as read from disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelDocument {
    spec_version: String,
    definitions: Vec<Definition>,
    resource_categories: Vec<ResourceCategory>,
}

/// A resolved API model: every definition indexed by key, every
/// definition-to-definition reference checked.
#[derive(Debug, Default)]
pub struct ApiModel {
    /// Version of the API spec the model was built from (e.g., `v1.29.0`).
    pub spec_version: String,
    /// All definitions.
    pub definitions: Definitions,
    /// Resource categories in table-of-contents order.
    pub resource_categories: Vec<ResourceCategory>,
}

impl ApiModel {
    /// Load a model from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// model fails validation (see [`from_yaml_str`](Self::from_yaml_str)).
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse a model from YAML (or JSON) text.
    ///
    /// # Errors
    ///
    /// - [`ModelError::Yaml`] if the text does not deserialize.
    /// - [`ModelError::DuplicateDefinition`] if two definitions share a key.
    /// - [`ModelError::UnknownDefinition`] if a field, `other_versions`,
    ///   `appears_in`, or `inline` entry points at a missing definition.
    pub fn from_yaml_str(content: &str) -> Result<Self, ModelError> {
        let doc: ModelDocument = serde_yaml_ng::from_str(content)?;
        Self::from_document(doc)
    }

    fn from_document(doc: ModelDocument) -> Result<Self, ModelError> {
        let mut definitions = Definitions::default();
        for def in doc.definitions {
            match definitions.all.entry(def.key()) {
                Entry::Occupied(e) => {
                    return Err(ModelError::DuplicateDefinition {
                        key: e.key().clone(),
                    })
                }
                Entry::Vacant(e) => {
                    e.insert(def);
                }
            }
        }

        for category in &doc.resource_categories {
            for resource in &category.resources {
                let Some(key) = &resource.definition else {
                    continue;
                };
                match definitions.all.get_mut(key) {
                    Some(def) => def.in_toc = true,
                    None => tracing::debug!(
                        resource = %resource.name,
                        category = %category.name,
                        "resource definition {key} not in model"
                    ),
                }
            }
        }

        let model = Self {
            spec_version: doc.spec_version,
            definitions,
            resource_categories: doc.resource_categories,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        for def in self.definitions.iter() {
            let check = |relation: &str, key: &DefinitionKey| {
                if self.definitions.get(key).is_some() {
                    Ok(())
                } else {
                    Err(ModelError::UnknownDefinition {
                        referenced_by: def.key(),
                        relation: relation.to_string(),
                        key: key.clone(),
                    })
                }
            };

            for field in &def.fields {
                if let Some(key) = &field.definition {
                    check(&format!("field '{}'", field.name), key)?;
                }
            }
            for key in &def.other_versions {
                check("other_versions", key)?;
            }
            for key in &def.appears_in {
                check("appears_in", key)?;
            }
            for key in &def.inline {
                check("inline", key)?;
            }
        }
        Ok(())
    }

    /// Every API group with the versions its definitions use, versions
    /// deduplicated and ordered newest stable first.
    #[must_use]
    pub fn group_versions(&self) -> GroupVersions {
        let mut gvs = GroupVersions::new();
        for def in self.definitions.iter() {
            let versions = gvs.entry(def.group_display_name().to_string()).or_default();
            if !versions.contains(&def.version) {
                versions.push(def.version.clone());
            }
        }
        for versions in gvs.values_mut() {
            versions.sort();
        }
        gvs
    }

    /// Release number derived from the spec version: the leading `v` and
    /// the patch component dropped (`v1.29.0` → `1.29`).
    #[must_use]
    pub fn release(&self) -> &str {
        let version = self
            .spec_version
            .strip_prefix('v')
            .unwrap_or(&self.spec_version);
        match version.rfind('.') {
            Some(pos) => &version[..pos],
            None => version,
        }
    }

    /// Definition a resource points at, if it is in the model.
    #[must_use]
    pub fn resource_definition(&self, resource: &Resource) -> Option<&Definition> {
        resource
            .definition
            .as_ref()
            .and_then(|key| self.definitions.get(key))
    }
}
