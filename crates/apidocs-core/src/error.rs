//! Errors raised while loading an API model.

use crate::definition::DefinitionKey;

/// Errors produced by [`ApiModel`](crate::ApiModel) loading.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    /// File I/O failure reading the model document.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML (or JSON) parsing failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Two definitions share the same name/group/version.
    #[error("duplicate definition {key}")]
    DuplicateDefinition {
        /// The repeated key.
        key: DefinitionKey,
    },

    /// A definition references a key that is not in the model.
    #[error("{referenced_by} references unknown definition {key} in {relation}")]
    UnknownDefinition {
        /// Definition holding the dangling reference.
        referenced_by: DefinitionKey,
        /// Where the reference sits (`field 'spec'`, `other_versions`, ...).
        relation: String,
        /// The unresolved key.
        key: DefinitionKey,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModelError>();
    };

    #[test]
    fn unknown_definition_message() {
        let err = ModelError::UnknownDefinition {
            referenced_by: DefinitionKey::new("Pod", "core", "v1"),
            relation: "field 'spec'".to_string(),
            key: DefinitionKey::new("PodSpec", "core", "v1"),
        };
        assert_eq!(
            err.to_string(),
            "Pod (core/v1) references unknown definition PodSpec (core/v1) in field 'spec'"
        );
    }
}
