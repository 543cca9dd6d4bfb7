//! In-memory API model for the `gen-apidocs` renderers.
//!
//! Holds API groups and versions, definitions and their fields, resource
//! categories, and the HTTP operations attached to each resource. Cross
//! references between definitions are [`DefinitionKey`]s, resolved through
//! [`Definitions`] and checked when the model is loaded.
//!
//! `gen-apidocs` is the crate that renders this model; you should not need
//! to depend on this crate directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod definition;
mod error;
mod model;
mod operation;
mod resource;
mod version;

pub use definition::{
    concept_file_name, definition_file_name, get_link, Definition, DefinitionKey, Definitions,
    ExampleText, Field, SampleConfig,
};
pub use error::ModelError;
pub use model::ApiModel;
pub use operation::{HttpResponse, Operation, OperationCategory};
pub use resource::{Resource, ResourceCategory};
pub use version::{group_display_name, ApiVersion, GroupVersions};
