//! Definitions (object schemas) and their fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::operation::OperationCategory;
use crate::version::{group_display_name, ApiVersion};

/// Identity of a definition: kind name plus group/version.
///
/// Every cross reference in the model (field types, other versions,
/// appears-in lists, inlined definitions, resources) is expressed as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefinitionKey {
    /// Kind name (e.g., `Pod`, `ObjectMeta`).
    pub name: String,
    /// API group; `core` for the legacy group (an empty or missing group
    /// is read as `core`).
    #[serde(default = "legacy_group", deserialize_with = "deserialize_group")]
    pub group: String,
    /// API version (e.g., `v1`, `v2beta1`).
    pub version: ApiVersion,
}

impl DefinitionKey {
    /// Build a key from its parts. An empty group becomes `core`.
    pub fn new(name: &str, group: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group_display_name(group).to_string(),
            version: ApiVersion::from(version),
        }
    }
}

fn legacy_group() -> String {
    "core".to_string()
}

/// Keys compare on the raw group, so both spellings of the legacy group
/// are folded into `core` on read.
fn deserialize_group<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let group = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(group_display_name(&group).to_string())
}

impl fmt::Display for DefinitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{})",
            self.name,
            group_display_name(&self.group),
            self.version
        )
    }
}

/// A documented object schema.
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    /// Kind name.
    pub name: String,
    /// API group; `core` for the legacy group (an empty or missing group
    /// is read as `core`).
    #[serde(default = "legacy_group", deserialize_with = "deserialize_group")]
    pub group: String,
    /// API version.
    pub version: ApiVersion,
    /// Fully-qualified group name shown instead of `group` when set
    /// (e.g., `apps.k8s.io`).
    #[serde(default)]
    pub group_full_name: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Same kind in other group/versions.
    #[serde(default)]
    pub other_versions: Vec<DefinitionKey>,
    /// Definitions that reference this one through a field.
    #[serde(default)]
    pub appears_in: Vec<DefinitionKey>,
    /// Definitions rendered inside this one's resource page.
    #[serde(default)]
    pub inline: Vec<DefinitionKey>,
    /// HTTP operations grouped by category (write, read, status, ...).
    #[serde(default)]
    pub operation_categories: Vec<OperationCategory>,
    /// Example manifests shown next to the resource.
    #[serde(default)]
    pub sample: Option<SampleConfig>,
    /// Rendered inside another definition, never on its own.
    #[serde(default)]
    pub is_inlined: bool,
    /// Superseded by a newer version of the same kind.
    #[serde(default)]
    pub is_old_version: bool,
    /// Referenced by a resource category (set on load).
    #[serde(skip)]
    pub(crate) in_toc: bool,
}

impl Definition {
    /// This definition's identity.
    #[must_use]
    pub fn key(&self) -> DefinitionKey {
        DefinitionKey {
            name: self.name.clone(),
            group: group_display_name(&self.group).to_string(),
            version: self.version.clone(),
        }
    }

    /// Whether a resource category lists this definition.
    #[must_use]
    pub fn in_toc(&self) -> bool {
        self.in_toc
    }

    /// Group name for display: `group_full_name`, else `core` for the
    /// legacy group, else the group.
    #[must_use]
    pub fn group_display_name(&self) -> &str {
        match self.group_full_name.as_deref() {
            Some(full) if !full.is_empty() => full,
            _ => group_display_name(&self.group),
        }
    }

    /// Anchor id used by the HTML and TeX renderers (`pod-v1-core`).
    #[must_use]
    pub fn link_id(&self) -> String {
        get_link(&format!(
            "{} {} {}",
            self.name,
            self.version,
            self.group_display_name()
        ))
    }

    /// Heading id used by the Markdown renderer (`pod-(core/v1)`).
    #[must_use]
    pub fn md_anchor(&self) -> String {
        get_link(&self.name_group_version())
    }

    /// `Name (group/version)`.
    #[must_use]
    pub fn name_group_version(&self) -> String {
        format!(
            "{} ({}/{})",
            self.name,
            self.group_display_name(),
            self.version
        )
    }

    /// `[Name](#anchor)`.
    #[must_use]
    pub fn md_link(&self) -> String {
        format!("[{}](#{})", self.name, self.md_anchor())
    }

    /// `<a href="#id">Name</a>`.
    #[must_use]
    pub fn href_link(&self) -> String {
        format!("<a href=\"#{}\">{}</a>", self.link_id(), self.name)
    }

    /// `<a href="#id">Name [group/version]</a>`.
    #[must_use]
    pub fn full_href_link(&self) -> String {
        let (link, text) = self.full_href_link_data();
        format!("<a href=\"{link}\">{text}</a>")
    }

    /// `(href, text)` pair behind [`full_href_link`](Self::full_href_link).
    #[must_use]
    pub fn full_href_link_data(&self) -> (String, String) {
        (
            format!("#{}", self.link_id()),
            format!(
                "{} [{}/{}]",
                self.name,
                self.group_display_name(),
                self.version
            ),
        )
    }

    /// `<a href="#id">version</a>`.
    #[must_use]
    pub fn version_link(&self) -> String {
        let (link, text) = self.version_link_data();
        format!("<a href=\"{link}\">{text}</a>")
    }

    /// `(href, text)` pair behind [`version_link`](Self::version_link).
    #[must_use]
    pub fn version_link_data(&self) -> (String, String) {
        (format!("#{}", self.link_id()), self.version.to_string())
    }

    /// Description with `<` and `>` replaced by HTML entities.
    #[must_use]
    pub fn description_with_entities(&self) -> String {
        with_entities(&self.description)
    }

    /// Example texts, empty when no sample is configured.
    #[must_use]
    pub fn samples(&self) -> &[ExampleText] {
        self.sample
            .as_ref()
            .map_or(&[][..], |s| s.samples.as_slice())
    }
}

/// A single field of a definition, or an operation parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Field {
    /// Field or parameter name.
    pub name: String,
    /// Type expression as written in the API (e.g., `[]Container`, `string`).
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Definition the type refers to, when it is an object type.
    #[serde(default)]
    pub definition: Option<DefinitionKey>,
    /// Strategic merge patch strategy (e.g., `merge`).
    #[serde(default)]
    pub patch_strategy: Option<String>,
    /// Strategic merge patch key (e.g., `name`).
    #[serde(default)]
    pub patch_merge_key: Option<String>,
}

impl Field {
    /// The type expression with the referenced definition's name replaced
    /// by `render(definition)`. Plain type when there is no resolvable
    /// reference.
    pub fn link_with(&self, defs: &Definitions, render: impl Fn(&Definition) -> String) -> String {
        match self.definition.as_ref().and_then(|key| defs.get(key)) {
            Some(def) => self.type_name.replace(&def.name, &render(def)),
            None => self.type_name.clone(),
        }
    }

    /// Description with `<` and `>` replaced by HTML entities.
    #[must_use]
    pub fn description_with_entities(&self) -> String {
        with_entities(&self.description)
    }
}

/// Example manifests attached to a definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleConfig {
    /// Caption shown with every example (e.g., `Pod Config to print "Hello World".`).
    #[serde(default)]
    pub note: String,
    /// One entry per tab.
    #[serde(default)]
    pub samples: Vec<ExampleText>,
}

/// One tab of an example: a command, a manifest, or a response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExampleText {
    /// Tab id, `bdocs-tab:<kind>` (e.g., `bdocs-tab:kubectl`).
    #[serde(default)]
    pub tab: String,
    /// Content type, `bdocs-tab:<kind>_<language>` (e.g., `bdocs-tab:kubectl_yaml`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Example body.
    #[serde(default)]
    pub text: String,
    /// Caption (e.g., `` `kubectl` Command ``).
    #[serde(default)]
    pub msg: String,
}

impl ExampleText {
    /// Tab name after the `:` (`kubectl`). Whole tab when there is no `:`.
    #[must_use]
    pub fn tab_name(&self) -> &str {
        after_colon(&self.tab)
    }

    /// Language after the `:` and `_` (`yaml`). Empty when absent.
    #[must_use]
    pub fn language(&self) -> &str {
        after_colon(&self.kind)
            .split_once('_')
            .map_or("", |(_, lang)| lang)
    }
}

fn after_colon(s: &str) -> &str {
    s.split_once(':').map_or(s, |(_, rest)| rest)
}

/// All definitions of a model, indexed by key.
#[derive(Debug, Default)]
pub struct Definitions {
    pub(crate) all: BTreeMap<DefinitionKey, Definition>,
}

impl Definitions {
    /// Look up a definition by key.
    #[must_use]
    pub fn get(&self, key: &DefinitionKey) -> Option<&Definition> {
        self.all.get(key)
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.all.values()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Whether the model has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Definitions matching `filter`, ordered by name, then version
    /// (newest stable first), then group.
    pub fn sorted_by_name(&self, filter: impl Fn(&Definition) -> bool) -> Vec<&Definition> {
        let mut defs: Vec<&Definition> = self.iter().filter(|d| filter(d)).collect();
        defs.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.version.cmp(&b.version))
                .then_with(|| a.group.cmp(&b.group))
        });
        defs
    }
}

/// Anchor form of a heading: lowercase, `.` and ` ` replaced by `-`.
#[must_use]
pub fn get_link(s: &str) -> String {
    s.replace(['.', ' '], "-").to_lowercase()
}

/// Output file stem for a definition page
/// (`generated_objectmeta_v1_meta_definition`).
#[must_use]
pub fn definition_file_name(d: &Definition) -> String {
    format!("{}_definition", file_stem(d))
}

/// Output file stem for a resource (concept) page
/// (`generated_pod_v1_core_concept`).
#[must_use]
pub fn concept_file_name(d: &Definition) -> String {
    format!("{}_concept", file_stem(d))
}

fn file_stem(d: &Definition) -> String {
    format!(
        "generated_{}_{}_{}",
        d.name.replace('.', "_").to_lowercase(),
        d.version,
        d.group
    )
}

fn with_entities(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}
