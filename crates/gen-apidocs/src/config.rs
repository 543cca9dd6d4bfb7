//! Project-level generation configuration loaded from YAML, and the
//! [`GenerateConfig`] builder the pipeline runs with.
//!
//! Externalizes the knobs that vary between API references (product
//! name, authorship, copyright, directory layout, whether operations are
//! rendered) so they live next to the static sections instead of being
//! hardcoded in Rust source.
//!
//! # File format
//!
//! ```yaml
//! # reference/config.yaml
//! product: Kubernetes
//! author: Kubernetes Team
//! copyright_holder: The Kubernetes Authors
//! copyright_since: 2016
//! copyright_url: https://github.com/kubernetes/kubernetes
//!
//! # Render the HTTP operations of every resource (default: true).
//! build_operations: true
//!
//! # Explicit title; derived from `product` and `build_operations` when unset.
//! title: Kubernetes API Reference Docs
//!
//! # Directory layout, relative to the config directory.
//! sections_dir: static_includes
//! includes_dir: includes
//! build_dir: build
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local};
use serde::Deserialize;

/// Output format of the rendered reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Hugo-style Markdown pages.
    #[default]
    Markdown,
    /// A single-page HTML reference with a navigation sidebar.
    Html,
    /// A LaTeX book.
    Tex,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Tex => "tex",
        })
    }
}

/// Project-level generation config.
///
/// Loaded from a YAML file via [`ProjectConfig::load`], then applied to a
/// [`GenerateConfig`] via [`GenerateConfig::with_project_config`].
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Product name used in the default title (e.g., `Kubernetes`).
    pub product: String,

    /// Explicit document title. Derived from `product` when `None`.
    pub title: Option<String>,

    /// Author shown on the TeX title page.
    pub author: String,

    /// Copyright holder (e.g., `The Kubernetes Authors`).
    pub copyright_holder: String,

    /// First copyright year.
    pub copyright_since: u16,

    /// Link target of the copyright notice.
    pub copyright_url: String,

    /// Render HTTP operations for every resource.
    pub build_operations: bool,

    /// Static sections directory, relative to the config directory.
    pub sections_dir: PathBuf,

    /// Fragment output directory (HTML/TeX), relative to the config directory.
    pub includes_dir: PathBuf,

    /// Final output directory, relative to the config directory.
    pub build_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            product: "Kubernetes".to_string(),
            title: None,
            author: "Kubernetes Team".to_string(),
            copyright_holder: "The Kubernetes Authors".to_string(),
            copyright_since: 2016,
            copyright_url: "https://github.com/kubernetes/kubernetes".to_string(),
            build_operations: true,
            sections_dir: PathBuf::from("static_includes"),
            includes_dir: PathBuf::from("includes"),
            build_dir: PathBuf::from("build"),
        }
    }
}

impl ProjectConfig {
    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }
}

/// Configuration for one generation run.
///
/// Construct with [`GenerateConfig::new`] and configure via
/// [`with_project_config`](Self::with_project_config) (file-based) or the
/// individual builder methods (programmatic, CLI overrides).
///
/// # Example
///
/// ```ignore
/// let config = GenerateConfig::new("reference")
///     .with_project_config(&project)
///     .format(Format::Tex)
///     .build_operations(false);
/// ```
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub(crate) format: Format,
    pub(crate) config_dir: PathBuf,
    pub(crate) sections_dir: PathBuf,
    pub(crate) includes_dir: PathBuf,
    pub(crate) build_dir: PathBuf,
    pub(crate) product: String,
    pub(crate) title: Option<String>,
    pub(crate) author: String,
    pub(crate) copyright_holder: String,
    pub(crate) copyright_since: u16,
    pub(crate) copyright_url: String,
    pub(crate) build_operations: bool,
    pub(crate) generated_at: DateTime<Local>,
}

impl GenerateConfig {
    /// Create a config rooted at `config_dir` with default settings.
    #[must_use]
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self::from_parts(config_dir.into(), &ProjectConfig::default())
    }

    fn from_parts(config_dir: PathBuf, project: &ProjectConfig) -> Self {
        Self {
            format: Format::default(),
            sections_dir: config_dir.join(&project.sections_dir),
            includes_dir: config_dir.join(&project.includes_dir),
            build_dir: config_dir.join(&project.build_dir),
            config_dir,
            product: project.product.clone(),
            title: project.title.clone(),
            author: project.author.clone(),
            copyright_holder: project.copyright_holder.clone(),
            copyright_since: project.copyright_since,
            copyright_url: project.copyright_url.clone(),
            build_operations: project.build_operations,
            generated_at: Local::now(),
        }
    }

    /// Apply settings from a [`ProjectConfig`].
    ///
    /// Directory paths are resolved against the config directory. The
    /// format and generation time are kept. Builder methods called after
    /// this override config values.
    #[must_use]
    pub fn with_project_config(self, project: &ProjectConfig) -> Self {
        let mut config = Self::from_parts(self.config_dir, project);
        config.format = self.format;
        config.generated_at = self.generated_at;
        config
    }

    /// Set the output format (default: Markdown).
    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set an explicit document title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Enable or disable rendering of HTTP operations.
    #[must_use]
    pub fn build_operations(mut self, enabled: bool) -> Self {
        self.build_operations = enabled;
        self
    }

    /// Pin the generation time used for timestamps and the copyright year.
    #[must_use]
    pub fn generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = at;
        self
    }

    /// Output format.
    #[must_use]
    pub fn output_format(&self) -> Format {
        self.format
    }

    /// Static sections directory.
    #[must_use]
    pub fn sections_dir(&self) -> &Path {
        &self.sections_dir
    }

    /// Fragment directory (HTML and TeX).
    #[must_use]
    pub fn includes_dir(&self) -> &Path {
        &self.includes_dir
    }

    /// Final output directory.
    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Document title: the explicit title, else `<product> API Reference
    /// Docs` with operations and `<product> Resource Reference Docs`
    /// without.
    #[must_use]
    pub fn document_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        let kind = if self.build_operations {
            "API"
        } else {
            "Resource"
        };
        format!("{} {kind} Reference Docs", self.product)
    }

    /// Copyright notice in the markup of the configured format.
    #[must_use]
    pub fn copyright(&self) -> String {
        let years = format!("{}-{}", self.copyright_since, self.generated_at.year());
        let holder = &self.copyright_holder;
        let url = &self.copyright_url;
        match self.format {
            Format::Markdown => format!("[Copyright {years} {holder}]({url})"),
            Format::Html => format!("<a href=\"{url}\">Copyright {years} {holder}.</a>"),
            Format::Tex => format!("Copyright {years} {holder}."),
        }
    }

    /// Generation timestamp, `YYYY-MM-DD HH:MM:SS (+HH:MM)`.
    ///
    /// The zone is the local UTC offset; chrono's `Local` carries no zone
    /// abbreviation.
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S (%:z)").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn deserialize_defaults() {
        let config: ProjectConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config.product, "Kubernetes");
        assert!(config.title.is_none());
        assert!(config.build_operations);
        assert_eq!(config.copyright_since, 2016);
        assert_eq!(config.sections_dir, PathBuf::from("static_includes"));
    }

    #[test]
    fn deserialize_full() {
        let yaml = r"
product: Acme
title: Acme Reference
author: Acme Docs Team
copyright_holder: Acme Inc
copyright_since: 2020
copyright_url: https://acme.example
build_operations: false
sections_dir: sections
";
        let config: ProjectConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.product, "Acme");
        assert_eq!(config.title.as_deref(), Some("Acme Reference"));
        assert_eq!(config.author, "Acme Docs Team");
        assert!(!config.build_operations);
        assert_eq!(config.sections_dir, PathBuf::from("sections"));
        // Other paths keep defaults
        assert_eq!(config.build_dir, PathBuf::from("build"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "product: Acme\nbuild_operations: false\n").unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.product, "Acme");
        assert!(!config.build_operations);
        assert_eq!(config.author, "Kubernetes Team");
    }

    #[test]
    fn load_invalid_yaml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "product: [[[invalid").unwrap();
        assert!(ProjectConfig::load(&path).is_err());
    }

    #[test]
    fn directories_resolve_against_config_dir() {
        let config = GenerateConfig::new("/ref");
        assert_eq!(config.sections_dir(), Path::new("/ref/static_includes"));
        assert_eq!(config.includes_dir(), Path::new("/ref/includes"));
        assert_eq!(config.build_dir(), Path::new("/ref/build"));
    }

    #[test]
    fn project_config_keeps_format() {
        let project = ProjectConfig {
            build_dir: PathBuf::from("out"),
            ..ProjectConfig::default()
        };
        let config = GenerateConfig::new("/ref")
            .format(Format::Tex)
            .with_project_config(&project);
        assert_eq!(config.output_format(), Format::Tex);
        assert_eq!(config.build_dir(), Path::new("/ref/out"));
    }

    #[test]
    fn title_follows_build_operations() {
        let config = GenerateConfig::new("/ref");
        assert_eq!(config.document_title(), "Kubernetes API Reference Docs");
        let config = config.build_operations(false);
        assert_eq!(config.document_title(), "Kubernetes Resource Reference Docs");
        let config = config.title("Custom");
        assert_eq!(config.document_title(), "Custom");
    }

    #[test]
    fn copyright_per_format() {
        let config = GenerateConfig::new("/ref").generated_at(fixed_time());
        assert_eq!(
            config.copyright(),
            "[Copyright 2016-2026 The Kubernetes Authors](https://github.com/kubernetes/kubernetes)"
        );
        assert_eq!(
            config.clone().format(Format::Html).copyright(),
            "<a href=\"https://github.com/kubernetes/kubernetes\">Copyright 2016-2026 The Kubernetes Authors.</a>"
        );
        assert_eq!(
            config.format(Format::Tex).copyright(),
            "Copyright 2016-2026 The Kubernetes Authors."
        );
    }

    #[test]
    fn timestamp_format() {
        let config = GenerateConfig::new("/ref").generated_at(fixed_time());
        let offset = fixed_time().offset().to_string();
        assert_eq!(config.timestamp(), format!("2026-03-14 15:09:26 ({offset})"));
        assert!(offset.starts_with('+') || offset.starts_with('-'), "{offset}");
    }
}
