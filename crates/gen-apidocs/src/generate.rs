//! Document traversal shared by every output format.
//!
//! [`generate_files`] walks the model in table-of-contents order and hands
//! each piece to the [`DocWriter`] for the configured [`Format`](crate::Format).

use apidocs_core::{ApiModel, Definition, GroupVersions, Resource};

use crate::config::GenerateConfig;
use crate::error::Result;
use crate::toc::Toc;
use crate::writers;

/// A renderer for one output format.
///
/// Calls arrive in document order: overview, API groups, each resource
/// category followed by its resources, the definitions overview followed by
/// each definition, the old versions overview followed by each old
/// resource, and finally [`finalize`](Self::finalize). Each call writes its
/// fragment and records it in the writer's [`Toc`].
pub trait DocWriter {
    /// File extension of the fragments, including the dot.
    fn extension(&self) -> &'static str;

    /// Content of a static section whose source file does not exist.
    fn default_static_content(&self, title: &str) -> String;

    /// Write the overview section.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be copied or written.
    fn write_overview(&mut self) -> Result<()>;

    /// Write the table of API groups and their versions.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be written.
    fn write_api_group_versions(&mut self, gvs: &GroupVersions) -> Result<()>;

    /// Write the introduction of a resource category from its static
    /// `file` stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be copied or written.
    fn write_resource_category(&mut self, name: &str, file: &str) -> Result<()>;

    /// Write a resource page for `definition`, including its operations
    /// when operation building is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be written.
    fn write_resource(&mut self, resource: &Resource, definition: &Definition) -> Result<()>;

    /// Write the definitions section heading.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be copied or written.
    fn write_definitions_overview(&mut self) -> Result<()>;

    /// Write a definition page.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be written.
    fn write_definition(&mut self, definition: &Definition) -> Result<()>;

    /// Write the old versions section heading.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be copied or written.
    fn write_old_versions_overview(&mut self) -> Result<()>;

    /// Assemble the final document from the recorded fragments.
    ///
    /// Returns the fragment files listed in the table of contents that
    /// were not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the final document cannot be written.
    fn finalize(&mut self) -> Result<Vec<String>>;

    /// The table of contents recorded so far.
    fn toc(&self) -> &Toc;
}

/// Summary of a generation run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Resource pages written from resource categories.
    pub resources: usize,
    /// Standalone definition pages written.
    pub definitions: usize,
    /// Old version pages written.
    pub old_versions: usize,
    /// Resources skipped because their definition is not in the model.
    pub skipped: Vec<String>,
    /// Fragment files listed in the table of contents that were missing
    /// at assembly time.
    pub missing: Vec<String>,
    /// The final table of contents.
    pub toc: Toc,
}

impl GenerateReport {
    /// Fragment files in document order.
    #[must_use]
    pub fn files(&self) -> Vec<&str> {
        self.toc.files()
    }
}

/// Render `model` in the configured format.
///
/// Creates the build and includes directories when missing, writes every
/// fragment, then assembles the final document.
///
/// # Errors
///
/// Returns an error if a directory, fragment, or the final document cannot
/// be written, or a static section exists but cannot be copied.
///
/// # Example
///
/// ```ignore
/// let config = GenerateConfig::new("reference").format(Format::Html);
/// let report = generate_files(&model, &config)?;
/// eprintln!("{} resources", report.resources);
/// ```
pub fn generate_files(model: &ApiModel, config: &GenerateConfig) -> Result<GenerateReport> {
    std::fs::create_dir_all(config.build_dir())?;
    std::fs::create_dir_all(config.includes_dir())?;

    tracing::info!(
        format = %config.output_format(),
        definitions = model.definitions.len(),
        categories = model.resource_categories.len(),
        "generating reference"
    );

    let mut writer = writers::new_writer(model, config);
    write_document(writer.as_mut(), model)
}

/// Drive `writer` over `model` in document order.
pub(crate) fn write_document(writer: &mut dyn DocWriter, model: &ApiModel) -> Result<GenerateReport> {
    let mut report = GenerateReport::default();

    writer.write_overview()?;
    writer.write_api_group_versions(&model.group_versions())?;

    for category in &model.resource_categories {
        writer.write_resource_category(&category.name, &category.include)?;
        for resource in &category.resources {
            let Some(definition) = model.resource_definition(resource) else {
                tracing::warn!(
                    resource = %resource.name,
                    category = %category.name,
                    "missing definition for item in TOC, skipping"
                );
                report.skipped.push(resource.name.clone());
                continue;
            };
            writer.write_resource(resource, definition)?;
            report.resources += 1;
        }
    }

    writer.write_definitions_overview()?;
    for definition in model
        .definitions
        .sorted_by_name(|d| !d.in_toc() && !d.is_inlined && !d.is_old_version)
    {
        writer.write_definition(definition)?;
        report.definitions += 1;
    }

    writer.write_old_versions_overview()?;
    for definition in model
        .definitions
        .sorted_by_name(|d| d.is_old_version && !d.is_inlined)
    {
        let resource = Resource::for_definition(definition.key());
        writer.write_resource(&resource, definition)?;
        report.old_versions += 1;
    }

    report.missing = writer.finalize()?;
    report.toc = writer.toc().clone();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::TocItem;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    /// Records every call instead of writing files.
    #[derive(Default)]
    struct RecordingWriter {
        calls: Vec<String>,
        toc: Toc,
    }

    impl DocWriter for RecordingWriter {
        fn extension(&self) -> &'static str {
            ".txt"
        }

        fn default_static_content(&self, title: &str) -> String {
            title.to_string()
        }

        fn write_overview(&mut self) -> Result<()> {
            self.calls.push("overview".to_string());
            self.toc.push_section(TocItem::new(1, "Overview", "overview"));
            Ok(())
        }

        fn write_api_group_versions(&mut self, gvs: &GroupVersions) -> Result<()> {
            let groups: Vec<&str> = gvs.keys().map(String::as_str).collect();
            self.calls.push(format!("groups {}", groups.join(",")));
            Ok(())
        }

        fn write_resource_category(&mut self, name: &str, file: &str) -> Result<()> {
            self.calls.push(format!("category {name} {file}"));
            Ok(())
        }

        fn write_resource(&mut self, resource: &Resource, definition: &Definition) -> Result<()> {
            self.calls.push(format!(
                "resource {} {}/{}",
                resource.name, definition.group, definition.version
            ));
            Ok(())
        }

        fn write_definitions_overview(&mut self) -> Result<()> {
            self.calls.push("definitions".to_string());
            Ok(())
        }

        fn write_definition(&mut self, definition: &Definition) -> Result<()> {
            self.calls.push(format!(
                "definition {} {}/{}",
                definition.name, definition.group, definition.version
            ));
            Ok(())
        }

        fn write_old_versions_overview(&mut self) -> Result<()> {
            self.calls.push("old versions".to_string());
            Ok(())
        }

        fn finalize(&mut self) -> Result<Vec<String>> {
            self.calls.push("finalize".to_string());
            Ok(vec!["_missing.txt".to_string()])
        }

        fn toc(&self) -> &Toc {
            &self.toc
        }
    }

    const MODEL: &str = indoc! {r"
        spec_version: v1.29.0
        definitions:
          - { name: Pod, group: core, version: v1 }
          - { name: PodSpec, group: core, version: v1 }
          - { name: Container, group: core, version: v1, is_inlined: true }
          - { name: Deployment, group: apps, version: v1 }
          - { name: Deployment, group: apps, version: v1beta2, is_old_version: true }
          - { name: ReplicaSet, group: apps, version: v1beta1, is_old_version: true, is_inlined: true }
          - { name: ObjectMeta, group: meta, version: v1 }
        resource_categories:
          - name: Workloads APIs
            include: _workloads
            resources:
              - name: Pod
                definition: { name: Pod, group: core, version: v1 }
              - name: Widget
                definition: { name: Widget, group: example, version: v1 }
              - name: Deployment
                definition: { name: Deployment, group: apps, version: v1 }
    "};

    #[test]
    fn traversal_order() {
        let model = ApiModel::from_yaml_str(MODEL).unwrap();
        let mut writer = RecordingWriter::default();
        let report = write_document(&mut writer, &model).unwrap();

        assert_eq!(
            writer.calls,
            vec![
                "overview",
                "groups apps,core,meta",
                "category Workloads APIs _workloads",
                "resource Pod core/v1",
                "resource Deployment apps/v1",
                "definitions",
                "definition ObjectMeta meta/v1",
                "definition PodSpec core/v1",
                "old versions",
                "resource Deployment apps/v1beta2",
                "finalize",
            ]
        );
        assert_eq!(report.resources, 2);
        assert_eq!(report.definitions, 2);
        assert_eq!(report.old_versions, 1);
        assert_eq!(report.skipped, vec!["Widget"]);
        assert_eq!(report.missing, vec!["_missing.txt"]);
        assert_eq!(report.toc.sections.len(), 1);
    }

    #[test]
    fn empty_model_still_writes_fixed_sections() {
        let model = ApiModel::from_yaml_str("{}").unwrap();
        let mut writer = RecordingWriter::default();
        let report = write_document(&mut writer, &model).unwrap();

        assert_eq!(
            writer.calls,
            vec!["overview", "groups ", "definitions", "old versions", "finalize"]
        );
        assert_eq!(report.resources, 0);
        assert!(report.skipped.is_empty());
    }
}
