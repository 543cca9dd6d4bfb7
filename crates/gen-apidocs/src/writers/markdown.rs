//! Hugo-flavored Markdown pages.
//!
//! Everything is written under the build directory: static sections next
//! to `group_versions.md`, resource pages under `resources/`, definition
//! pages under `definitions/`. [`finalize`](DocWriter::finalize) renders
//! `_index.md` from the static `index.md`.

use std::fmt::Write as _;

use apidocs_core::{Definition, ExampleText, GroupVersions, Operation, Resource};

use super::helpers::{
    category_id, group_versions_table, missing_fragments, one_line, operation_id, params_table,
    responses_table, slug, substitute_placeholders, write_file, write_static_file,
};
use super::Context;
use crate::error::Result;
use crate::generate::DocWriter;
use crate::toc::{Toc, TocItem};

pub(crate) struct MarkdownWriter<'a> {
    ctx: Context<'a>,
    toc: Toc,
}

impl<'a> MarkdownWriter<'a> {
    pub(crate) fn new(ctx: Context<'a>) -> Self {
        Self {
            toc: ctx.new_toc(),
            ctx,
        }
    }

    /// `pod-v1-core.md`
    fn page_name(d: &Definition) -> String {
        format!(
            "{}-{}-{}.md",
            d.name.replace('.', "-").to_lowercase(),
            d.version,
            d.group
        )
    }

    /// Static page headed `title`, listed in the TOC as `toc_title`.
    fn static_section(
        &mut self,
        title: &str,
        toc_title: &str,
        link: &str,
        location: &str,
    ) -> Result<()> {
        let config = self.ctx.config;
        write_static_file(
            config.sections_dir(),
            config.build_dir(),
            location,
            &self.default_static_content(title),
        )?;
        self.toc
            .push_section(TocItem::new(1, toc_title, link).with_file(location));
        Ok(())
    }

    /// `` `name`<br /> *Type*<br /> **patch strategy**: *merge* | description ``
    fn write_fields(&self, out: &mut String, d: &Definition) {
        out.push_str("Field        | Description\n------------ | -----------\n");
        for field in &d.fields {
            let _ = write!(out, "`{}`", field.name);
            if !field.type_name.is_empty() {
                let link = field.link_with(&self.ctx.model.definitions, Definition::md_link);
                let _ = write!(out, "<br /> *{link}*");
            }
            if let Some(strategy) = &field.patch_strategy {
                let _ = write!(out, "<br /> **patch strategy**: *{strategy}*");
            }
            if let Some(key) = &field.patch_merge_key {
                let _ = write!(out, "<br /> **patch merge key**: *{key}*");
            }
            let _ = writeln!(out, " | {}", one_line(&field.description_with_entities()));
        }
    }

    fn write_other_versions(&self, out: &mut String, d: &Definition) {
        let versions: Vec<&Definition> = d
            .other_versions
            .iter()
            .filter_map(|key| self.ctx.model.definitions.get(key))
            .collect();
        if versions.is_empty() {
            return;
        }
        out.push_str("### Other API versions:\n\n");
        for v in versions {
            let _ = writeln!(out, "- {}", v.md_link());
        }
        out.push('\n');
    }

    fn write_appears_in(&self, out: &mut String, d: &Definition) {
        let parents: Vec<&Definition> = d
            .appears_in
            .iter()
            .filter_map(|key| self.ctx.model.definitions.get(key))
            .collect();
        if parents.is_empty() {
            return;
        }
        out.push_str("### Appears In:\n\n");
        for a in parents {
            let _ = writeln!(out, "- {}", a.md_link());
        }
        out.push('\n');
    }

    fn write_gvk(out: &mut String, d: &Definition, kind: &str) {
        out.push_str("Group        | Version    | Kind\n------------ | ---------- | -----------\n");
        let _ = writeln!(
            out,
            "`{}` | `{}` | `{kind}`\n",
            d.group_display_name(),
            d.version
        );
    }

    fn write_samples(out: &mut String, d: &Definition) {
        let note = d.sample.as_ref().map_or("", |s| s.note.as_str());
        for sample in d.samples() {
            let _ = writeln!(out, ">{} {note}\n", sample.tab_name());
            let _ = writeln!(out, "```{}\n{}\n```\n", sample.language(), sample.text);
        }
    }

    fn write_operation_samples(out: &mut String, kind: &str, examples: &[ExampleText]) {
        for e in examples {
            let _ = writeln!(out, "**{} {kind} example**\n", e.tab_name());
            let _ = writeln!(out, "```{}\n{}\n```\n", e.language(), e.text);
        }
    }

    /// Anchor link used inside the HTML parameter tables.
    fn param_link(d: &Definition) -> String {
        format!("<a href=\"#{}\">{}</a>", d.md_anchor(), d.name)
    }

    fn write_operation(&self, out: &mut String, op: &Operation, d: &Definition) -> TocItem {
        let defs = &self.ctx.model.definitions;
        let op_id = operation_id(op, d);
        let _ = writeln!(out, "\n### {} {{#{op_id}}}\n", op.type_name);

        Self::write_operation_samples(out, "request", &op.example_requests);
        Self::write_operation_samples(out, "response", &op.example_responses);

        let _ = writeln!(out, "{}", op.description);
        let _ = writeln!(out, "\n#### HTTP Request\n\n`{}`\n", op.display_http());

        for (title, params) in [
            ("Path Parameters", &op.path_params),
            ("Query Parameters", &op.query_params),
            ("Body Parameters", &op.body_params),
        ] {
            if !params.is_empty() {
                let _ = writeln!(out, "##### {title}\n");
                out.push_str(&params_table(params, defs, Self::param_link));
                out.push('\n');
            }
        }

        if !op.http_responses.is_empty() {
            out.push_str("#### Response\n\n");
            out.push_str(&responses_table(op, defs, Self::param_link));
            out.push('\n');
        }

        TocItem::new(2, &op.type_name, op_id)
    }
}

impl DocWriter for MarkdownWriter<'_> {
    fn extension(&self) -> &'static str {
        ".md"
    }

    fn default_static_content(&self, title: &str) -> String {
        format!("## {title}\n\n")
    }

    fn write_overview(&mut self) -> Result<()> {
        self.static_section("Overview", "Overview", "overview", "overview.md")
    }

    fn write_api_group_versions(&mut self, gvs: &GroupVersions) -> Result<()> {
        let file = "group_versions.md";
        let mut out = String::from("---\ntitle: API Groups and Versions\nweight: 20\n---\n\n");
        out.push_str("The API Groups and their versions are summarized in the following table.\n\n");
        out.push_str(&group_versions_table(gvs));
        out.push('\n');
        write_file(&self.ctx.config.build_dir().join(file), &out)?;

        self.toc
            .push_section(TocItem::new(1, "API Groups", "api-groups").with_file(file));
        Ok(())
    }

    fn write_resource_category(&mut self, name: &str, file: &str) -> Result<()> {
        let config = self.ctx.config;
        let location = format!("{file}{}", self.extension());
        write_static_file(
            config.sections_dir(),
            config.build_dir(),
            &location,
            &self.default_static_content(name),
        )?;
        self.toc.push_section(
            TocItem::new(1, name.to_uppercase(), slug(name)).with_file(location),
        );
        Ok(())
    }

    fn write_resource(&mut self, resource: &Resource, d: &Definition) -> Result<()> {
        let file = format!("resources/{}", Self::page_name(d));
        let title = format!(
            "{} ({}/{})",
            resource.name,
            d.group_display_name(),
            d.version
        );
        let anchor = d.md_anchor();

        let mut out = String::new();
        let _ = writeln!(out, "## {title} {{#{anchor}}}\n");
        Self::write_samples(&mut out, d);
        Self::write_gvk(&mut out, d, &resource.name);

        if !resource.description_warning.is_empty() {
            let _ = writeln!(
                out,
                "<aside class=\"warning\">{}</aside>\n",
                resource.description_warning
            );
        }
        if !resource.description_note.is_empty() {
            let _ = writeln!(
                out,
                "<aside class=\"notice\">{}</aside>\n",
                resource.description_note
            );
        }

        self.write_other_versions(&mut out, d);
        self.write_appears_in(&mut out, d);
        self.write_fields(&mut out, d);
        out.push('\n');

        for inline in d
            .inline
            .iter()
            .filter_map(|key| self.ctx.model.definitions.get(key))
        {
            let _ = writeln!(out, "### {}\n", inline.name_group_version());
            self.write_appears_in(&mut out, inline);
            self.write_fields(&mut out, inline);
            out.push('\n');
        }

        let mut section = TocItem::new(1, title, anchor).with_file(&file);

        if self.ctx.config.build_operations {
            for category in &d.operation_categories {
                if category.operations.is_empty() {
                    continue;
                }
                let cat_id = category_id(&category.name, d);
                let _ = writeln!(out, "## {} {{#{cat_id}}}\n", category.name);

                let mut item = TocItem::new(2, &category.name, cat_id);
                for op in &category.operations {
                    let op_item = self.write_operation(&mut out, op, d);
                    item.sub_sections.push(op_item);
                }
                section.sub_sections.push(item);
            }
        }

        write_file(&self.ctx.config.build_dir().join(&file), &out)?;
        tracing::debug!(file = %file, "wrote resource");
        self.toc.push_section(section);
        Ok(())
    }

    fn write_definitions_overview(&mut self) -> Result<()> {
        self.static_section("Definitions", "DEFINITIONS", "definitions", "definitions.md")
    }

    fn write_definition(&mut self, d: &Definition) -> Result<()> {
        let file = format!("definitions/{}", Self::page_name(d));
        let title = d.name_group_version();
        let anchor = d.md_anchor();

        let mut out = String::new();
        let _ = writeln!(out, "## {title} {{#{anchor}}}\n");
        Self::write_gvk(&mut out, d, &d.name);
        let _ = writeln!(out, "\n{}\n", d.description_with_entities());
        self.write_fields(&mut out, d);
        out.push('\n');
        self.write_other_versions(&mut out, d);
        self.write_appears_in(&mut out, d);

        write_file(&self.ctx.config.build_dir().join(&file), &out)?;
        tracing::debug!(file = %file, "wrote definition");
        self.toc
            .push_sub_section(TocItem::new(2, title, anchor).with_file(file));
        Ok(())
    }

    fn write_old_versions_overview(&mut self) -> Result<()> {
        self.static_section("Old API Versions", "Old API Versions", "old-versions", "oldversions.md")
    }

    fn finalize(&mut self) -> Result<Vec<String>> {
        let config = self.ctx.config;
        let index = config.sections_dir().join("index.md");
        let template = match std::fs::read_to_string(&index) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(file = %index.display(), error = %e, "index template not found");
                format!("---\ntitle: \"{}\"\n---\n\n{}\n", self.toc.title, self.toc.copyright)
            }
        };
        let text = substitute_placeholders(&template, &self.ctx.timestamp(), self.ctx.release());
        write_file(&config.build_dir().join("_index.md"), &text)?;

        Ok(missing_fragments(config.build_dir(), &self.toc.files()))
    }

    fn toc(&self) -> &Toc {
        &self.toc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidocs_core::ApiModel;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::config::GenerateConfig;

    const MODEL: &str = indoc! {r#"
        spec_version: v1.29.3
        definitions:
          - name: Pod
            group: core
            version: v1
            description: Pod is a collection of containers.
            sample:
              note: Pod Config to print "Hello World".
              samples:
                - tab: "bdocs-tab:kubectl"
                  type: "bdocs-tab:kubectl_yaml"
                  text: "kind: Pod"
            fields:
              - name: spec
                type: PodSpec
                description: |
                  Specification of the pod.
                  More info in the API conventions.
                definition: { name: PodSpec, group: core, version: v1 }
            inline:
              - { name: PodCondition, group: core, version: v1 }
            operation_categories:
              - name: Write Operations
                operations:
                  - type: Create
                    description: create a Pod
                    http_method: POST
                    path: /api/v1/namespaces/{namespace}/pods
                    path_params:
                      - { name: namespace, type: string, description: object name and auth scope }
                    http_responses:
                      - code: "200"
                        field: { type: Pod, description: OK, definition: { name: Pod, group: core, version: v1 } }
              - name: Misc Operations
                operations: []
          - name: PodSpec
            group: core
            version: v1
            appears_in:
              - { name: Pod, group: core, version: v1 }
            fields:
              - { name: hostname, type: string, patch_strategy: merge, patch_merge_key: name }
          - name: PodCondition
            group: core
            version: v1
            is_inlined: true
            fields:
              - { name: status, type: string }
        resource_categories:
          - name: Workloads APIs
            include: _workloads
            resources:
              - name: Pod
                description_warning: Pods are ephemeral.
                definition: { name: Pod, group: core, version: v1 }
    "#};

    fn render_resource(config: &GenerateConfig) -> (String, Toc) {
        let model = ApiModel::from_yaml_str(MODEL).unwrap();
        let mut writer = MarkdownWriter::new(Context {
            model: &model,
            config,
        });
        let category = &model.resource_categories[0];
        let resource = &category.resources[0];
        let pod = model.resource_definition(resource).unwrap();
        writer.write_resource(resource, pod).unwrap();
        let page = std::fs::read_to_string(
            config.build_dir().join("resources/pod-v1-core.md"),
        )
        .unwrap();
        (page, writer.toc.clone())
    }

    #[test]
    fn resource_page() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerateConfig::new(dir.path());
        let (page, toc) = render_resource(&config);

        assert!(page.starts_with("## Pod (core/v1) {#pod-(core/v1)}\n\n"));
        assert!(page.contains(">kubectl Pod Config to print \"Hello World\".\n\n```yaml\nkind: Pod\n```\n"));
        assert!(page.contains("`core` | `v1` | `Pod`\n"));
        assert!(page.contains("<aside class=\"warning\">Pods are ephemeral.</aside>"));
        assert!(page.contains(
            "`spec`<br /> *[PodSpec](#podspec-(core/v1))* | Specification of the pod. More info in the API conventions.\n"
        ));
        assert!(page.contains("### PodCondition (core/v1)\n\n"));
        assert!(page.contains("## Write Operations {#write-operations-pod-v1-core}\n"));
        assert!(page.contains("### Create {#create-pod-v1-core}\n"));
        assert!(page.contains("#### HTTP Request\n\n`POST /api/v1/namespaces/{namespace}/pods`\n"));
        assert!(page.contains("##### Path Parameters\n"));
        assert!(page.contains("<a href=\"#pod-(core/v1)\">Pod</a>"));
        assert!(!page.contains("Misc Operations"));

        let section = &toc.sections[0];
        assert_eq!(section.file.as_deref(), Some("resources/pod-v1-core.md"));
        assert_eq!(section.sub_sections.len(), 1);
        assert_eq!(section.sub_sections[0].sub_sections[0].link, "create-pod-v1-core");
    }

    #[test]
    fn operations_skipped_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerateConfig::new(dir.path()).build_operations(false);
        let (page, toc) = render_resource(&config);

        assert!(!page.contains("Write Operations"));
        assert!(toc.sections[0].sub_sections.is_empty());
    }

    #[test]
    fn definition_page_lists_patch_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerateConfig::new(dir.path());
        let model = ApiModel::from_yaml_str(MODEL).unwrap();
        let mut writer = MarkdownWriter::new(Context {
            model: &model,
            config: &config,
        });
        writer.write_definitions_overview().unwrap();
        let spec = model
            .definitions
            .iter()
            .find(|d| d.name == "PodSpec")
            .unwrap();
        writer.write_definition(spec).unwrap();

        let page =
            std::fs::read_to_string(dir.path().join("build/definitions/podspec-v1-core.md"))
                .unwrap();
        let expected_fields = concat!(
            "Field        | Description\n",
            "------------ | -----------\n",
            "`hostname`<br /> *string*<br /> **patch strategy**: *merge*<br /> **patch merge key**: *name* | \n",
        );
        assert!(page.contains(expected_fields), "{page}");
        assert!(page.contains("### Appears In:\n\n- [Pod](#pod-(core/v1))\n"));

        let definitions = &writer.toc.sections[0];
        assert_eq!(definitions.title, "DEFINITIONS");
        assert_eq!(
            definitions.sub_sections[0].file.as_deref(),
            Some("definitions/podspec-v1-core.md")
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("build/definitions.md")).unwrap(),
            "## Definitions\n\n"
        );
    }

    #[test]
    fn finalize_substitutes_index() {
        let dir = tempfile::tempdir().unwrap();
        let sections = dir.path().join("static_includes");
        std::fs::create_dir_all(&sections).unwrap();
        std::fs::write(sections.join("index.md"), "Release RELEASE, built TIMESTAMP\n").unwrap();

        let config = GenerateConfig::new(dir.path());
        let model = ApiModel::from_yaml_str(MODEL).unwrap();
        let mut writer = MarkdownWriter::new(Context {
            model: &model,
            config: &config,
        });
        writer.write_overview().unwrap();
        writer
            .toc
            .push_section(TocItem::new(1, "Gone", "gone").with_file("gone.md"));
        let missing = writer.finalize().unwrap();

        let index = std::fs::read_to_string(dir.path().join("build/_index.md")).unwrap();
        assert!(index.starts_with("Release 1.29, built "));
        assert!(!index.contains("TIMESTAMP"));
        assert_eq!(missing, vec!["gone.md"]);
    }
}
