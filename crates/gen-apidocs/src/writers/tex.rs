//! LaTeX book.
//!
//! Fragments go to the includes directory; `main.tex` under the build
//! directory pulls them in with `\include`, in TOC order.

use std::fmt::Write as _;
use std::path::Path;

use apidocs_core::{Definition, Definitions, ExampleText, Field, GroupVersions, Operation, Resource};

use super::helpers::{
    category_id, escape_tex, missing_fragments, one_line, operation_id, slug, write_file,
    write_static_file,
};
use super::Context;
use crate::error::Result;
use crate::generate::DocWriter;
use crate::toc::{Toc, TocItem};

pub(crate) struct TexWriter<'a> {
    ctx: Context<'a>,
    toc: Toc,
}

fn strong_link(title: &str) -> String {
    format!("-strong-{}-strong-", slug(title))
}

fn hyperref(label: &str, text: &str) -> String {
    format!("\\hyperref[{label}]{{{}}}", escape_tex(text))
}

/// Escaped field type with the referenced definition's name turned into a
/// cross reference.
fn type_link(field: &Field, defs: &Definitions) -> String {
    let escaped = escape_tex(&field.type_name);
    match field.definition.as_ref().and_then(|key| defs.get(key)) {
        Some(def) => escaped.replace(&escape_tex(&def.name), &hyperref(&def.link_id(), &def.name)),
        None => escaped,
    }
}

fn write_listing(out: &mut String, text: &str) {
    let _ = writeln!(out, "\\begin{{lstlisting}}\n{text}\n\\end{{lstlisting}}\n");
}

/// Path of `path` relative to `base`, with `/` separators, for `\include`.
fn include_path(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

impl<'a> TexWriter<'a> {
    pub(crate) fn new(ctx: Context<'a>) -> Self {
        Self {
            toc: ctx.new_toc(),
            ctx,
        }
    }

    fn static_section(&mut self, title: &str, toc_title: &str, location: &str) -> Result<()> {
        let config = self.ctx.config;
        write_static_file(
            config.sections_dir(),
            config.includes_dir(),
            location,
            &self.default_static_content(title),
        )?;
        self.toc.push_section(
            TocItem::new(1, toc_title, strong_link(title)).with_file(location),
        );
        Ok(())
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
        out.push_str("Other API versions of this object exist:\n\\begin{itemize}\n");
        for v in versions {
            let _ = writeln!(out, "\\item {}", hyperref(&v.link_id(), v.version.as_str()));
        }
        out.push_str("\\end{itemize}\n\n");
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
        out.push_str("Appears In:\n\\begin{itemize}\n");
        for a in parents {
            let (_, text) = a.full_href_link_data();
            let _ = writeln!(out, "\\item {}", hyperref(&a.link_id(), &text));
        }
        out.push_str("\\end{itemize}\n\n");
    }

    fn write_fields(&self, out: &mut String, d: &Definition) {
        if d.fields.is_empty() {
            return;
        }
        out.push_str("\\begin{longtable}{p{0.35\\textwidth}|p{0.6\\textwidth}}\n");
        out.push_str("\\hline\nField & Description\\\\\n\\hline\n\\endhead\n");
        for field in &d.fields {
            let _ = write!(out, "\\texttt{{{}}}", escape_tex(&field.name));
            if !field.type_name.is_empty() {
                let _ = write!(
                    out,
                    " \\newline \\textit{{{}}}",
                    type_link(field, &self.ctx.model.definitions)
                );
            }
            if let Some(strategy) = &field.patch_strategy {
                let _ = write!(
                    out,
                    " \\newline \\textbf{{patch strategy}}: \\textit{{{}}}",
                    escape_tex(strategy)
                );
            }
            if let Some(key) = &field.patch_merge_key {
                let _ = write!(
                    out,
                    " \\newline \\textbf{{patch merge key}}: \\textit{{{}}}",
                    escape_tex(key)
                );
            }
            let _ = writeln!(out, " & {} \\\\", escape_tex(&one_line(&field.description)));
        }
        out.push_str("\\hline\n\\end{longtable}\n\n");
    }

    fn write_gvk(out: &mut String, d: &Definition, kind: &str) {
        out.push_str("\\begin{tabular}{l|l|l}\n\\hline\nGroup & Version & Kind\\\\\n\\hline\n");
        let _ = writeln!(
            out,
            "\\texttt{{{}}} & \\texttt{{{}}} & \\texttt{{{}}}\\\\",
            escape_tex(d.group_display_name()),
            escape_tex(d.version.as_str()),
            escape_tex(kind)
        );
        out.push_str("\\hline\n\\end{tabular}\n\n");
    }

    fn write_samples(out: &mut String, d: &Definition) {
        let note = d.sample.as_ref().map_or("", |s| s.note.as_str());
        for s in d.samples() {
            let _ = writeln!(
                out,
                "\\textbf{{{} example}} {}\n",
                escape_tex(s.tab_name()),
                escape_tex(note)
            );
            write_listing(out, &s.text);
        }
    }

    fn write_operation_samples(out: &mut String, kind: &str, examples: &[ExampleText]) {
        for e in examples {
            let _ = writeln!(
                out,
                "\\paragraph{{{} {kind} example}}\n",
                escape_tex(e.tab_name())
            );
            write_listing(out, &e.text);
        }
    }

    fn write_params(&self, out: &mut String, title: &str, params: &[Field]) {
        let _ = writeln!(out, "\\paragraph{{{title}}}\n");
        out.push_str("\\begin{longtable}{p{0.35\\textwidth}|p{0.6\\textwidth}}\n");
        out.push_str("\\hline\nParameter & Description\\\\\n\\hline\n\\endhead\n");
        for p in params {
            let _ = write!(out, "\\texttt{{{}}}", escape_tex(&p.name));
            if !p.type_name.is_empty() {
                let _ = write!(
                    out,
                    " \\newline \\textit{{{}}}",
                    type_link(p, &self.ctx.model.definitions)
                );
            }
            let _ = writeln!(out, " & {} \\\\", escape_tex(&one_line(&p.description)));
        }
        out.push_str("\\hline\n\\end{longtable}\n\n");
    }

    fn write_responses(&self, out: &mut String, op: &Operation) {
        out.push_str("\\paragraph{Response}\n\n");
        out.push_str("\\begin{longtable}{p{0.35\\textwidth}|p{0.6\\textwidth}}\n");
        out.push_str("\\hline\nCode & Description\\\\\n\\hline\n\\endhead\n");
        for r in op.sorted_responses() {
            out.push_str(&escape_tex(&r.code));
            if !r.field.type_name.is_empty() {
                let _ = write!(
                    out,
                    " \\newline \\textit{{{}}}",
                    type_link(&r.field, &self.ctx.model.definitions)
                );
            }
            let _ = writeln!(
                out,
                " & {} \\\\",
                escape_tex(&one_line(&r.field.description))
            );
        }
        out.push_str("\\hline\n\\end{longtable}\n\n");
    }

    fn write_operation(&self, out: &mut String, op: &Operation, d: &Definition) -> TocItem {
        let op_id = operation_id(op, d);
        let _ = writeln!(
            out,
            "\\subsubsection{{{}}}\n\\label{{{op_id}}}\n",
            escape_tex(&op.type_name)
        );

        Self::write_operation_samples(out, "request", &op.example_requests);
        Self::write_operation_samples(out, "response", &op.example_responses);

        let _ = writeln!(out, "{}\n", escape_tex(&op.description));
        let _ = writeln!(
            out,
            "\\paragraph{{HTTP Request}}\n\n\\texttt{{{}}}\n",
            escape_tex(&op.display_http())
        );

        for (title, params) in [
            ("Path Parameters", &op.path_params),
            ("Query Parameters", &op.query_params),
            ("Body Parameters", &op.body_params),
        ] {
            if !params.is_empty() {
                self.write_params(out, title, params);
            }
        }
        if !op.http_responses.is_empty() {
            self.write_responses(out, op);
        }

        TocItem::new(2, &op.type_name, op_id)
    }

    fn main_tex(&self, files: &[&str]) -> String {
        let config = self.ctx.config;
        let sections = include_path(&config.config_dir, config.sections_dir());
        let includes = include_path(&config.config_dir, config.includes_dir());

        let mut out = String::from("\\documentclass[10pt,a4paper]{book}\n");
        let _ = writeln!(out, "\\include{{{sections}/package}}");
        let _ = writeln!(out, "\\include{{{sections}/format}}");
        out.push_str("\\begin{document}\n\n\\frontmatter\n");
        let _ = writeln!(out, "\\title{{{}}}", escape_tex(&self.toc.title));
        let _ = writeln!(out, "\\author{{{}}}", escape_tex(&config.author));
        let _ = writeln!(out, "\\date{{{}}}", escape_tex(&self.ctx.timestamp()));
        out.push_str("\\maketitle\n\n\\tableofcontents\n\n\\newpage\n\n\\mainmatter\n\n");

        for &file in files {
            let stem = file.strip_suffix(self.extension()).unwrap_or(file);
            let _ = writeln!(out, "\\include{{{includes}/{stem}}}");
        }

        let _ = writeln!(out, "\n{}\n", escape_tex(&self.toc.copyright));
        out.push_str("\\end{document}\n");
        out
    }
}

impl DocWriter for TexWriter<'_> {
    fn extension(&self) -> &'static str {
        ".tex"
    }

    fn default_static_content(&self, title: &str) -> String {
        format!("\\section{{{}}}\n\\label{{{}}}\n", escape_tex(title), strong_link(title))
    }

    fn write_overview(&mut self) -> Result<()> {
        self.static_section("API Overview", "Overview", "_overview.tex")
    }

    fn write_api_group_versions(&mut self, gvs: &GroupVersions) -> Result<()> {
        let file = "_group_versions.tex";
        let link = strong_link("API Groups");
        let mut out = format!("\\section{{API Groups}}\n\\label{{{link}}}\n\n");
        out.push_str("The API Groups and their versions are summarized in the following table.\n\n");
        out.push_str("\\begin{longtable}{l|l}\n\\hline\nGroup & Versions\\\\\n\\hline\n");
        for (group, versions) in gvs {
            let versions: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
            let _ = writeln!(
                out,
                "\\texttt{{{}}} & \\texttt{{{}}}\\\\",
                escape_tex(group),
                escape_tex(&versions.join(", "))
            );
        }
        out.push_str("\\hline\n\\end{longtable}\n");
        write_file(&self.ctx.config.includes_dir().join(file), &out)?;

        self.toc
            .push_section(TocItem::new(1, "API Groups", link).with_file(file));
        Ok(())
    }

    fn write_resource_category(&mut self, name: &str, file: &str) -> Result<()> {
        let location = format!("{file}{}", self.extension());
        self.static_section(name, &name.to_uppercase(), &location)
    }

    fn write_resource(&mut self, resource: &Resource, d: &Definition) -> Result<()> {
        let file = format!("_{}.tex", apidocs_core::concept_file_name(d));
        let title = format!("{} {} {}", resource.name, d.version, d.group_display_name());
        let link_id = d.link_id();

        let mut out = String::new();
        let _ = writeln!(out, "\\section{{{}}}\n\\label{{{link_id}}}\n", escape_tex(&title));
        Self::write_samples(&mut out, d);
        Self::write_gvk(&mut out, d, &resource.name);

        if !resource.description_warning.is_empty() {
            let _ = writeln!(
                out,
                "\\textbf{{Warning:}} {}\n",
                escape_tex(&resource.description_warning)
            );
        }
        if !resource.description_note.is_empty() {
            let _ = writeln!(
                out,
                "\\textbf{{Note:}} {}\n",
                escape_tex(&resource.description_note)
            );
        }

        self.write_other_versions(&mut out, d);
        self.write_appears_in(&mut out, d);
        self.write_fields(&mut out, d);

        for inline in d
            .inline
            .iter()
            .filter_map(|key| self.ctx.model.definitions.get(key))
        {
            let _ = writeln!(
                out,
                "\\subsection*{{{} {} {}}}\n\\label{{{}}}\n",
                escape_tex(&inline.name),
                inline.version,
                escape_tex(inline.group_display_name()),
                inline.link_id()
            );
            self.write_appears_in(&mut out, inline);
            self.write_fields(&mut out, inline);
        }

        let mut section = TocItem::new(1, title, link_id).with_file(&file);

        if self.ctx.config.build_operations {
            for category in &d.operation_categories {
                if category.operations.is_empty() {
                    continue;
                }
                let cat_id = category_id(&category.name, d);
                let _ = writeln!(
                    out,
                    "\\subsection{{{}}}\n\\label{{{cat_id}}}\n",
                    escape_tex(&category.name)
                );

                let mut item = TocItem::new(2, &category.name, cat_id);
                for op in &category.operations {
                    item.sub_sections.push(self.write_operation(&mut out, op, d));
                }
                section.sub_sections.push(item);
            }
        }

        write_file(&self.ctx.config.includes_dir().join(&file), &out)?;
        tracing::debug!(file = %file, "wrote resource");
        self.toc.push_section(section);
        Ok(())
    }

    fn write_definitions_overview(&mut self) -> Result<()> {
        self.static_section("Definitions", "DEFINITIONS", "_definitions.tex")
    }

    fn write_definition(&mut self, d: &Definition) -> Result<()> {
        let file = format!("_{}.tex", apidocs_core::definition_file_name(d));
        let title = format!("{} {} {}", d.name, d.version, d.group_display_name());
        let link_id = d.link_id();

        let mut out = String::new();
        let _ = writeln!(out, "\\subsection{{{}}}\n\\label{{{link_id}}}\n", escape_tex(&title));
        Self::write_gvk(&mut out, d, &d.name);
        let _ = writeln!(out, "{}\n", escape_tex(&d.description));
        self.write_other_versions(&mut out, d);
        self.write_appears_in(&mut out, d);
        self.write_fields(&mut out, d);

        write_file(&self.ctx.config.includes_dir().join(&file), &out)?;
        tracing::debug!(file = %file, "wrote definition");
        self.toc
            .push_sub_section(TocItem::new(2, title, link_id).with_file(file));
        Ok(())
    }

    fn write_old_versions_overview(&mut self) -> Result<()> {
        self.static_section("Old API Versions", "OLD API VERSIONS", "_oldversions.tex")
    }

    fn finalize(&mut self) -> Result<Vec<String>> {
        let config = self.ctx.config;
        let files = self.toc.files();
        let missing = missing_fragments(config.includes_dir(), &files);
        let present: Vec<&str> = files
            .iter()
            .copied()
            .filter(|f| !missing.iter().any(|m| m == f))
            .collect();

        write_file(&config.build_dir().join("main.tex"), &self.main_tex(&present))?;
        Ok(missing)
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

    use crate::config::{Format, GenerateConfig};

    const MODEL: &str = indoc! {r"
        spec_version: v1.29.0
        definitions:
          - name: ConfigMap
            group: core
            version: v1
            description: Holds configuration data for pods to consume.
            fields:
              - name: binary_data
                type: object
                description: Values may contain 100% binary & more.
              - name: metadata
                type: ObjectMeta
                definition: { name: ObjectMeta, group: meta, version: v1 }
            operation_categories:
              - name: Write Operations
                operations:
                  - type: Delete Collection
                    description: delete collection of ConfigMap
                    http_method: DELETE
                    path: /api/v1/namespaces/{namespace}/configmaps
                    http_responses:
                      - { code: '200', field: { type: Status, description: OK } }
          - name: ObjectMeta
            group: meta
            version: v1
            appears_in:
              - { name: ConfigMap, group: core, version: v1 }
    "};

    fn config(dir: &Path) -> GenerateConfig {
        GenerateConfig::new(dir).format(Format::Tex)
    }

    #[test]
    fn default_static_content_is_a_labelled_section() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let model = ApiModel::default();
        let writer = TexWriter::new(Context {
            model: &model,
            config: &config,
        });
        assert_eq!(
            writer.default_static_content("Config & Storage APIs"),
            "\\section{Config \\& Storage APIs}\n\\label{-strong-config-&-storage-apis-strong-}\n"
        );
    }

    #[test]
    fn resource_fragment_escapes_free_text() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let model = ApiModel::from_yaml_str(MODEL).unwrap();
        let mut writer = TexWriter::new(Context {
            model: &model,
            config: &config,
        });
        let cm = model
            .definitions
            .iter()
            .find(|d| d.name == "ConfigMap")
            .unwrap();
        writer
            .write_resource(&Resource::for_definition(cm.key()), cm)
            .unwrap();

        let tex = std::fs::read_to_string(
            dir.path()
                .join("includes/_generated_configmap_v1_core_concept.tex"),
        )
        .unwrap();
        assert!(tex.starts_with("\\section{ConfigMap v1 core}\n\\label{configmap-v1-core}\n"));
        assert!(tex.contains("\\texttt{binary\\_data} \\newline \\textit{object} & Values may contain 100\\% binary \\& more. \\\\"));
        assert!(tex.contains("\\textit{\\hyperref[objectmeta-v1-meta]{ObjectMeta}}"));
        assert!(tex.contains("\\subsection{Write Operations}\n\\label{write-operations-configmap-v1-core}"));
        assert!(tex.contains("\\subsubsection{Delete Collection}\n\\label{delete-collection-configmap-v1-core}"));
        assert!(tex.contains("\\texttt{DELETE /api/v1/namespaces/\\{namespace\\}/configmaps}"));
        assert!(tex.contains("\\paragraph{Response}"));
    }

    #[test]
    fn main_tex_includes_existing_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let model = ApiModel::from_yaml_str(MODEL).unwrap();
        let mut writer = TexWriter::new(Context {
            model: &model,
            config: &config,
        });
        writer.write_overview().unwrap();
        writer.write_definitions_overview().unwrap();
        let meta = model
            .definitions
            .iter()
            .find(|d| d.name == "ObjectMeta")
            .unwrap();
        writer.write_definition(meta).unwrap();
        writer
            .toc
            .push_section(TocItem::new(1, "Gone", "gone").with_file("_gone.tex"));

        let missing = writer.finalize().unwrap();
        assert_eq!(missing, vec!["_gone.tex"]);

        let main = std::fs::read_to_string(dir.path().join("build/main.tex")).unwrap();
        let expected = indoc! {r"
            \include{includes/_overview}
            \include{includes/_definitions}
            \include{includes/_generated_objectmeta_v1_meta_definition}
        "};
        assert!(main.contains(expected), "{main}");
        assert!(main.starts_with("\\documentclass[10pt,a4paper]{book}\n\\include{static_includes/package}\n"));
        assert!(main.contains("\\title{Kubernetes API Reference Docs}"));
        assert!(main.contains("\\author{Kubernetes Team}"));
        assert!(!main.contains("_gone"));
        assert!(main.ends_with("\\end{document}\n"));
    }
}
