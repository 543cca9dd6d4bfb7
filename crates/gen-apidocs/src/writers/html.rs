//! Single-page HTML reference.
//!
//! Fragments go to the includes directory. [`finalize`](DocWriter::finalize)
//! concatenates them in TOC order into `index.html` under the build
//! directory, next to the `navData.js` the sidebar script reads.

use std::fmt::Write as _;

use apidocs_core::{Definition, ExampleText, GroupVersions, Operation, Resource};

use super::helpers::{
    category_id, group_versions_table, missing_fragments, one_line, operation_id, params_table,
    responses_table, slug, write_file, write_static_file,
};
use super::Context;
use crate::error::Result;
use crate::generate::DocWriter;
use crate::toc::{Toc, TocItem};

pub(crate) struct HtmlWriter<'a> {
    ctx: Context<'a>,
    toc: Toc,
}

/// `-strong-<id>-strong-`, the anchor form of static sections.
fn strong_link(title: &str) -> String {
    format!("-strong-{}-strong-", slug(title))
}

/// Caption of an operation example, with the usual `kubectl`/`curl`
/// wording normalized.
fn example_caption(e: &ExampleText) -> String {
    match e.tab_name() {
        "curl" if e.msg.contains("proxy") => {
            "<CODE>curl</CODE> command (<I>requires <code>kubectl proxy</code> to be running</I>)"
                .to_string()
        }
        "kubectl" if e.msg.contains("Command") => "<CODE>kubectl</CODE> command".to_string(),
        _ => e.msg.clone(),
    }
}

fn write_collapse_button(out: &mut String, id: &str, text: &str) {
    out.push_str("<BUTTON class=\"btn btn-info\" type=\"button\" data-toggle=\"collapse\"\n");
    let _ = writeln!(out, "  data-target=\"#{id}\" aria-controls=\"{id}\"");
    let _ = writeln!(out, "  aria-expanded=\"false\">{text}</BUTTON>");
}

fn write_collapse_panel(out: &mut String, id: &str, heading: &str, e: &ExampleText) {
    let _ = writeln!(out, "<DIV class=\"collapse\" id=\"{id}\">");
    let _ = writeln!(
        out,
        "  <DIV class=\"panel panel-default\">\n<DIV class=\"panel-heading\">{heading}</DIV>"
    );
    let _ = write!(
        out,
        "  <DIV class=\"panel-body\">\n<PRE class=\"{}\"><CODE class=\"lang-{}\">\n",
        e.tab_name(),
        e.language()
    );
    let _ = writeln!(
        out,
        "{}\n</CODE></PRE></DIV></DIV></DIV>",
        html_escape::encode_text(&e.text)
    );
}

impl<'a> HtmlWriter<'a> {
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
        out.push_str("<DIV class=\"alert alert-success col-md-8\"><I class=\"fa fa-toggle-right\"></I> Other API versions of this object exist:\n");
        let links: Vec<String> = versions.iter().map(|v| v.version_link()).collect();
        out.push_str(&links.join("\n"));
        out.push_str("\n</DIV>\n");
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
        out.push_str("<DIV class=\"alert alert-info col-md-8\"><I class=\"fa fa-info-circle\"></I> Appears In:\n <UL>\n");
        for a in parents {
            let _ = writeln!(out, "  <LI>{}</LI>", a.full_href_link());
        }
        out.push_str(" </UL>\n</DIV>\n");
    }

    fn write_fields(&self, out: &mut String, d: &Definition) {
        out.push_str("<TABLE>\n<THEAD><TR><TH>Field</TH><TH>Description</TH></TR></THEAD>\n<TBODY>\n");
        for field in &d.fields {
            let _ = write!(out, "<TR><TD><CODE>{}</CODE>", field.name);
            if !field.type_name.is_empty() {
                let link = field.link_with(&self.ctx.model.definitions, Definition::href_link);
                let _ = write!(out, "<BR /><I>{link}</I>");
            }
            if let Some(strategy) = &field.patch_strategy {
                let _ = write!(out, "<BR /><B>patch strategy</B>: <I>{strategy}</I>");
            }
            if let Some(key) = &field.patch_merge_key {
                let _ = write!(out, "<BR /><B>patch merge key</B>: <I>{key}</I>");
            }
            let _ = writeln!(
                out,
                "</TD><TD>{}</TD></TR>",
                one_line(&field.description_with_entities())
            );
        }
        out.push_str("</TBODY>\n</TABLE>\n");
    }

    fn write_gvk(out: &mut String, d: &Definition, kind: &str) {
        out.push_str("<TABLE class=\"col-md-8\">\n<THEAD><TR><TH>Group</TH><TH>Version</TH><TH>Kind</TH></TR></THEAD>\n<TBODY>\n");
        let _ = writeln!(
            out,
            "<TR><TD><CODE>{}</CODE></TD><TD><CODE>{}</CODE></TD><TD><CODE>{kind}</CODE></TD></TR>",
            d.group_display_name(),
            d.version
        );
        out.push_str("</TBODY>\n</TABLE>\n");
    }

    fn write_samples(out: &mut String, d: &Definition) {
        let samples = d.samples();
        if samples.is_empty() {
            return;
        }
        let note = d.sample.as_ref().map_or("", |s| s.note.as_str());
        let link_id = d.link_id();
        for s in samples {
            let id = format!("{}-{link_id}", s.tab_name());
            write_collapse_button(out, &id, &format!("{} example", s.tab_name()));
        }
        for s in samples {
            let id = format!("{}-{link_id}", s.tab_name());
            write_collapse_panel(out, &id, note, s);
        }
    }

    fn write_operation_samples(out: &mut String, request: bool, op_id: &str, examples: &[ExampleText]) {
        let (prefix, kind) = if request {
            ("req", "request")
        } else {
            ("res", "response")
        };
        for e in examples {
            let id = format!("{prefix}-{}-{op_id}", e.tab_name());
            write_collapse_button(out, &id, &format!("{} {kind} example", e.tab_name()));
        }
        for e in examples {
            let id = format!("{prefix}-{}-{op_id}", e.tab_name());
            write_collapse_panel(out, &id, &example_caption(e), e);
        }
    }

    fn write_operation(&self, out: &mut String, op: &Operation, d: &Definition) -> TocItem {
        let defs = &self.ctx.model.definitions;
        let op_id = operation_id(op, d);
        let _ = writeln!(out, "<H2 id=\"{op_id}\">{}</H2>", op.type_name);

        Self::write_operation_samples(out, true, &op_id, &op.example_requests);
        Self::write_operation_samples(out, false, &op_id, &op.example_responses);

        let _ = writeln!(out, "<P>{}</P>", op.description);
        let _ = writeln!(out, "<H3>HTTP Request</H3>\n<CODE>{}</CODE>", op.display_http());

        for (title, params) in [
            ("Path Parameters", &op.path_params),
            ("Query Parameters", &op.query_params),
            ("Body Parameters", &op.body_params),
        ] {
            if !params.is_empty() {
                let _ = writeln!(out, "<H3>{title}</H3>");
                out.push_str(&params_table(params, defs, Definition::href_link));
            }
        }

        if !op.http_responses.is_empty() {
            out.push_str("<H3>Response</H3>\n");
            out.push_str(&responses_table(op, defs, Definition::href_link));
        }

        TocItem::new(2, &op.type_name, op_id)
    }

    fn index_html(&self, body: &str) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<HTML>\n<HEAD>\n<META charset=\"UTF-8\">\n");
        let _ = writeln!(out, "<TITLE>{}</TITLE>", self.toc.title);
        out.push_str(concat!(
            "<LINK rel=\"shortcut icon\" href=\"favicon.ico\" type=\"image/vnd.microsoft.icon\">\n",
            "<LINK rel=\"stylesheet\" href=\"css/bootstrap.min.css\">\n",
            "<LINK rel=\"stylesheet\" href=\"css/font-awesome.min.css\" type=\"text/css\">\n",
            "<LINK rel=\"stylesheet\" href=\"css/stylesheet.css\" type=\"text/css\">\n",
            "</HEAD>\n<BODY>\n",
        ));

        out.push_str("<DIV id=\"sidebar-wrapper\" class=\"side-nav side-bar-nav\">\n");
        out.push_str(&self.toc.nav_html());
        let _ = writeln!(out, "<BR/><DIV id=\"copyright\">{}</DIV>", self.toc.copyright);
        let _ = writeln!(
            out,
            "<DIV id=\"generated-at\">Generated at: {}</DIV>",
            self.ctx.timestamp()
        );
        let release = self.ctx.release();
        if !release.is_empty() {
            let _ = writeln!(out, "<DIV id=\"release\">API Release: {release}</DIV>");
        }
        out.push_str("</DIV>\n");

        out.push_str("<DIV id=\"wrapper\">\n<DIV id=\"page-content-wrapper\" class=\"body-content container-fluid\">\n");
        out.push_str(body);
        out.push_str("</DIV>\n</DIV>\n");

        out.push_str(concat!(
            "<SCRIPT src=\"jquery-3.2.1.min.js\"></SCRIPT>\n",
            "<SCRIPT src=\"jquery.scrollTo.min.js\"></SCRIPT>\n",
            "<SCRIPT src=\"bootstrap-3.3.7.min.js\"></SCRIPT>\n",
            "<SCRIPT src=\"navData.js\"></SCRIPT>\n",
            "<SCRIPT src=\"scroll.js\"></SCRIPT>\n",
            "</BODY>\n</HTML>\n",
        ));
        out
    }
}

impl DocWriter for HtmlWriter<'_> {
    fn extension(&self) -> &'static str {
        ".html"
    }

    fn default_static_content(&self, title: &str) -> String {
        format!("<H1 id=\"{}\">{}</H1>\n", strong_link(title), title.to_uppercase())
    }

    fn write_overview(&mut self) -> Result<()> {
        self.static_section("API Overview", "Overview", "_overview.html")
    }

    fn write_api_group_versions(&mut self, gvs: &GroupVersions) -> Result<()> {
        let file = "_group_versions.html";
        let link = strong_link("API Groups");
        let mut out = format!("<H1 id=\"{link}\">API GROUPS</H1>\n");
        out.push_str("<P>The API Groups and their versions are summarized in the following table.</P>\n");
        out.push_str(&group_versions_table(gvs));
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
        let file = format!("_{}.html", apidocs_core::concept_file_name(d));
        let title = format!("{} {} {}", resource.name, d.version, d.group_display_name());
        let link_id = d.link_id();

        let mut out = String::new();
        let _ = writeln!(out, "<H1 id=\"{link_id}\">{title}</H1>");
        Self::write_samples(&mut out, d);
        Self::write_gvk(&mut out, d, &resource.name);

        if !resource.description_warning.is_empty() {
            let _ = writeln!(
                out,
                "<DIV class=\"alert alert-warning col-md-8\"><P><I class=\"fa fa-warning\"></I> <B>Warning:</B></P><P>{}</P></DIV>",
                resource.description_warning
            );
        }
        if !resource.description_note.is_empty() {
            let _ = writeln!(
                out,
                "<DIV class=\"alert alert-info col-md-8\"><I class=\"fa fa-bullhorn\"></I> {}</DIV>",
                resource.description_note
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
                "<H3 id=\"{}\">{} {} {}</H3>",
                inline.link_id(),
                inline.name,
                inline.version,
                inline.group_display_name()
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
                let _ = writeln!(out, "<H2 id=\"{cat_id}\">{}</H2>", category.name);

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
        self.static_section("Definitions", "DEFINITIONS", "_definitions.html")
    }

    fn write_definition(&mut self, d: &Definition) -> Result<()> {
        let file = format!("_{}.html", apidocs_core::definition_file_name(d));
        let title = format!("{} {} {}", d.name, d.version, d.group_display_name());
        let link_id = d.link_id();

        let mut out = String::new();
        let _ = writeln!(out, "<H2 id=\"{link_id}\">{title}</H2>");
        Self::write_gvk(&mut out, d, &d.name);
        let _ = writeln!(out, "<P>{}</P>", d.description_with_entities());
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
        self.static_section("Old API Versions", "OLD API VERSIONS", "_oldversions.html")
    }

    fn finalize(&mut self) -> Result<Vec<String>> {
        let config = self.ctx.config;
        let includes = config.includes_dir();

        let nav_data = serde_json::to_string(&self.toc.nav_data())?;
        write_file(
            &config.build_dir().join("navData.js"),
            &format!("(function(){{navData = {nav_data};}})();\n"),
        )?;

        let files = self.toc.files();
        let missing = missing_fragments(includes, &files);
        let mut body = String::new();
        for file in files.iter().filter(|f| !missing.iter().any(|m| m == *f)) {
            let path = includes.join(file);
            let fragment = std::fs::read_to_string(&path)?;
            body.push_str(&fragment);
            if !fragment.ends_with('\n') {
                body.push('\n');
            }
        }

        // Fragments go in verbatim; the shell already carries the
        // timestamp and release.
        write_file(&config.build_dir().join("index.html"), &self.index_html(&body))?;
        Ok(missing)
    }

    fn toc(&self) -> &Toc {
        &self.toc
    }
}
