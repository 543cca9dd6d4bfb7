//! Table of contents accumulated while rendering.
//!
//! Writers push level-1 sections (overview, categories, resources, ...)
//! and attach subsections to the most recent one. The finished tree drives
//! document assembly and navigation.

use serde::Serialize;
use serde_json::{json, Value};

/// One entry of the table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocItem {
    /// Nesting level used for styling (`1` for top-level sections).
    pub level: u8,
    /// Display title.
    pub title: String,
    /// Anchor id of the heading.
    pub link: String,
    /// Fragment file holding the entry's content, relative to the
    /// writer's output directory. `None` for headings inside a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Child entries.
    #[serde(rename = "subsections", skip_serializing_if = "Vec::is_empty")]
    pub sub_sections: Vec<TocItem>,
}

impl TocItem {
    /// An entry without a file.
    pub fn new(level: u8, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            link: link.into(),
            file: None,
            sub_sections: Vec::new(),
        }
    }

    /// Attach the fragment file.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// The table of contents of one rendered document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Toc {
    /// Document title.
    pub title: String,
    /// Copyright notice, in the writer's markup.
    pub copyright: String,
    /// Top-level sections in document order.
    pub sections: Vec<TocItem>,
}

impl Toc {
    /// An empty table of contents.
    pub fn new(title: impl Into<String>, copyright: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            copyright: copyright.into(),
            sections: Vec::new(),
        }
    }

    /// Append a top-level section; it becomes the current section.
    pub fn push_section(&mut self, item: TocItem) {
        self.sections.push(item);
    }

    /// Append a subsection to the current section. Becomes a section
    /// itself when nothing has been pushed yet.
    pub fn push_sub_section(&mut self, item: TocItem) {
        match self.sections.last_mut() {
            Some(current) => current.sub_sections.push(item),
            None => {
                tracing::debug!(title = %item.title, "subsection without a section");
                self.sections.push(item);
            }
        }
    }

    /// Every fragment file, in document order, over three levels.
    #[must_use]
    pub fn files(&self) -> Vec<&str> {
        let mut files = Vec::new();
        for sec in &self.sections {
            files.extend(sec.file.as_deref());
            for sub in &sec.sub_sections {
                files.extend(sub.file.as_deref());
                for subsub in &sub.sub_sections {
                    files.extend(subsub.file.as_deref());
                }
            }
        }
        files.retain(|f| !f.is_empty());
        files
    }

    /// Sidebar navigation: one `<UL>` per section, with the subsections of
    /// each in a hidden list expanded by the page script. Links containing
    /// `strong` are rendered bold.
    #[must_use]
    pub fn nav_html(&self) -> String {
        let mut nav = String::new();
        for sec in &self.sections {
            nav.push_str("<UL>\n");
            nav.push_str(&nav_entry(" ", sec));
            if !sec.sub_sections.is_empty() {
                nav.push_str(&format!(
                    " <UL id=\"{}-nav\" style=\"display: none;\">\n",
                    sec.link
                ));
                for sub in &sec.sub_sections {
                    nav.push_str("  <UL>\n");
                    nav.push_str(&nav_entry("   ", sub));
                    if !sub.sub_sections.is_empty() {
                        nav.push_str(&format!(
                            "   <UL id=\"{}-nav\" style=\"display: none;\">\n",
                            sub.link
                        ));
                        for subsub in &sub.sub_sections {
                            nav.push_str(&nav_entry("    ", subsub));
                        }
                        nav.push_str("   </UL>\n");
                    }
                    nav.push_str("  </UL>\n");
                }
                nav.push_str(" </UL>\n");
            }
            nav.push_str("</UL>\n");
        }
        nav
    }

    /// Navigation data for the page script: the nested section tree and a
    /// flat list of every link in reverse document order.
    #[must_use]
    pub fn nav_data(&self) -> Value {
        fn nested(items: &[TocItem]) -> Vec<Value> {
            items
                .iter()
                .map(|item| {
                    json!({
                        "section": item.link,
                        "subsections": nested(&item.sub_sections),
                    })
                })
                .collect()
        }

        fn flatten<'a>(items: &'a [TocItem], out: &mut Vec<&'a str>) {
            for item in items {
                out.push(&item.link);
                flatten(&item.sub_sections, out);
            }
        }

        let mut flat = Vec::new();
        flatten(&self.sections, &mut flat);
        flat.reverse();

        json!({
            "toc": nested(&self.sections),
            "flatToc": flat,
        })
    }

    /// Indented plain-text outline, one entry per line.
    #[must_use]
    pub fn outline(&self) -> String {
        fn walk(items: &[TocItem], depth: usize, out: &mut String) {
            for item in items {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&item.title);
                if let Some(file) = &item.file {
                    out.push_str(&format!(" [{file}]"));
                }
                out.push('\n');
                walk(&item.sub_sections, depth + 1, out);
            }
        }

        let mut out = String::new();
        walk(&self.sections, 0, &mut out);
        out
    }
}

fn nav_entry(indent: &str, item: &TocItem) -> String {
    if item.link.contains("strong") {
        format!(
            "{indent}<LI class=\"nav-level-{} strong-nav\"><A href=\"#{}\" class=\"nav-item\"><STRONG>{}</STRONG></A></LI>\n",
            item.level, item.link, item.title
        )
    } else {
        format!(
            "{indent}<LI class=\"nav-level-{}\"><A href=\"#{}\" class=\"nav-item\">{}</A></LI>\n",
            item.level, item.link, item.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn sample_toc() -> Toc {
        let mut toc = Toc::new("Reference", "(c)");
        toc.push_section(
            TocItem::new(1, "Overview", "-strong-api-overview-strong-").with_file("_overview.html"),
        );
        toc.push_section(TocItem::new(1, "Pod v1 core", "pod-v1-core").with_file("_pod.html"));
        let mut category = TocItem::new(2, "Write Operations", "write-operations-pod-v1-core");
        category
            .sub_sections
            .push(TocItem::new(2, "Create", "create-pod-v1-core"));
        toc.push_sub_section(category);
        toc.push_section(
            TocItem::new(1, "DEFINITIONS", "-strong-definitions-strong-")
                .with_file("_definitions.html"),
        );
        toc.push_sub_section(
            TocItem::new(2, "ObjectMeta v1 meta", "objectmeta-v1-meta").with_file("_meta.html"),
        );
        toc
    }

    #[test]
    fn sub_sections_attach_to_latest_section() {
        let toc = sample_toc();
        assert_eq!(toc.sections.len(), 3);
        assert_eq!(toc.sections[1].sub_sections.len(), 1);
        assert_eq!(toc.sections[1].sub_sections[0].sub_sections.len(), 1);
        assert_eq!(
            toc.sections.last().map(|s| s.title.as_str()),
            Some("DEFINITIONS")
        );
    }

    #[test]
    fn sub_section_without_section_becomes_section() {
        let mut toc = Toc::default();
        toc.push_sub_section(TocItem::new(2, "Orphan", "orphan"));
        assert_eq!(toc.sections.len(), 1);
    }

    #[test]
    fn files_in_document_order() {
        let toc = sample_toc();
        assert_eq!(
            toc.files(),
            vec![
                "_overview.html",
                "_pod.html",
                "_definitions.html",
                "_meta.html"
            ]
        );
    }

    #[test]
    fn nav_html_nests_sub_sections() {
        let mut toc = Toc::default();
        toc.push_section(TocItem::new(1, "Overview", "-strong-api-overview-strong-"));
        toc.push_section(TocItem::new(1, "Pod", "pod-v1-core"));
        let mut category = TocItem::new(2, "Read", "read-pod-v1-core");
        category
            .sub_sections
            .push(TocItem::new(2, "List", "list-pod-v1-core"));
        toc.push_sub_section(category);

        let expected = indoc! {r##"
            <UL>
             <LI class="nav-level-1 strong-nav"><A href="#-strong-api-overview-strong-" class="nav-item"><STRONG>Overview</STRONG></A></LI>
            </UL>
            <UL>
             <LI class="nav-level-1"><A href="#pod-v1-core" class="nav-item">Pod</A></LI>
             <UL id="pod-v1-core-nav" style="display: none;">
              <UL>
               <LI class="nav-level-2"><A href="#read-pod-v1-core" class="nav-item">Read</A></LI>
               <UL id="read-pod-v1-core-nav" style="display: none;">
                <LI class="nav-level-2"><A href="#list-pod-v1-core" class="nav-item">List</A></LI>
               </UL>
              </UL>
             </UL>
            </UL>
        "##};
        assert_eq!(toc.nav_html(), expected);
    }

    #[test]
    fn nav_data_shape() {
        let toc = sample_toc();
        let data = toc.nav_data();
        assert_eq!(data["toc"].as_array().unwrap().len(), 3);
        assert_eq!(data["toc"][1]["section"], "pod-v1-core");
        assert_eq!(
            data["toc"][1]["subsections"][0]["subsections"][0]["section"],
            "create-pod-v1-core"
        );
        let flat: Vec<&str> = data["flatToc"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            flat,
            vec![
                "objectmeta-v1-meta",
                "-strong-definitions-strong-",
                "create-pod-v1-core",
                "write-operations-pod-v1-core",
                "pod-v1-core",
                "-strong-api-overview-strong-",
            ]
        );
    }

    #[test]
    fn outline_indents_levels() {
        let toc = sample_toc();
        let outline = toc.outline();
        assert!(outline.starts_with("Overview [_overview.html]\n"));
        assert!(outline.contains("\n  Write Operations\n    Create\n"));
    }
}
