//! File and markup helpers shared across the writers.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use apidocs_core::{Definition, Definitions, Field, GroupVersions, Operation};

use crate::error::{Error, Result};

/// Copy `<sections_dir>/<location>` to `<dest_dir>/<location>`, or create
/// the destination with `default` when the source does not exist.
///
/// Returns the destination path.
///
/// # Errors
///
/// Returns [`Error::StaticFile`] if the source cannot be inspected or
/// copied, or [`Error::Write`] if the default cannot be written.
pub fn write_static_file(
    sections_dir: &Path,
    dest_dir: &Path,
    location: &str,
    default: &str,
) -> Result<PathBuf> {
    let src = sections_dir.join(location);
    let dest = dest_dir.join(location);

    match std::fs::metadata(&src) {
        Ok(_) => {
            ensure_parent(&dest)?;
            std::fs::copy(&src, &dest).map_err(|source| Error::StaticFile {
                path: src.clone(),
                source,
            })?;
            tracing::debug!(from = %src.display(), to = %dest.display(), "copied static file");
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(file = %dest.display(), "creating default static file");
            write_file(&dest, default)?;
        }
        Err(source) => return Err(Error::StaticFile { path: src, source }),
    }
    Ok(dest)
}

/// Write `contents` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`Error::Write`] on any filesystem failure.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Check that each TOC fragment exists under `dir`, logging the result.
///
/// Returns the missing ones.
pub fn missing_fragments(dir: &Path, files: &[&str]) -> Vec<String> {
    let mut missing = Vec::new();
    for file in files {
        if dir.join(file).is_file() {
            tracing::info!(file, "collected");
        } else {
            tracing::warn!(file, "fragment not found");
            missing.push((*file).to_string());
        }
    }
    missing
}

/// Replace every `TIMESTAMP` and `RELEASE` in `text`.
#[must_use]
pub fn substitute_placeholders(text: &str, timestamp: &str, release: &str) -> String {
    text.replace("TIMESTAMP", timestamp)
        .replace("RELEASE", release)
}

/// Lowercase `s` and replace spaces with `-`.
#[must_use]
pub fn slug(s: &str) -> String {
    s.to_lowercase().replace(' ', "-")
}

/// Escape LaTeX special characters.
#[must_use]
pub fn escape_tex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Single-line form of a description for table cells.
#[must_use]
pub fn one_line(s: &str) -> String {
    s.trim().replace('\n', " ")
}

/// `<TABLE>` of API groups and their versions, one row per group.
#[must_use]
pub fn group_versions_table(gvs: &GroupVersions) -> String {
    let mut out = String::from(
        "<TABLE class=\"col-md-8\">\n<THEAD><TR><TH>Group</TH><TH>Version</TH></TR></THEAD>\n<TBODY>\n",
    );
    for (group, versions) in gvs {
        let versions: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        let _ = writeln!(
            out,
            "<TR><TD><CODE>{group}</CODE></TD><TD><CODE>{}</CODE></TD></TR>",
            versions.join(", ")
        );
    }
    out.push_str("</TBODY>\n</TABLE>\n");
    out
}

/// `<TABLE>` of operation parameters with linked types.
#[must_use]
pub fn params_table(
    params: &[Field],
    defs: &Definitions,
    link: impl Fn(&Definition) -> String,
) -> String {
    let mut out = String::from(
        "<TABLE>\n<THEAD><TR><TH>Parameter</TH><TH>Description</TH></TR></THEAD>\n<TBODY>\n",
    );
    for p in params {
        let _ = write!(out, "<TR><TD><CODE>{}</CODE>", p.name);
        if !p.type_name.is_empty() {
            let _ = write!(out, "<br /><I>{}</I>", p.link_with(defs, &link));
        }
        let _ = writeln!(out, "</TD><TD>{}</TD></TR>", one_line(&p.description));
    }
    out.push_str("</TBODY>\n</TABLE>\n");
    out
}

/// `<TABLE>` of an operation's responses, sorted by code.
#[must_use]
pub fn responses_table(
    op: &Operation,
    defs: &Definitions,
    link: impl Fn(&Definition) -> String,
) -> String {
    let mut out = String::from(
        "<TABLE>\n<THEAD><TR><TH>Code</TH><TH>Description</TH></TR></THEAD>\n<TBODY>\n",
    );
    for r in op.sorted_responses() {
        let _ = write!(out, "<TR><TD>{}", r.code);
        if !r.field.type_name.is_empty() {
            let _ = write!(out, "<br /><I>{}</I>", r.field.link_with(defs, &link));
        }
        let _ = writeln!(out, "</TD><TD>{}</TD></TR>", one_line(&r.field.description));
    }
    out.push_str("</TBODY>\n</TABLE>\n");
    out
}

/// Operation category anchor: `write-operations-pod-v1-core`.
#[must_use]
pub fn category_id(category: &str, definition: &Definition) -> String {
    format!("{}-{}", slug(category), definition.link_id())
}

/// Operation anchor: `patch-status-pod-v1-core`.
#[must_use]
pub fn operation_id(op: &Operation, definition: &Definition) -> String {
    format!("{}-{}", slug(&op.type_name), definition.link_id())
}
