//! Output format renderers.
//!
//! - [`markdown`]: Hugo pages under the build directory
//! - [`html`]: fragments under the includes directory, stitched into a
//!   single `index.html` with a navigation sidebar
//! - [`tex`]: fragments under the includes directory, included from a
//!   `main.tex` book

mod helpers;
mod html;
mod markdown;
mod tex;

use apidocs_core::ApiModel;

use crate::config::{Format, GenerateConfig};
use crate::generate::DocWriter;
use crate::toc::Toc;

pub use helpers::{escape_tex, substitute_placeholders, write_static_file};

/// What every writer renders from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub model: &'a ApiModel,
    pub config: &'a GenerateConfig,
}

impl Context<'_> {
    fn new_toc(&self) -> Toc {
        Toc::new(self.config.document_title(), self.config.copyright())
    }

    fn timestamp(&self) -> String {
        self.config.timestamp()
    }

    fn release(&self) -> &str {
        self.model.release()
    }
}

/// Writer for the configured format.
pub(crate) fn new_writer<'a>(
    model: &'a ApiModel,
    config: &'a GenerateConfig,
) -> Box<dyn DocWriter + 'a> {
    let ctx = Context { model, config };
    match config.output_format() {
        Format::Markdown => Box::new(markdown::MarkdownWriter::new(ctx)),
        Format::Html => Box::new(html::HtmlWriter::new(ctx)),
        Format::Tex => Box::new(tex::TexWriter::new(ctx)),
    }
}
