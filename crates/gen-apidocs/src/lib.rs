#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod generate;
mod toc;
mod writers;

pub use config::{Format, GenerateConfig, ProjectConfig};
pub use error::{Error, Result};
pub use generate::{generate_files, DocWriter, GenerateReport};
pub use toc::{Toc, TocItem};
pub use writers::{escape_tex, substitute_placeholders, write_static_file};
