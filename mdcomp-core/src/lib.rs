//! # mdcomp-core - compile Markdown fragments into a single document
//!
//! Assembles one Markdown document from a root file and a tree of included
//! fragments, normalizes its headings and optionally generates a table of
//! contents. Only three constructs are recognized; everything else passes
//! through untouched:
//!
//! - include directives, a line of the form `:[label](path/to/file.md)`
//! - ATX headings, optionally with a trailing `{#anchor}` annotation
//! - the `[[_TOC_]]` placeholder
//!
//! ## Quick Start
//!
//! ```rust
//! use mdcomp_core::{CompileOptionsBuilder, Compiler, MemorySource};
//!
//! let source = MemorySource::new()
//!   .with_file("book/index.md", "# Book\n\n:[Intro](intro.md)\n")
//!   .with_file("book/intro.md", "# Introduction\n\nHello.\n");
//!
//! let options = CompileOptionsBuilder::new()
//!   .adjust_heading_levels(true)
//!   .insert_toc(true)
//!   .build();
//!
//! let result = Compiler::with_source(options, source)
//!   .compile("book/index.md")
//!   .unwrap();
//!
//! assert_eq!(result.toc, "- [Introduction](#introduction)");
//! assert!(result.content.contains("## Introduction {#introduction}"));
//! ```
//!
//! Includes that point at missing files, or back at a file that is still
//! being expanded, are removed from the output without failing the compile.
//! They are reported in [`Compilation::diagnostics`].

pub mod compiler;
mod error;
pub mod headings;
pub mod include;
pub mod path;
pub mod source;
pub mod toc;
mod types;
pub mod utils;

pub use crate::{
  compiler::{CompileOptions, CompileOptionsBuilder, Compiler, compile_path},
  error::{CompileError, CompileResult},
  source::{FsSource, MemorySource, SourceProvider},
  types::{
    Compilation,
    Diagnostic,
    DiagnosticKind,
    Heading,
    HeadingMatch,
    IncludeDirective,
  },
};
