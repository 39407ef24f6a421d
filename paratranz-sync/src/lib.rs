#![forbid(unsafe_code)]
//! Keeps game data tables and a translation platform's item stores in sync.
//!
//! A project lists its tables in a mapping file. Exporting turns every
//! translatable cell of every original table into a [`TranslationItem`] and
//! writes them to one JSON item store per table; importing writes the edited
//! items back into the translated tables, leaving everything else in those
//! files untouched.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paratranz_sync::{ProjectLayout, SyncOptions, TracingReporter, export_all, import_all};
//!
//! let layout = ProjectLayout::new("path/to/mod");
//! let summary = export_all(&layout, SyncOptions::default(), &TracingReporter)?;
//! assert!(summary.is_success());
//!
//! // ... translate on the platform, download the stores ...
//!
//! import_all(&layout, SyncOptions::default(), &TracingReporter)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - Stable item keys `<file>#<row id>$<column>`, with composite row ids
//! - Review stages carried over between exports
//! - Tolerant table reading: stray Windows-1252 bytes, ragged rows, BOMs
//! - Lossless write-back of unnamed columns, escaped newlines and line endings
//! - Structured events through an injectable [`Reporter`]

pub mod config;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod file;
pub mod index;
pub mod literal;
pub mod newline;
pub mod operations;
pub mod reconcile;
pub mod report;
pub mod table;
pub mod traits;
pub mod types;
pub mod writeback;

// Re-export most used types for easy consumption
pub use crate::{
    config::{MappingDescriptor, ProjectLayout, load_mappings},
    error::Error,
    extract::{ApprovalPolicy, ExtractRules, QuoteFreeColumns, ScriptRange, extract_items},
    file::TabularFile,
    index::{IdColumns, RowIndex},
    operations::{
        MappingFailure, RunSummary, SyncOptions, export_all, export_mapping, import_all,
        import_mapping,
    },
    reconcile::reconcile_stages,
    report::{CollectingReporter, Event, Level, Reporter, TracingReporter},
    table::{RawLayout, Row, Table},
    types::{ItemKey, Stage, TranslationItem},
    writeback::{ApplyReport, apply_items},
};
