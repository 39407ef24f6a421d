//! Structured events emitted while exporting and importing.
//!
//! Core components never log directly. They receive a `&dyn Reporter` and hand
//! it [`Event`] values; [`TracingReporter`] forwards them to `tracing`, and
//! [`CollectingReporter`] keeps them around so callers (and tests) can inspect
//! what happened.

use std::{cell::RefCell, fmt::Display, path::PathBuf};

use crate::types::Stage;

/// Severity attached to every [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Something worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A table was read; `indexed` counts non-empty, non-comment rows.
    TableLoaded {
        path: PathBuf,
        rows: usize,
        indexed: usize,
    },
    /// A row had fewer (or more) fields than the header.
    RaggedRow {
        file: String,
        row: usize,
        id: String,
        expected: usize,
        found: usize,
    },
    /// Bytes that are neither UTF-8 nor in the repair table were replaced.
    UndecodableBytes { file: String, count: usize },
    /// Original and translation tables differ in total row count.
    RowCountMismatch {
        file: String,
        original: usize,
        translation: usize,
    },
    /// Original and translation tables differ in indexed row count.
    IndexedCountMismatch {
        file: String,
        original: usize,
        translation: usize,
    },
    /// No translation table exists yet for a mapping.
    MissingTranslationTable { file: String, path: PathBuf },
    /// A prior stage replaced the freshly computed one.
    StageCarried { key: String, from: Stage, to: Stage },
    /// A prior item store was found and read.
    StoreLoaded { path: PathBuf, items: usize },
    /// An item store was written.
    Exported {
        file: String,
        items: usize,
        store: PathBuf,
    },
    /// No item store exists for a mapping being imported.
    MissingStore { file: String, store: PathBuf },
    /// An item key could not be parsed.
    InvalidKey { file: String, key: String },
    /// An item refers to a row id the translation table does not have.
    MissingRow {
        file: String,
        id_columns: String,
        id: String,
    },
    /// An item refers to a column the translation table does not have.
    UnknownColumn { file: String, column: String },
    /// The translation table already holds a translation the batch does not carry.
    KeptExisting {
        file: String,
        id_columns: String,
        id: String,
        column: String,
    },
    /// Items were applied and the translation table rewritten.
    Imported {
        store: PathBuf,
        items: usize,
        updated: usize,
        path: PathBuf,
    },
    /// A mapping was abandoned; the run continues with the next one.
    MappingFailed { file: String, error: String },
}

impl Event {
    pub fn level(&self) -> Level {
        match self {
            Event::StageCarried { .. } => Level::Debug,
            Event::TableLoaded { .. }
            | Event::StoreLoaded { .. }
            | Event::Exported { .. }
            | Event::Imported { .. } => Level::Info,
            Event::MappingFailed { .. } => Level::Error,
            _ => Level::Warn,
        }
    }

    /// Stable snake_case name of the event variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TableLoaded { .. } => "table_loaded",
            Event::RaggedRow { .. } => "ragged_row",
            Event::UndecodableBytes { .. } => "undecodable_bytes",
            Event::RowCountMismatch { .. } => "row_count_mismatch",
            Event::IndexedCountMismatch { .. } => "indexed_count_mismatch",
            Event::MissingTranslationTable { .. } => "missing_translation_table",
            Event::StageCarried { .. } => "stage_carried",
            Event::StoreLoaded { .. } => "store_loaded",
            Event::Exported { .. } => "exported",
            Event::MissingStore { .. } => "missing_store",
            Event::InvalidKey { .. } => "invalid_key",
            Event::MissingRow { .. } => "missing_row",
            Event::UnknownColumn { .. } => "unknown_column",
            Event::KeptExisting { .. } => "kept_existing",
            Event::Imported { .. } => "imported",
            Event::MappingFailed { .. } => "mapping_failed",
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::TableLoaded {
                path,
                rows,
                indexed,
            } => write!(
                f,
                "loaded {} rows from {} ({} not empty or commented)",
                rows,
                path.display(),
                indexed
            ),
            Event::RaggedRow {
                file,
                row,
                id,
                expected,
                found,
            } => write!(
                f,
                "file {}, row {}, id \"{}\" has {} values instead of {}, a comma may be missing",
                file, row, id, found, expected
            ),
            Event::UndecodableBytes { file, count } => write!(
                f,
                "file {} contains {} undecodable bytes, replaced with U+FFFD",
                file, count
            ),
            Event::RowCountMismatch {
                file,
                original,
                translation,
            } => write!(
                f,
                "{} has {} original rows but {} translated rows",
                file, original, translation
            ),
            Event::IndexedCountMismatch {
                file,
                original,
                translation,
            } => write!(
                f,
                "{} has {} valid original rows but {} valid translated rows",
                file, original, translation
            ),
            Event::MissingTranslationTable { file, path } => write!(
                f,
                "{} has no translation table at {}, every item starts untranslated",
                file,
                path.display()
            ),
            Event::StageCarried { key, from, to } => {
                write!(f, "{} stage updated from {} to {}", key, from, to)
            }
            Event::StoreLoaded { path, items } => write!(
                f,
                "item store {} already exists, read {} items",
                path.display(),
                items
            ),
            Event::Exported { file, items, store } => write!(
                f,
                "exported {} items from {} to {}",
                items,
                file,
                store.display()
            ),
            Event::MissingStore { file, store } => write!(
                f,
                "{} has no item store at {}, file is not updated",
                file,
                store.display()
            ),
            Event::InvalidKey { file, key } => {
                write!(f, "{}: item key `{}` cannot be parsed, skipped", file, key)
            }
            Event::MissingRow {
                file,
                id_columns,
                id,
            } => write!(
                f,
                "cannot find {}=\"{}\" in {}, item is not updated",
                id_columns, id, file
            ),
            Event::UnknownColumn { file, column } => write!(
                f,
                "{} has no column `{}`, item is not updated",
                file, column
            ),
            Event::KeptExisting {
                file,
                id_columns,
                id,
                column,
            } => write!(
                f,
                "{}: {}=\"{}\" column `{}` is already translated but absent from the items, kept unchanged",
                file, id_columns, id, column
            ),
            Event::Imported {
                store,
                items,
                updated,
                path,
            } => write!(
                f,
                "imported {} items ({} updated) from {} into {}",
                items,
                updated,
                store.display(),
                path.display()
            ),
            Event::MappingFailed { file, error } => {
                write!(f, "{} skipped: {}", file, error)
            }
        }
    }
}

/// Receiver of [`Event`]s.
pub trait Reporter {
    fn report(&self, event: Event);
}

/// Forwards every event to the matching `tracing` macro.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: Event) {
        let kind = event.kind();
        match event.level() {
            Level::Debug => tracing::debug!(kind = kind, "{}", event),
            Level::Info => tracing::info!(kind = kind, "{}", event),
            Level::Warn => tracing::warn!(kind = kind, "{}", event),
            Level::Error => tracing::error!(kind = kind, "{}", event),
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: RefCell<Vec<Event>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Events with the given [`Event::kind`].
    pub fn of_kind(&self, kind: &str) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn warnings(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.level() >= Level::Warn)
            .cloned()
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let carried = Event::StageCarried {
            key: "rules.csv#a$text".to_string(),
            from: Stage::Translated,
            to: Stage::Checked,
        };
        assert_eq!(carried.level(), Level::Debug);

        let missing = Event::MissingRow {
            file: "rules.csv".to_string(),
            id_columns: "id".to_string(),
            id: "a".to_string(),
        };
        assert_eq!(missing.level(), Level::Warn);

        let failed = Event::MappingFailed {
            file: "rules.csv".to_string(),
            error: "boom".to_string(),
        };
        assert_eq!(failed.level(), Level::Error);
    }

    #[test]
    fn test_display_stage_carried() {
        let event = Event::StageCarried {
            key: "rules.csv#a$text".to_string(),
            from: Stage::Translated,
            to: Stage::Checked,
        };
        assert_eq!(event.to_string(), "rules.csv#a$text stage updated from 1 to 3");
    }

    #[test]
    fn test_collecting_reporter_filters() {
        let reporter = CollectingReporter::new();
        reporter.report(Event::UndecodableBytes {
            file: "a.csv".to_string(),
            count: 2,
        });
        reporter.report(Event::StoreLoaded {
            path: PathBuf::from("a.json"),
            items: 3,
        });

        assert_eq!(reporter.events().len(), 2);
        assert_eq!(reporter.warnings().len(), 1);
        assert_eq!(reporter.of_kind("store_loaded").len(), 1);
        assert!(reporter.of_kind("ragged_row").is_empty());
    }
}
