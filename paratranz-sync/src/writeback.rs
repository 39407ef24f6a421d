//! Applying edited items back onto a translation table.

use serde::Serialize;

use crate::{
    extract::ScriptRange,
    file::TabularFile,
    report::{Event, Reporter},
    types::TranslationItem,
};

/// What happened to a batch of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ApplyReport {
    pub total: usize,
    /// Cells whose value changed.
    pub updated: usize,
    pub unchanged: usize,
    /// Untouched items whose cell already held a translation.
    pub kept_existing: usize,
    pub missing_rows: usize,
    pub invalid_keys: usize,
    pub unknown_columns: usize,
}

/// Writes every translated item into `file.translation`.
///
/// An item overwrites its cell when its stage is above 0 and its translation
/// is not empty. Rows are looked up by id and never inserted; items pointing
/// at unknown rows or columns are reported and skipped.
pub fn apply_items(
    file: &mut TabularFile,
    items: &[TranslationItem],
    script: ScriptRange,
    reporter: &dyn Reporter,
) -> ApplyReport {
    let name = file.file_name().to_string();
    let id_columns = file.mapping.id_column_name.to_string();
    let mut report = ApplyReport {
        total: items.len(),
        ..Default::default()
    };

    for item in items {
        let key = match item.parse_key() {
            Ok(key) => key,
            Err(_) => {
                reporter.report(Event::InvalidKey {
                    file: name.clone(),
                    key: item.key.clone(),
                });
                report.invalid_keys += 1;
                continue;
            }
        };

        let Some(column) = file.translation.column_index(&key.column) else {
            reporter.report(Event::UnknownColumn {
                file: name.clone(),
                column: key.column,
            });
            report.unknown_columns += 1;
            continue;
        };

        let Some(row) = file.translation_index.get(&key.row_id) else {
            reporter.report(Event::MissingRow {
                file: name.clone(),
                id_columns: id_columns.clone(),
                id: key.row_id,
            });
            report.missing_rows += 1;
            continue;
        };

        let cell = &mut file.translation.rows[row].cells[column];
        if item.stage.code() > 0 && !item.translation.is_empty() {
            if *cell != item.translation {
                cell.clone_from(&item.translation);
                report.updated += 1;
            } else {
                report.unchanged += 1;
            }
        } else {
            if script.is_present_in(cell) {
                reporter.report(Event::KeptExisting {
                    file: name.clone(),
                    id_columns: id_columns.clone(),
                    id: key.row_id,
                    column: key.column,
                });
                report.kept_existing += 1;
            }
            report.unchanged += 1;
        }
    }

    report
}
