//! One mapping's pair of tables.

use std::path::{Path, PathBuf};

use crate::{
    config::{MappingDescriptor, ProjectLayout},
    error::Error,
    index::RowIndex,
    report::{Event, Reporter},
    table::{RawLayout, Table},
};

/// The original table of a mapping next to its translated counterpart.
///
/// Both tables are indexed by the mapping's id columns. When no translation
/// file exists yet, `translation` is an empty table with the original's columns.
#[derive(Debug, Clone)]
pub struct TabularFile {
    pub mapping: MappingDescriptor,
    pub original: Table,
    pub original_index: RowIndex,
    pub translation: Table,
    pub translation_index: RowIndex,
    pub original_path: PathBuf,
    pub translation_path: PathBuf,
    pub store_path: PathBuf,
}

impl TabularFile {
    /// Pairs already parsed tables.
    ///
    /// Fails with [`Error::MissingColumn`] when an id or text column is absent
    /// from either table and with [`Error::DuplicateId`] when an id repeats.
    /// Paths default to the mapping's relative path; see [`TabularFile::with_layout`].
    pub fn new(
        mapping: MappingDescriptor,
        original: Table,
        translation: Option<Table>,
        reporter: &dyn Reporter,
    ) -> Result<Self, Error> {
        let name = mapping.file_name().to_string();
        let has_translation = translation.is_some();
        let translation = translation.unwrap_or_else(|| Table {
            columns: original.columns.clone(),
            rows: Vec::new(),
        });

        check_columns(&name, &mapping, &original)?;
        check_columns(&name, &mapping, &translation)?;

        let original_index = RowIndex::build(&name, &original, &mapping.id_column_name)?;
        let translation_index = RowIndex::build(&name, &translation, &mapping.id_column_name)?;

        if has_translation {
            if original.rows.len() != translation.rows.len() {
                reporter.report(Event::RowCountMismatch {
                    file: name.clone(),
                    original: original.rows.len(),
                    translation: translation.rows.len(),
                });
            }
            if original_index.len() != translation_index.len() {
                reporter.report(Event::IndexedCountMismatch {
                    file: name.clone(),
                    original: original_index.len(),
                    translation: translation_index.len(),
                });
            }
        }

        let relative = PathBuf::from(&mapping.path);
        Ok(Self {
            original_path: relative.clone(),
            translation_path: relative.clone(),
            store_path: relative.with_extension("json"),
            mapping,
            original,
            original_index,
            translation,
            translation_index,
        })
    }

    /// Reads both tables of `mapping` below `layout`.
    ///
    /// A missing translation table is reported, not an error.
    pub fn load(
        mapping: &MappingDescriptor,
        layout: &ProjectLayout,
        reporter: &dyn Reporter,
    ) -> Result<Self, Error> {
        let original_path = layout.original_path(mapping);
        let original = read_table(&original_path, reporter)?;

        let translation_path = layout.translation_path(mapping);
        let translation = if translation_path.exists() {
            Some(read_table(&translation_path, reporter)?)
        } else {
            reporter.report(Event::MissingTranslationTable {
                file: mapping.file_name().to_string(),
                path: translation_path,
            });
            None
        };

        Ok(Self::new(mapping.clone(), original, translation, reporter)?.with_layout(layout))
    }

    /// Resolves the table and store paths against `layout`.
    pub fn with_layout(mut self, layout: &ProjectLayout) -> Self {
        self.original_path = layout.original_path(&self.mapping);
        self.translation_path = layout.translation_path(&self.mapping);
        self.store_path = layout.store_path(&self.mapping);
        self
    }

    /// File name used in item keys and messages.
    pub fn file_name(&self) -> &str {
        self.mapping.file_name()
    }

    /// Rewrites the translation table in place, keeping the on-disk header,
    /// byte-order mark and line ending of the existing file.
    pub fn save_translation(&self) -> Result<(), Error> {
        let layout = RawLayout::read_from(&self.translation_path)?;
        self.translation.write_to(&self.translation_path, &layout)
    }
}

fn read_table(path: &Path, reporter: &dyn Reporter) -> Result<Table, Error> {
    let table = Table::read_from(path, reporter)?;
    let indexed = table
        .rows
        .iter()
        .filter(|row| !row.is_blank_or_comment())
        .count();
    reporter.report(Event::TableLoaded {
        path: path.to_path_buf(),
        rows: table.rows.len(),
        indexed,
    });
    Ok(table)
}

fn check_columns(file: &str, mapping: &MappingDescriptor, table: &Table) -> Result<(), Error> {
    let wanted = mapping
        .id_column_name
        .names()
        .into_iter()
        .chain(mapping.text_column_names.iter().map(String::as_str));
    for column in wanted {
        if !table.has_column(column) {
            return Err(Error::MissingColumn {
                file: file.to_string(),
                column: column.to_string(),
                available: format!("{:?}", table.columns),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{index::IdColumns, report::CollectingReporter};
    use std::fs;
    use tempfile::TempDir;

    fn mapping() -> MappingDescriptor {
        MappingDescriptor::new(
            "data/strings.csv",
            IdColumns::Single("id".to_string()),
            vec!["text".to_string()],
        )
    }

    fn table(text: &str) -> Table {
        Table::parse("strings.csv", text.as_bytes(), &CollectingReporter::new()).unwrap()
    }

    #[test]
    fn test_missing_translation_gets_empty_table() {
        let reporter = CollectingReporter::new();
        let file = TabularFile::new(mapping(), table("id,text\na,Hi\n"), None, &reporter).unwrap();
        assert_eq!(file.translation.columns, vec!["id", "text"]);
        assert!(file.translation_index.is_empty());
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_missing_text_column() {
        let reporter = CollectingReporter::new();
        let err = TabularFile::new(mapping(), table("id,body\na,Hi\n"), None, &reporter)
            .unwrap_err();
        match err {
            Error::MissingColumn { file, column, .. } => {
                assert_eq!(file, "strings.csv");
                assert_eq!(column, "text");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_count_mismatches_are_reported() {
        let reporter = CollectingReporter::new();
        TabularFile::new(
            mapping(),
            table("id,text\na,Hi\nb,Bye\n"),
            Some(table("id,text\na,Hi\n")),
            &reporter,
        )
        .unwrap();
        assert_eq!(reporter.of_kind("row_count_mismatch").len(), 1);
        assert_eq!(reporter.of_kind("indexed_count_mismatch").len(), 1);
    }

    #[test]
    fn test_load_without_translation_file() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let original = layout.original_path(&mapping());
        fs::create_dir_all(original.parent().unwrap()).unwrap();
        fs::write(&original, "id,text\r\na,Hi\r\n#b,skip\r\n").unwrap();

        let reporter = CollectingReporter::new();
        let file = TabularFile::load(&mapping(), &layout, &reporter).unwrap();
        assert_eq!(file.original_index.len(), 1);
        assert_eq!(file.store_path, dir.path().join("para_tranz/output/data/strings.json"));
        assert_eq!(
            reporter.of_kind("table_loaded"),
            vec![Event::TableLoaded {
                path: original,
                rows: 2,
                indexed: 1,
            }]
        );
        assert_eq!(reporter.of_kind("missing_translation_table").len(), 1);
    }

    #[test]
    fn test_save_translation_keeps_layout() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let original = layout.original_path(&mapping());
        let translation = layout.translation_path(&mapping());
        fs::create_dir_all(original.parent().unwrap()).unwrap();
        fs::create_dir_all(translation.parent().unwrap()).unwrap();
        fs::write(&original, "id,text,\r\na,Hi,\r\n").unwrap();
        fs::write(&translation, "id,text,\r\na,Hi,\r\n").unwrap();

        let reporter = CollectingReporter::new();
        let mut file = TabularFile::load(&mapping(), &layout, &reporter).unwrap();
        file.translation.rows[0].cells[1] = "Line^nBreak".to_string();
        file.save_translation().unwrap();

        assert_eq!(
            fs::read_to_string(&translation).unwrap(),
            "id,text,\r\na,Line\\nBreak,\r\n"
        );
    }
}
