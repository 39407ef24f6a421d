//! Mapping descriptors and the project directory layout.
//!
//! The mapping file is a JSON array; each record names one game table, its id
//! column(s) and the columns to translate:
//!
//! ```json
//! [
//!     {
//!         "path": "data/campaign/rules.csv",
//!         "id_column_name": "id",
//!         "text_column_names": ["text", "options"]
//!     },
//!     {
//!         "path": "data/hulls/ship_data.csv",
//!         "id_column_name": ["name", "id"],
//!         "text_column_names": ["designation", "tech/manufacturer"]
//!     }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::Error, index::IdColumns, traits::Parser};

/// One mapping record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDescriptor {
    /// Path relative to the original and translation directories, `/` separated.
    pub path: String,

    pub id_column_name: IdColumns,

    /// Translatable columns, exported in this order.
    pub text_column_names: Vec<String>,

    /// Overrides `path` inside the original directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,

    /// Overrides `path` inside the translation directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_path: Option<String>,

    /// Columns whose quote-free originals are approved without translation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auto_approve_columns: Vec<String>,
}

impl MappingDescriptor {
    pub fn new(
        path: impl Into<String>,
        id_column_name: IdColumns,
        text_column_names: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            id_column_name,
            text_column_names,
            original_path: None,
            translation_path: None,
            auto_approve_columns: Vec::new(),
        }
    }

    /// File name part of `path`, used in item keys.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Checks the descriptor on its own, before any table is read.
    pub fn validate(&self) -> Result<(), Error> {
        if self.path.trim().is_empty() {
            return Err(Error::config_error("mapping with an empty path"));
        }
        if self.id_column_name.names().iter().all(|name| name.is_empty()) {
            return Err(Error::config_error(format!(
                "{}: id_column_name is empty",
                self.path
            )));
        }
        if self.text_column_names.is_empty() {
            return Err(Error::config_error(format!(
                "{}: text_column_names is empty",
                self.path
            )));
        }
        Ok(())
    }
}

impl Parser for Vec<MappingDescriptor> {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let mut mappings: Vec<MappingDescriptor> =
            serde_json::from_reader(reader).map_err(Error::Parse)?;
        for mapping in &mut mappings {
            mapping.validate()?;
            let mut seen = Vec::with_capacity(mapping.text_column_names.len());
            mapping.text_column_names.retain(|c| {
                let fresh = !seen.contains(c);
                seen.push(c.clone());
                fresh
            });
        }
        Ok(mappings)
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, self).map_err(Error::Parse)
    }
}

/// Reads and validates the mapping file.
pub fn load_mappings<P: AsRef<Path>>(path: P) -> Result<Vec<MappingDescriptor>, Error> {
    Vec::<MappingDescriptor>::read_from(path)
}

/// Where a project keeps its tables, item stores and mapping file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Untouched game tables.
    pub original_dir: PathBuf,
    /// Translated game tables, rewritten on import.
    pub translation_dir: PathBuf,
    /// Item stores exchanged with the translation platform.
    pub output_dir: PathBuf,
    pub mapping_file: PathBuf,
}

impl ProjectLayout {
    /// Default layout below `root`:
    /// `original/`, `localization/`, `para_tranz/output/` and
    /// `para_tranz/para_tranz_map.json`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            original_dir: root.join("original"),
            translation_dir: root.join("localization"),
            output_dir: root.join("para_tranz").join("output"),
            mapping_file: root.join("para_tranz").join("para_tranz_map.json"),
        }
    }

    pub fn with_original_dir(mut self, dir: PathBuf) -> Self {
        self.original_dir = dir;
        self
    }

    pub fn with_translation_dir(mut self, dir: PathBuf) -> Self {
        self.translation_dir = dir;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_mapping_file(mut self, file: PathBuf) -> Self {
        self.mapping_file = file;
        self
    }

    pub fn original_path(&self, mapping: &MappingDescriptor) -> PathBuf {
        self.original_dir
            .join(mapping.original_path.as_deref().unwrap_or(&mapping.path))
    }

    pub fn translation_path(&self, mapping: &MappingDescriptor) -> PathBuf {
        self.translation_dir
            .join(mapping.translation_path.as_deref().unwrap_or(&mapping.path))
    }

    /// Item store of a mapping: `path` below the output directory, as `.json`.
    pub fn store_path(&self, mapping: &MappingDescriptor) -> PathBuf {
        self.output_dir.join(&mapping.path).with_extension("json")
    }

    pub fn load_mappings(&self) -> Result<Vec<MappingDescriptor>, Error> {
        load_mappings(&self.mapping_file)
    }
}
