//! Row lookup by id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{error::Error, literal, table::Table};

/// The column(s) whose values identify a row.
///
/// Deserializes from either a single column name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdColumns {
    Single(String),
    Composite(Vec<String>),
}

impl IdColumns {
    pub fn names(&self) -> Vec<&str> {
        match self {
            IdColumns::Single(name) => vec![name.as_str()],
            IdColumns::Composite(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Builds the id of `row`. Missing columns count as empty.
    ///
    /// A composite id is rendered as a quoted tuple, `('a', 'b')`.
    pub fn row_id(&self, table: &Table, row: usize) -> String {
        match self {
            IdColumns::Single(name) => table.value(row, name).unwrap_or_default().to_string(),
            IdColumns::Composite(names) => {
                let values: Vec<&str> = names
                    .iter()
                    .map(|name| table.value(row, name).unwrap_or_default())
                    .collect();
                literal::tuple(values.as_slice())
            }
        }
    }
}

impl std::fmt::Display for IdColumns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdColumns::Single(name) => write!(f, "{}", name),
            IdColumns::Composite(names) => write!(f, "{}", literal::tuple(names.as_slice())),
        }
    }
}

/// Maps row ids to row positions in a [`Table`].
///
/// Blank and `#` comment rows are left out. Iteration follows row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowIndex {
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl RowIndex {
    /// Indexes `table`, failing on the first id seen twice.
    pub fn build(file: &str, table: &Table, id_columns: &IdColumns) -> Result<Self, Error> {
        let mut index = RowIndex::default();

        for (row, data) in table.rows.iter().enumerate() {
            if data.is_blank_or_comment() {
                continue;
            }
            let id = id_columns.row_id(table, row);
            if index.positions.contains_key(&id) {
                return Err(Error::DuplicateId {
                    file: file.to_string(),
                    row: row + 1,
                    id_columns: id_columns.to_string(),
                    id,
                });
            }
            index.positions.insert(id.clone(), row);
            index.entries.push((id, row));
        }

        Ok(index)
    }

    /// Row position of `id`.
    pub fn get(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(id, row position)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(id, row)| (id.as_str(), *row))
    }
}
