//! Core types for paratranz-sync: translation items, their keys and stages.
//! Extraction produces these; the item store persists them; writeback consumes them.

use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{error::Error, newline, traits::Parser};

lazy_static! {
    // File marker up to the first `#`, column after the last `$`.
    static ref ITEM_KEY_REGEX: Regex = Regex::new(r"(?s)^([^#]*)#(.*)\$([^$]*)$").unwrap();
}

/// Review status of an item on the translation platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Stage {
    /// Hidden from translators.
    Hidden,
    Untranslated,
    /// Translated, first pass.
    Translated,
    /// Translator marked the text as uncertain.
    Uncertain,
    /// Passed the first check.
    Checked,
    /// Passed the second check.
    Reviewed,
    /// Locked as final.
    Final,
}

impl Stage {
    /// Every stage that means a person has already touched the item.
    pub const TOUCHED: [Stage; 6] = [
        Stage::Translated,
        Stage::Uncertain,
        Stage::Checked,
        Stage::Reviewed,
        Stage::Final,
        Stage::Hidden,
    ];

    pub fn code(self) -> i64 {
        match self {
            Stage::Hidden => -1,
            Stage::Untranslated => 0,
            Stage::Translated => 1,
            Stage::Uncertain => 2,
            Stage::Checked => 3,
            Stage::Reviewed => 5,
            Stage::Final => 9,
        }
    }

    pub fn is_touched(self) -> bool {
        Self::TOUCHED.contains(&self)
    }
}

impl TryFrom<i64> for Stage {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Stage::Hidden),
            0 => Ok(Stage::Untranslated),
            1 => Ok(Stage::Translated),
            2 => Ok(Stage::Uncertain),
            3 => Ok(Stage::Checked),
            5 => Ok(Stage::Reviewed),
            9 => Ok(Stage::Final),
            other => Err(Error::InvalidStage(other)),
        }
    }
}

impl From<Stage> for i64 {
    fn from(stage: Stage) -> Self {
        stage.code()
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Identity of one translatable cell: `<file>#<row id>$<column>`.
///
/// `file` is the table's file name (no directories), `row_id` the value built
/// by the row index, `column` the translatable column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub file: String,
    pub row_id: String,
    pub column: String,
}

impl ItemKey {
    pub fn new(
        file: impl Into<String>,
        row_id: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            row_id: row_id.into(),
            column: column.into(),
        }
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}${}", self.file, self.row_id, self.column)
    }
}

/// Parses a key back into its parts.
///
/// Row ids may contain `#` and `$`; the file name is cut at the first `#` and
/// the column at the last `$`.
impl FromStr for ItemKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = ITEM_KEY_REGEX
            .captures(s)
            .ok_or_else(|| Error::InvalidKey(s.to_string()))?;
        Ok(ItemKey {
            file: captures[1].to_string(),
            row_id: captures[2].to_string(),
            column: captures[3].to_string(),
        })
    }
}

/// One record of the platform's flat item format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationItem {
    /// See [`ItemKey`].
    pub key: String,

    /// Source-language text.
    pub original: String,

    /// Target-language text; empty while untranslated.
    #[serde(default)]
    pub translation: String,

    pub stage: Stage,

    /// Translator-facing notes, never read back.
    #[serde(default)]
    pub context: String,
}

impl TranslationItem {
    /// Creates an item, expanding escaped newlines in both texts.
    pub fn new(
        key: impl Into<String>,
        original: &str,
        translation: &str,
        stage: Stage,
        context: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            original: newline::unescape(original),
            translation: newline::unescape(translation),
            stage,
            context: context.into(),
        }
    }

    pub fn parse_key(&self) -> Result<ItemKey, Error> {
        self.key.parse()
    }

    fn unescaped(self) -> Self {
        Self::new(self.key, &self.original, &self.translation, self.stage, self.context)
    }
}

/// The item store: a JSON array of items.
///
/// Written pretty-printed with four-space indentation and non-ASCII text kept
/// as is. Items read from a store have escaped newlines expanded.
impl Parser for Vec<TranslationItem> {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let items: Vec<TranslationItem> = serde_json::from_reader(reader).map_err(Error::Parse)?;
        Ok(items.into_iter().map(TranslationItem::unescaped).collect())
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer).map_err(Error::Parse)
    }
}
