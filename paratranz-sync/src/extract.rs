//! Turning table rows into translation items.

use std::{collections::HashSet, str::FromStr};

use crate::{
    config::MappingDescriptor,
    error::Error,
    file::TabularFile,
    literal,
    table::Table,
    types::{ItemKey, Stage, TranslationItem},
};

/// Width under which a row snapshot stays on one line.
const CONTEXT_WIDTH: usize = 80;

/// A contiguous block of code points identifying the target language's script.
///
/// Text without a single character from the block is treated as untranslated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRange {
    pub first: char,
    pub last: char,
}

impl ScriptRange {
    /// Hangul Jamo, U+1100..=U+11FF.
    pub const HANGUL_JAMO: ScriptRange = ScriptRange {
        first: '\u{1100}',
        last: '\u{11FF}',
    };

    /// Precomposed Hangul syllables, U+AC00..=U+D7A3.
    pub const HANGUL_SYLLABLES: ScriptRange = ScriptRange {
        first: '\u{AC00}',
        last: '\u{D7A3}',
    };

    /// Common CJK unified ideographs, U+4E00..=U+9FA5.
    pub const CJK_UNIFIED: ScriptRange = ScriptRange {
        first: '\u{4E00}',
        last: '\u{9FA5}',
    };

    pub fn contains(&self, c: char) -> bool {
        (self.first..=self.last).contains(&c)
    }

    /// Whether `text` has at least one character of this script.
    pub fn is_present_in(&self, text: &str) -> bool {
        text.chars().any(|c| self.contains(c))
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        ScriptRange::HANGUL_JAMO
    }
}

impl FromStr for ScriptRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "hangul-jamo" | "jamo" => Ok(ScriptRange::HANGUL_JAMO),
            "hangul-syllables" | "hangul" => Ok(ScriptRange::HANGUL_SYLLABLES),
            "cjk" | "cjk-unified" => Ok(ScriptRange::CJK_UNIFIED),
            other => Err(Error::config_error(format!("unknown target script `{}`", other))),
        }
    }
}

/// Decides whether a cell counts as translated without looking at the
/// translation table.
pub trait ApprovalPolicy {
    fn approves(&self, file_name: &str, column: &str, original: &str) -> bool;
}

/// Approves listed `(file name, column)` cells whose original has no `"`.
///
/// Script-like columns (dialogue rules, conditions) are mostly code; when they
/// contain no quoted text there is nothing to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteFreeColumns {
    columns: HashSet<(String, String)>,
}

impl QuoteFreeColumns {
    /// A policy that approves nothing.
    pub fn none() -> Self {
        Self {
            columns: HashSet::new(),
        }
    }

    pub fn with(mut self, file_name: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert((file_name.into(), column.into()));
        self
    }

    /// The default columns plus every mapping's `auto_approve_columns`.
    pub fn from_mappings(mappings: &[MappingDescriptor]) -> Self {
        mappings.iter().fold(Self::default(), |policy, mapping| {
            mapping.auto_approve_columns.iter().fold(policy, |policy, column| {
                policy.with(mapping.file_name(), column.as_str())
            })
        })
    }
}

impl Default for QuoteFreeColumns {
    fn default() -> Self {
        Self::none().with("rules.csv", "script")
    }
}

impl ApprovalPolicy for QuoteFreeColumns {
    fn approves(&self, file_name: &str, column: &str, original: &str) -> bool {
        !original.contains('"')
            && self
                .columns
                .contains(&(file_name.to_string(), column.to_string()))
    }
}

/// Heuristics applied while extracting.
pub struct ExtractRules {
    pub script: ScriptRange,
    pub approval: Box<dyn ApprovalPolicy>,
}

impl ExtractRules {
    pub fn new(script: ScriptRange, approval: Box<dyn ApprovalPolicy>) -> Self {
        Self { script, approval }
    }
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self::new(ScriptRange::default(), Box::new(QuoteFreeColumns::default()))
    }
}

/// Builds one item per indexed original row and translatable column.
///
/// - the stage starts at 1 when the translation table has the row, else 0;
/// - cells approved by the policy are forced to stage 1;
/// - otherwise a translation without target-script text is dropped and the
///   item goes back to stage 0;
/// - items with an empty original are left out.
pub fn extract_items(file: &TabularFile, rules: &ExtractRules) -> Vec<TranslationItem> {
    let name = file.file_name();
    let mut items = Vec::new();

    for (row_id, row) in file.original_index.iter() {
        let context = row_context(name, &file.original, row);
        let translated_row = file.translation_index.get(row_id);

        for column in &file.mapping.text_column_names {
            let original = file.original.value(row, column).unwrap_or_default();
            if original.is_empty() {
                continue;
            }

            let (mut translation, mut stage) = match translated_row {
                Some(t) => (
                    file.translation.value(t, column).unwrap_or_default(),
                    Stage::Translated,
                ),
                None => ("", Stage::Untranslated),
            };

            if rules.approval.approves(name, column, original) {
                stage = Stage::Translated;
            } else if !rules.script.is_present_in(translation) {
                translation = "";
                stage = Stage::Untranslated;
            }

            let key = ItemKey::new(name, row_id, column.as_str());
            items.push(TranslationItem::new(
                key.to_string(),
                original,
                translation,
                stage,
                context.clone(),
            ));
        }
    }

    items
}

/// Translator-facing description of an original row.
pub fn row_context(file_name: &str, table: &Table, row: usize) -> String {
    format!(
        "{} row {:04}\n[original data]\n{}",
        file_name,
        row + 1,
        literal::dict(table.pairs(row).as_slice(), CONTEXT_WIDTH)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{index::IdColumns, report::CollectingReporter};

    // "한글" spelled with conjoining jamo
    const KO: &str = "\u{1112}\u{1161}\u{11AB}\u{1100}\u{1173}\u{11AF}";

    fn file(name: &str, original: &str, translation: Option<&str>) -> TabularFile {
        file_with_column(name, "text", original, translation)
    }

    fn file_with_column(
        name: &str,
        column: &str,
        original: &str,
        translation: Option<&str>,
    ) -> TabularFile {
        let reporter = CollectingReporter::new();
        let mapping = MappingDescriptor::new(
            name,
            IdColumns::Single("id".to_string()),
            vec![column.to_string()],
        );
        let original = Table::parse(name, original.as_bytes(), &reporter).unwrap();
        let translation =
            translation.map(|t| Table::parse(name, t.as_bytes(), &reporter).unwrap());
        TabularFile::new(mapping, original, translation, &reporter).unwrap()
    }

    #[test]
    fn test_untranslated_row() {
        let file = file("strings.csv", "id,text\na,Hello\n", None);
        let items = extract_items(&file, &ExtractRules::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "strings.csv#a$text");
        assert_eq!(items[0].original, "Hello");
        assert_eq!(items[0].translation, "");
        assert_eq!(items[0].stage, Stage::Untranslated);
    }

    #[test]
    fn test_translated_row() {
        let translated = format!("id,text\na,{}\n", KO);
        let file = file("strings.csv", "id,text\na,Hello\n", Some(&translated));
        let items = extract_items(&file, &ExtractRules::default());
        assert_eq!(items[0].translation, KO);
        assert_eq!(items[0].stage, Stage::Translated);
    }

    #[test]
    fn test_copied_source_text_is_untranslated() {
        let file = file("strings.csv", "id,text\na,Hello\n", Some("id,text\na,Hello\n"));
        let items = extract_items(&file, &ExtractRules::default());
        assert_eq!(items[0].stage, Stage::Untranslated);
        assert_eq!(items[0].translation, "");
    }

    #[test]
    fn test_quote_free_script_is_approved() {
        let file = file_with_column("rules.csv", "script", "id,script\nr1,say something\n", None);
        let items = extract_items(&file, &ExtractRules::default());
        assert_eq!(items[0].stage, Stage::Translated);
        assert_eq!(items[0].translation, "");
    }

    #[test]
    fn test_quoted_script_is_not_approved() {
        let file = file_with_column(
            "rules.csv",
            "script",
            "id,script\nr1,\"say \"\"hi\"\"\"\n",
            None,
        );
        let items = extract_items(&file, &ExtractRules::default());
        assert_eq!(items[0].stage, Stage::Untranslated);
    }

    #[test]
    fn test_comment_and_empty_rows_skipped() {
        let file = file("strings.csv", "id,text\n#a,Hidden\nb,\nc,Shown\n", None);
        let items = extract_items(&file, &ExtractRules::default());
        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["strings.csv#c$text"]);
    }

    #[test]
    fn test_context_block() {
        let file = file("strings.csv", "id,text\n#note,x\na,Hello\n", None);
        let items = extract_items(&file, &ExtractRules::default());
        assert_eq!(
            items[0].context,
            "strings.csv row 0002\n[original data]\n{'id': 'a', 'text': 'Hello'}"
        );
    }

    #[test]
    fn test_custom_policy() {
        struct ApproveAll;
        impl ApprovalPolicy for ApproveAll {
            fn approves(&self, _: &str, _: &str, _: &str) -> bool {
                true
            }
        }

        let file = file("strings.csv", "id,text\na,Hello\n", Some("id,text\na,Hello\n"));
        let rules = ExtractRules::new(ScriptRange::default(), Box::new(ApproveAll));
        let items = extract_items(&file, &rules);
        assert_eq!(items[0].stage, Stage::Translated);
        assert_eq!(items[0].translation, "Hello");
    }

    #[test]
    fn test_policy_from_mappings() {
        let mut mapping = MappingDescriptor::new(
            "data/strings/tips.csv",
            IdColumns::Single("id".to_string()),
            vec!["tip".to_string()],
        );
        mapping.auto_approve_columns = vec!["tip".to_string()];
        let policy = QuoteFreeColumns::from_mappings(&[mapping]);
        assert!(policy.approves("tips.csv", "tip", "plain"));
        assert!(policy.approves("rules.csv", "script", "plain"));
        assert!(!policy.approves("tips.csv", "tip", "has \"quote\""));
        assert!(!policy.approves("tips.csv", "other", "plain"));
    }

    #[test]
    fn test_script_range() {
        assert!(ScriptRange::HANGUL_JAMO.is_present_in(KO));
        assert!(!ScriptRange::HANGUL_JAMO.is_present_in("한글"));
        assert!(ScriptRange::HANGUL_SYLLABLES.is_present_in("한글"));
        assert!(ScriptRange::CJK_UNIFIED.is_present_in("你好"));
        assert_eq!("hangul_jamo".parse::<ScriptRange>().unwrap(), ScriptRange::HANGUL_JAMO);
        assert!("klingon".parse::<ScriptRange>().is_err());
    }
}
