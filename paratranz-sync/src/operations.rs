//! Export and import runs over every mapping of a project.

use serde::Serialize;

use crate::{
    Error,
    config::{MappingDescriptor, ProjectLayout},
    extract::{ApprovalPolicy, ExtractRules, QuoteFreeColumns, ScriptRange, extract_items},
    file::TabularFile,
    reconcile::reconcile_stages,
    report::{Event, Reporter},
    traits::Parser,
    types::TranslationItem,
    writeback::{ApplyReport, apply_items},
};

/// Options shared by export and import runs.
#[derive(Default)]
pub struct SyncOptions {
    /// Script whose presence marks text as translated.
    pub script: ScriptRange,
    /// Overrides the default [`QuoteFreeColumns`] policy built from the mappings.
    pub approval: Option<Box<dyn ApprovalPolicy>>,
}

impl SyncOptions {
    pub fn with_script(mut self, script: ScriptRange) -> Self {
        self.script = script;
        self
    }

    pub fn with_approval(mut self, approval: Box<dyn ApprovalPolicy>) -> Self {
        self.approval = Some(approval);
        self
    }

    fn into_rules(self, mappings: &[MappingDescriptor]) -> ExtractRules {
        let approval = self
            .approval
            .unwrap_or_else(|| Box::new(QuoteFreeColumns::from_mappings(mappings)));
        ExtractRules::new(self.script, approval)
    }
}

/// A mapping abandoned during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingFailure {
    pub path: String,
    pub error: String,
}

/// Outcome of [`export_all`] or [`import_all`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    /// Mappings processed to completion, including skipped ones.
    pub succeeded: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<MappingFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(
        &mut self,
        mapping: &MappingDescriptor,
        result: Result<(), Error>,
        reporter: &dyn Reporter,
    ) -> Result<(), Error> {
        match result {
            Ok(()) => {
                self.succeeded += 1;
                Ok(())
            }
            Err(err) if err.is_mapping_scoped() => {
                reporter.report(Event::MappingFailed {
                    file: mapping.path.clone(),
                    error: err.to_string(),
                });
                self.failed.push(MappingFailure {
                    path: mapping.path.clone(),
                    error: err.to_string(),
                });
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Exports one mapping to its item store and returns the exported items.
///
/// Stages of an existing store are carried over before it is overwritten.
pub fn export_mapping(
    mapping: &MappingDescriptor,
    layout: &ProjectLayout,
    rules: &ExtractRules,
    reporter: &dyn Reporter,
) -> Result<Vec<TranslationItem>, Error> {
    let file = TabularFile::load(mapping, layout, reporter)?;
    let mut items = extract_items(&file, rules);

    if file.store_path.exists() {
        let prior = Vec::<TranslationItem>::read_from(&file.store_path)?;
        reporter.report(Event::StoreLoaded {
            path: file.store_path.clone(),
            items: prior.len(),
        });
        reconcile_stages(&mut items, &prior, reporter);
    }

    items.write_to(&file.store_path)?;
    reporter.report(Event::Exported {
        file: file.file_name().to_string(),
        items: items.len(),
        store: file.store_path.clone(),
    });
    Ok(items)
}

/// Applies one mapping's item store to its translation table.
///
/// Returns `None` when there is nothing to import into, or nothing to import.
pub fn import_mapping(
    mapping: &MappingDescriptor,
    layout: &ProjectLayout,
    script: ScriptRange,
    reporter: &dyn Reporter,
) -> Result<Option<ApplyReport>, Error> {
    let store = layout.store_path(mapping);
    if !store.exists() {
        reporter.report(Event::MissingStore {
            file: mapping.file_name().to_string(),
            store,
        });
        return Ok(None);
    }

    let translation_path = layout.translation_path(mapping);
    if !translation_path.exists() {
        reporter.report(Event::MissingTranslationTable {
            file: mapping.file_name().to_string(),
            path: translation_path,
        });
        return Ok(None);
    }

    let items = Vec::<TranslationItem>::read_from(&store)?;
    reporter.report(Event::StoreLoaded {
        path: store.clone(),
        items: items.len(),
    });

    let mut file = TabularFile::load(mapping, layout, reporter)?;
    let report = apply_items(&mut file, &items, script, reporter);
    file.save_translation()?;

    reporter.report(Event::Imported {
        store,
        items: report.total,
        updated: report.updated,
        path: file.translation_path.clone(),
    });
    Ok(Some(report))
}

/// Exports every mapping of the project.
///
/// A mapping failing on its own data is recorded in the summary and the run
/// goes on; any other error stops the run.
pub fn export_all(
    layout: &ProjectLayout,
    options: SyncOptions,
    reporter: &dyn Reporter,
) -> Result<RunSummary, Error> {
    let mappings = layout.load_mappings()?;
    let rules = options.into_rules(&mappings);
    let mut summary = RunSummary::default();

    for mapping in &mappings {
        let result = export_mapping(mapping, layout, &rules, reporter).map(|_| ());
        summary.record(mapping, result, reporter)?;
    }
    Ok(summary)
}

/// Imports every mapping's item store into its translation table.
///
/// Failures are handled as in [`export_all`].
pub fn import_all(
    layout: &ProjectLayout,
    options: SyncOptions,
    reporter: &dyn Reporter,
) -> Result<RunSummary, Error> {
    let mappings = layout.load_mappings()?;
    let mut summary = RunSummary::default();

    for mapping in &mappings {
        let result = import_mapping(mapping, layout, options.script, reporter).map(|_| ());
        summary.record(mapping, result, reporter)?;
    }
    Ok(summary)
}
