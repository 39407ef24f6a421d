use std::path::{Path, PathBuf};

use paratranz_sync::{
    ProjectLayout, RunSummary, ScriptRange, SyncOptions, TracingReporter, export_all, import_all,
};

use crate::settings::ProjectSettings;

/// Where and how to run, after merging `paratranz.toml` with the flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub layout: ProjectLayout,
    pub script: ScriptRange,
}

impl RunConfig {
    pub fn resolve(
        project_dir: PathBuf,
        mapping_file: Option<PathBuf>,
        target_script: Option<ScriptRange>,
    ) -> Result<Self, String> {
        if !project_dir.is_dir() {
            return Err(format!(
                "Project directory does not exist: {}",
                project_dir.display()
            ));
        }

        let settings = ProjectSettings::load(&project_dir)?;
        let script = match target_script {
            Some(script) => script,
            None => settings.script()?,
        };

        let mut layout = settings.layout(&project_dir);
        if let Some(file) = mapping_file {
            layout = layout.with_mapping_file(file);
        }
        if !layout.mapping_file.is_file() {
            return Err(format!(
                "Mapping file not found: {}",
                layout.mapping_file.display()
            ));
        }

        tracing::debug!(
            mapping_file = %layout.mapping_file.display(),
            output_dir = %layout.output_dir.display(),
            "resolved project layout"
        );
        Ok(Self { layout, script })
    }

    fn options(&self) -> SyncOptions {
        SyncOptions::default().with_script(self.script)
    }
}

pub fn run_export_command(config: &RunConfig) -> Result<(), String> {
    let summary = export_all(&config.layout, config.options(), &TracingReporter)
        .map_err(|e| format!("Export aborted: {}", e))?;
    println!("Exported mappings: {}", summary.succeeded);
    finish("Export", &summary, &config.layout.output_dir)
}

pub fn run_import_command(config: &RunConfig) -> Result<(), String> {
    let summary = import_all(&config.layout, config.options(), &TracingReporter)
        .map_err(|e| format!("Import aborted: {}", e))?;
    println!("Imported mappings: {}", summary.succeeded);
    finish("Import", &summary, &config.layout.translation_dir)
}

fn finish(operation: &str, summary: &RunSummary, target: &Path) -> Result<(), String> {
    if summary.is_success() {
        println!("✅ {} complete: {}", operation, target.display());
        return Ok(());
    }

    for failure in &summary.failed {
        println!("❌ {}: {}", failure.path, failure.error);
    }
    Err(format!(
        "{} finished with {} failed mapping(s)",
        operation,
        summary.failed.len()
    ))
}
