use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::builders::reporter::{ConsoleReporter, OutcomeReporter};
use crate::core::config::{ConfigManager, ConfigProvider};
use crate::core::discovery::discover_files;
use crate::core::runner::{BatchRunner, RunOptions, RunSummary};

/// Where a command finds its working root and rules file.
#[derive(Debug, Default, Clone)]
pub struct ConfigLocation {
    /// Directory the scan root and default config path resolve against.
    /// Defaults to the current directory.
    pub workdir: Option<PathBuf>,
    /// Explicit rules file, overriding `<workdir>/auto-replace.toml`.
    pub config: Option<PathBuf>,
}

/// Overrides the `run` command accepts on top of the config file.
#[derive(Debug, Default, Clone)]
pub struct RunRequest {
    pub location: ConfigLocation,
    pub root: Option<String>,
    pub extension: Option<String>,
    pub dry_run: bool,
}

pub fn initialize(location: &ConfigLocation) -> Result<()> {
    let config_manager = get_config_manager(location)?;
    if config_manager.initialize()? {
        println!(
            "✓ Wrote default rules to {}",
            config_manager.get_config_path()?.display()
        );
    } else {
        println!("✓ Configuration already present, nothing to do");
    }
    println!("Run 'auto-replace run --dry-run' to preview the changes");
    Ok(())
}

/// Whether the config file asks for debug logging. An unreadable config
/// counts as "no"; the command itself reports that error.
pub fn verbose_requested(location: &ConfigLocation) -> bool {
    get_config_manager(location)
        .and_then(|manager| manager.load_config())
        .map(|config| config.settings.verbose)
        .unwrap_or(false)
}

/// Loads the rules, discovers the files and rewrites them.
///
/// # Arguments
/// * `request`: Where to find the config, plus command-line overrides.
///
/// # Returns
/// The run summary. An error means nothing was processed: the config could
/// not be loaded, a rule is malformed, or the scan root is missing.
pub fn run_replacements(request: &RunRequest) -> Result<RunSummary> {
    let config_manager = get_config_manager(&request.location)?;
    let mut config = config_manager.load_config()?;

    if let Some(root) = &request.root {
        config.scan.root = root.clone();
    }
    if let Some(extension) = &request.extension {
        config.scan.extension = extension.clone();
    }
    let dry_run = request.dry_run || config.settings.dry_run;

    // A broken rule aborts here, before any file is read.
    let rules = config.rule_store().context("Invalid replacement rules")?;
    info!(
        literals = rules.literals().len(),
        templates = rules.templates().len(),
        "rules loaded"
    );

    println!("🚀 Starting batch replacement...");
    println!("{}", "=".repeat(50));

    let files = discover_files(config_manager.get_root(), &config.scan)?;
    if files.is_empty() {
        println!(
            "❌ No .{} files found under '{}'",
            config.scan.extension, config.scan.root
        );
        return Ok(RunSummary::new());
    }
    println!("📁 Found {} .{} files\n", files.len(), config.scan.extension);

    let mut reporter = ConsoleReporter::new(dry_run);
    let runner = BatchRunner::new(&rules).options(RunOptions { dry_run });
    let summary = runner.run(&files, &mut reporter);
    reporter.report_summary(&summary);

    Ok(summary)
}

pub fn validate(location: &ConfigLocation) -> Result<()> {
    get_config_manager(location)?.validate_config()
}

pub fn list(location: &ConfigLocation) -> Result<()> {
    get_config_manager(location)?.list_rules()
}

pub fn add_literal(location: &ConfigLocation, source: String, target: String) -> Result<()> {
    let mut config_manager = get_config_manager(location)?;
    config_manager.add_literal(source, target)?;
    println!("✓ Added literal rule");
    Ok(())
}

pub fn add_template(location: &ConfigLocation, pattern: String, replacement: String) -> Result<()> {
    let mut config_manager = get_config_manager(location)?;
    config_manager.add_template(pattern, replacement)?;
    println!("✓ Added template rule");
    Ok(())
}

pub fn import(location: &ConfigLocation, file: &str, format: &str) -> Result<()> {
    let mut config_manager = get_config_manager(location)?;
    let count = config_manager.import_rules(file, format)?;
    println!("✓ Imported {count} rules from {file}");
    Ok(())
}

pub fn export(location: &ConfigLocation, output: &str, format: &str) -> Result<()> {
    get_config_manager(location)?.export_rules(output, format)?;
    println!("✓ Exported rules to {output}");
    Ok(())
}

// Helper function to create ConfigManager instance
fn get_config_manager(location: &ConfigLocation) -> Result<ConfigManager> {
    let mut config_manager = match &location.workdir {
        Some(dir) => ConfigManager::new_at(dir.clone())?,
        None => ConfigManager::new()?,
    };
    if let Some(path) = &location.config {
        config_manager.set_config_path(path.clone());
    }
    Ok(config_manager)
}
