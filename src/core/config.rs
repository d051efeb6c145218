use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::importer::{FileImporter, RuleImporter};
use crate::builders::patterns::{CompiledTemplate, LiteralRule, RuleStore, TemplateRule};
use crate::builders::validator::{ConfigValidator, StandardValidator};
use crate::core::error::RuleError;

pub const CONFIG_VERSION: &str = "1.0";
pub const CONFIG_FILE_NAME: &str = "auto-replace.toml";

/// The rule set written by `init` and used when no config file exists.
pub const DEFAULT_RULES: &str = include_str!("../../rules/default.toml");

/// Where to look for files to rewrite.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScanSettings {
    /// Directory walked recursively, relative to the working root.
    pub root: String,
    /// File extension to process, without the dot.
    pub extension: String,
    /// Glob patterns (relative to `root`) of files to skip.
    pub exclude: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            root: "lib".to_string(),
            extension: "dart".to_string(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalSettings {
    pub dry_run: bool,
    pub verbose: bool,
}

/// The on-disk configuration: scan settings plus both ordered rule tables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReplaceConfig {
    pub version: String,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub settings: GlobalSettings,
    #[serde(default)]
    pub literal: Vec<LiteralRule>,
    #[serde(default)]
    pub template: Vec<TemplateRule>,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            scan: ScanSettings::default(),
            settings: GlobalSettings::default(),
            literal: Vec::new(),
            template: Vec::new(),
        }
    }
}

impl ReplaceConfig {
    /// The built-in rule set.
    pub fn builtin() -> Result<Self> {
        toml::from_str(DEFAULT_RULES).context("Failed to parse built-in rules")
    }

    /// Compiles the rule tables. Fails on the first malformed rule.
    pub fn rule_store(&self) -> Result<RuleStore, RuleError> {
        RuleStore::new(self.literal.clone(), self.template.clone())
    }
}

/// A document holding only rule tables, as used by import and export.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    #[serde(default)]
    pub literal: Vec<LiteralRule>,
    #[serde(default)]
    pub template: Vec<TemplateRule>,
}

pub struct ConfigManager {
    config_path: PathBuf,
    root: PathBuf,
}

impl ConfigManager {
    /// A manager rooted at the current working directory.
    pub fn new() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to determine current directory")?;
        Self::new_at(root)
    }

    pub fn new_at(root: PathBuf) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE_NAME);
        Ok(Self { config_path, root })
    }

    /// Points the manager at an explicit config file.
    pub fn set_config_path(&mut self, path: PathBuf) {
        self.config_path = path;
    }

    /// Writes the built-in rules if no config exists yet.
    /// Returns `true` when a file was created.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        fs::write(&self.config_path, DEFAULT_RULES).context("Failed to write config file")?;
        Ok(true)
    }

    pub fn validate_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let validator = StandardValidator::new();
        let issues = validator.validate_config(&config);

        if issues.is_empty() {
            println!("✓ Configuration is valid.");
            Ok(())
        } else {
            println!("⚠️  Found issues in configuration:");
            for issue in issues {
                println!("  - {issue}");
            }
            anyhow::bail!("Configuration validation failed.");
        }
    }

    pub fn add_literal(&mut self, source: String, target: String) -> Result<()> {
        if source.is_empty() {
            anyhow::bail!("Literal source phrase must not be empty");
        }
        let mut config = self.load_config()?;
        config.literal.push(LiteralRule::new(source, target));
        self.save_config(&config)
    }

    pub fn add_template(&mut self, pattern: String, replacement: String) -> Result<()> {
        let mut config = self.load_config()?;
        let rule = TemplateRule::new(pattern, replacement);
        CompiledTemplate::compile(config.template.len() + 1, rule.clone())?;
        config.template.push(rule);
        self.save_config(&config)
    }

    pub fn list_rules(&self) -> Result<()> {
        let config = self.load_config()?;

        if config.literal.is_empty() && config.template.is_empty() {
            println!("No replacement rules configured.");
            return Ok(());
        }

        println!("📖 Literal rules ({}):", config.literal.len());
        for (i, rule) in config.literal.iter().enumerate() {
            println!("  {:>3}. {rule}", i + 1);
        }

        println!("\n🧩 Template rules ({}):", config.template.len());
        for (i, rule) in config.template.iter().enumerate() {
            println!("  {:>3}. {rule}", i + 1);
        }
        Ok(())
    }

    /// Appends the rules found in `file_path` after the existing ones.
    /// Returns how many rules were imported.
    pub fn import_rules(&mut self, file_path: &str, format: &str) -> Result<usize> {
        let importer = FileImporter::new();
        let imported = importer.import_from_file(file_path, format)?;

        let mut config = self.load_config()?;
        config.literal.extend(imported.literal.iter().cloned());
        config.template.extend(imported.template.iter().cloned());
        config
            .rule_store()
            .context("Imported rules are not valid")?;

        self.save_config(&config)?;
        Ok(imported.literal.len() + imported.template.len())
    }

    pub fn export_rules(&self, file_path: &str, format: &str) -> Result<()> {
        let config = self.load_config()?;
        let rules = RuleSet {
            literal: config.literal,
            template: config.template,
        };

        let content = match format {
            "json" => serde_json::to_string_pretty(&rules).context("Failed to serialize to JSON")?,
            "yaml" => serde_yaml::to_string(&rules).context("Failed to serialize to YAML")?,
            "toml" => toml::to_string_pretty(&rules).context("Failed to serialize to TOML")?,
            other => anyhow::bail!("Unsupported export format: {other}"),
        };

        fs::write(file_path, content).context("Failed to write export file")?;
        Ok(())
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<ReplaceConfig>;
    fn save_config(&self, config: &ReplaceConfig) -> Result<()>;
    fn get_config_path(&self) -> Result<PathBuf>;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<ReplaceConfig> {
        if !self.config_path.exists() {
            return ReplaceConfig::builtin();
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.config_path.display()))
    }

    fn save_config(&self, config: &ReplaceConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> Result<PathBuf> {
        Ok(self.config_path.clone())
    }
}
