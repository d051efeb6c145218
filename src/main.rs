//! Rewrites phrases across a source tree in place.
//!
//! A table of literal phrases and a list of regex templates are applied, in
//! order, to every matching file under the scan root. Files whose content
//! changes are written back; the rest are left untouched. One file failing
//! never stops the others.
use anyhow::Result;
use auto_replace::utils::{self, ConfigLocation, RunRequest};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "auto-replace")]
#[command(about = "Idempotent, rule-driven phrase replacement across source files")]
struct Cli {
    /// Working root the scan root resolves against (defaults to the current directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Path to the rules file (defaults to <dir>/auto-replace.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug diagnostics to stderr (also enabled by `settings.verbose`)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default rules file into the current directory
    Init,
    /// Apply the rules to every matching file
    Run {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Directory to scan, overriding the config
        #[arg(long)]
        root: Option<String>,
        /// File extension to process, overriding the config
        #[arg(long)]
        ext: Option<String>,
    },
    /// Check the rules for malformed, duplicated or shadowed entries
    Validate,
    /// List the configured rules in application order
    List,
    /// Append a literal rule
    AddLiteral { source: String, target: String },
    /// Append a template rule
    AddTemplate { pattern: String, replacement: String },
    /// Append rules read from a file
    Import {
        file: String,
        /// pairs, json, yaml or toml
        #[arg(long, default_value = "pairs")]
        format: String,
    },
    /// Write the rule tables to a file
    Export {
        #[arg(long)]
        output: String,
        /// json, yaml or toml
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

impl Cli {
    fn location(&self) -> ConfigLocation {
        ConfigLocation {
            workdir: self.dir.clone(),
            config: self.config.clone(),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let location = cli.location();

    let verbose = cli.verbose || utils::verbose_requested(&location);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "auto_replace=debug"
        } else {
            "auto_replace=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if execute(cli.command, &location)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Runs one subcommand. Returns `false` when a run finished with failed files.
fn execute(command: Commands, location: &ConfigLocation) -> Result<bool> {
    match command {
        Commands::Init => utils::initialize(location)?,
        Commands::Run { dry_run, root, ext } => {
            let request = RunRequest {
                location: location.clone(),
                root,
                extension: ext,
                dry_run,
            };
            let summary = utils::run_replacements(&request)?;
            return Ok(!summary.has_failures());
        }
        Commands::Validate => utils::validate(location)?,
        Commands::List => utils::list(location)?,
        Commands::AddLiteral { source, target } => utils::add_literal(location, source, target)?,
        Commands::AddTemplate {
            pattern,
            replacement,
        } => utils::add_template(location, pattern, replacement)?,
        Commands::Import { file, format } => utils::import(location, &file, &format)?,
        Commands::Export { output, format } => utils::export(location, &output, &format)?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(dir: &std::path::Path, args: &[&str]) -> Cli {
        let dir = dir.to_str().unwrap();
        let mut argv = vec!["auto-replace", "--dir", dir];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn exec(cli: Cli) -> Result<bool> {
        let location = cli.location();
        execute(cli.command, &location)
    }

    #[test]
    fn test_init_then_dry_run_then_run() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("home.dart"), "Text('早餐');\n").unwrap();

        let cli = parse(dir.path(), &["init"]);
        assert!(exec(cli).unwrap());
        assert!(dir.path().join("auto-replace.toml").exists());

        let cli = parse(dir.path(), &["run", "--dry-run"]);
        assert!(exec(cli).unwrap());
        assert_eq!(fs::read_to_string(lib.join("home.dart")).unwrap(), "Text('早餐');\n");

        let cli = parse(dir.path(), &["run"]);
        assert!(exec(cli).unwrap());
        assert_eq!(fs::read_to_string(lib.join("home.dart")).unwrap(), "Text('Breakfast');\n");
    }

    #[test]
    fn test_rule_editing_commands() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("rules.toml");
        let config = config.to_str().unwrap();

        let cli = parse(dir.path(), &["--config", config, "add-literal", "苹果派", "Apple Pie"]);
        assert!(exec(cli).unwrap());

        let cli = parse(dir.path(), &["--config", config, "add-template", r"(\d+)分钟", r"\1 minutes"]);
        assert!(exec(cli).unwrap());

        let exported = dir.path().join("out.json");
        let cli = parse(
            dir.path(),
            &["--config", config, "export", "--format", "json", "--output", exported.to_str().unwrap()],
        );
        assert!(exec(cli).unwrap());
        let json = fs::read_to_string(&exported).unwrap();
        assert!(json.contains("Apple Pie") && json.contains("minutes"));

        let cli = parse(dir.path(), &["--config", config, "add-template", "(a)", r"\2"]);
        assert!(exec(cli).is_err());
    }

    #[test]
    fn test_run_reports_failure_for_unreadable_file() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("latin1.dart"), b"caf\xe9").unwrap();

        let cli = parse(dir.path(), &["run"]);
        assert!(!exec(cli).unwrap());
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["auto-replace", "rewrite"]).is_err());
    }
}
