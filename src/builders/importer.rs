use anyhow::{Context, Result};
use std::fs;

use crate::builders::patterns::{LiteralRule, TemplateRule};
use crate::core::config::RuleSet;

/// A trait that defines the behavior for importing replacement rules from a source.
pub trait RuleImporter {
    /// Imports rules from a file.
    ///
    /// # Arguments
    /// * `file_path`: The path to the file to be imported.
    /// * `format`: `pairs`, `json`, `yaml` or `toml`.
    ///
    /// # Returns
    /// The rules in file order, ready to be appended to the configuration.
    fn import_from_file(&self, file_path: &str, format: &str) -> Result<RuleSet>;
}

/// Reads rule files from disk.
pub struct FileImporter;

impl RuleImporter for FileImporter {
    fn import_from_file(&self, file_path: &str, format: &str) -> Result<RuleSet> {
        let content = fs::read_to_string(file_path).context("Failed to read import file")?;
        self.parse(&content, format)
    }
}

impl FileImporter {
    /// Constructs a new `FileImporter` instance.
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str, format: &str) -> Result<RuleSet> {
        match format {
            "pairs" => self.parse_pairs(content),
            "json" => serde_json::from_str(content).context("Failed to parse JSON rules"),
            "yaml" => serde_yaml::from_str(content).context("Failed to parse YAML rules"),
            "toml" => toml::from_str(content).context("Failed to parse TOML rules"),
            other => anyhow::bail!("Unsupported import format: {other}"),
        }
    }

    /// Parses the line-oriented `pairs` format.
    ///
    /// ```text
    /// # comment
    /// 早餐 => Breakfast
    /// re: (\d+)天 => \1 days
    /// ```
    ///
    /// Whitespace around each side of ` => ` is trimmed. Lines starting with
    /// `re:` become template rules, everything else a literal rule.
    fn parse_pairs(&self, content: &str) -> Result<RuleSet> {
        let mut rules = RuleSet::default();

        for (i, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (is_template, body) = match line.strip_prefix("re:") {
                Some(rest) => (true, rest.trim_start()),
                None => (false, line),
            };

            let Some((left, right)) = body.split_once(" => ") else {
                anyhow::bail!("Line {}: expected `source => target`, got `{}`", i + 1, raw);
            };
            let (left, right) = (left.trim(), right.trim());
            if left.is_empty() {
                anyhow::bail!("Line {}: empty source", i + 1);
            }

            if is_template {
                rules.template.push(TemplateRule::new(left, right));
            } else {
                rules.literal.push(LiteralRule::new(left, right));
            }
        }

        Ok(rules)
    }
}

impl Default for FileImporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_format() {
        let content = "# meals\n早餐 => Breakfast\n\n  午餐 =>   Lunch \nre: (\\d+)天 => \\1 days\n";
        let rules = FileImporter::new().parse(content, "pairs").unwrap();
        assert_eq!(
            rules.literal,
            vec![
                LiteralRule::new("早餐", "Breakfast"),
                LiteralRule::new("午餐", "Lunch")
            ]
        );
        assert_eq!(rules.template, vec![TemplateRule::new(r"(\d+)天", r"\1 days")]);
    }

    #[test]
    fn test_pairs_format_errors_name_the_line() {
        let err = FileImporter::new()
            .parse("早餐 => Breakfast\nno arrow here\n", "pairs")
            .unwrap_err();
        assert!(err.to_string().starts_with("Line 2"));
    }

    #[test]
    fn test_yaml_format() {
        let content = "literal:\n  - source: 晚餐\n    target: Dinner\n";
        let rules = FileImporter::new().parse(content, "yaml").unwrap();
        assert_eq!(rules.literal, vec![LiteralRule::new("晚餐", "Dinner")]);
        assert!(rules.template.is_empty());
    }

    #[test]
    fn test_unknown_format() {
        assert!(FileImporter::new().parse("", "csv").is_err());
    }
}
