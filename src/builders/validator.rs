use std::collections::HashMap;

use crate::builders::patterns::{CompiledTemplate, LiteralRule, TemplateRule};
use crate::core::config::{CONFIG_VERSION, ReplaceConfig};

/// The `ConfigValidator` trait defines the public interface for checking a
/// rules configuration before it is used.
///
/// `RuleStore::new` already refuses malformed rules. A validator goes further
/// and reports every problem at once, including rules that are well-formed
/// but can never fire.
pub trait ConfigValidator {
    /// Checks the whole configuration and returns one message per issue.
    fn validate_config(&self, config: &ReplaceConfig) -> Vec<String>;

    /// Checks the literal table.
    fn validate_literals(&self, rules: &[LiteralRule]) -> Vec<String>;

    /// Checks a single template rule. `index` is its 1-based position.
    fn validate_template(&self, index: usize, rule: &TemplateRule) -> Vec<String>;
}

/// The `StandardValidator` is the validator used by the `validate` command.
pub struct StandardValidator;

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &ReplaceConfig) -> Vec<String> {
        let mut issues = Vec::new();

        if config.version != CONFIG_VERSION {
            issues.push(format!("Unsupported config version: {}", config.version));
        }

        if config.scan.extension.trim().is_empty() {
            issues.push("Scan extension must not be empty".to_string());
        }

        issues.extend(self.validate_literals(&config.literal));

        for (i, rule) in config.template.iter().enumerate() {
            issues.extend(self.validate_template(i + 1, rule));
        }

        issues
    }

    /// Looks for empty, duplicated and shadowed sources.
    ///
    /// A rule is shadowed when an earlier rule's source occurs inside its own:
    /// by the time it runs, the earlier rule has already rewritten that text.
    fn validate_literals(&self, rules: &[LiteralRule]) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (i, rule) in rules.iter().enumerate() {
            let position = i + 1;
            if rule.source.is_empty() {
                issues.push(format!("Literal rule #{position} has an empty source phrase"));
                continue;
            }

            if let Some(first) = seen.get(rule.source.as_str()) {
                issues.push(format!(
                    "Literal rule #{position} duplicates rule #{first} ('{}')",
                    rule.source
                ));
                continue;
            }

            if let Some((earlier, shadow)) = rules[..i]
                .iter()
                .enumerate()
                .find(|(_, r)| !r.source.is_empty() && rule.source.contains(r.source.as_str()))
            {
                issues.push(format!(
                    "Literal rule #{position} ('{}') is shadowed by rule #{} ('{}') and may never match",
                    rule.source,
                    earlier + 1,
                    shadow.source
                ));
            }

            seen.insert(rule.source.as_str(), position);
        }

        issues
    }

    fn validate_template(&self, index: usize, rule: &TemplateRule) -> Vec<String> {
        let mut issues = Vec::new();

        match CompiledTemplate::compile(index, rule.clone()) {
            Ok(compiled) => {
                if compiled.regex().is_match("") {
                    issues.push(format!(
                        "Template rule #{index} pattern '{}' matches the empty string; \
                         empty matches right after a non-empty one are skipped, unlike \
                         Python's re.sub (e.g. 'x*' over \"abxd\")",
                        rule.pattern
                    ));
                }
            }
            Err(e) => issues.push(e.to_string()),
        }

        issues
    }
}
