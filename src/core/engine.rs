use std::borrow::Cow;

use crate::builders::patterns::RuleStore;

/// The result of running the rules over one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    /// The content after every rule has been applied.
    pub result: String,
    /// `true` when `result` differs from the input.
    pub changed: bool,
}

/// Applies a `RuleStore` to text.
///
/// Literal rules run first, each one over the whole text before the next one
/// starts, so a later rule sees what an earlier one wrote. Template rules run
/// after them in the same fashion. The engine holds no state of its own and
/// never touches the filesystem.
pub struct SubstitutionEngine<'a> {
    rules: &'a RuleStore,
}

impl<'a> SubstitutionEngine<'a> {
    pub fn new(rules: &'a RuleStore) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleStore {
        self.rules
    }

    /// Transforms `content`. Deterministic for a given (content, rules) pair.
    ///
    /// # Arguments
    /// * `content`: The full text of one file.
    ///
    /// # Returns
    /// The rewritten text and whether it differs from `content`.
    pub fn transform(&self, content: &str) -> Transformation {
        let mut working = content.to_string();

        for rule in self.rules.literals() {
            // str::replace scans left to right and resumes after each
            // replacement, so the target is never rescanned by the same rule.
            if working.contains(rule.source.as_str()) {
                working = working.replace(rule.source.as_str(), &rule.target);
            }
        }

        for compiled in self.rules.templates() {
            let replaced = match compiled.regex().replace_all(&working, compiled.template()) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(replaced) => replaced,
            };
            working = replaced;
        }

        let changed = working != content;
        Transformation {
            result: working,
            changed,
        }
    }
}

/// Convenience wrapper around `SubstitutionEngine::transform`.
pub fn transform(content: &str, rules: &RuleStore) -> Transformation {
    SubstitutionEngine::new(rules).transform(content)
}
