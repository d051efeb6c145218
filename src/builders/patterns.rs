use regex::{Captures, Regex, Replacer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::RuleError;

/// An exact-phrase substitution. Every occurrence of `source` becomes `target`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LiteralRule {
    /// The phrase to look for. Must not be empty.
    pub source: String,
    /// The phrase written in its place.
    pub target: String,
}

impl LiteralRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A pattern substitution whose replacement re-inserts captured groups.
///
/// `replacement` uses positional back-references: `\1`, `\12` (one or two
/// digits), `\g<1>` or `\g<name>`. Other escapes follow Python's `re`
/// replacement rules, see `ReplacementTemplate::parse`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TemplateRule {
    /// A regular expression in `regex` crate syntax.
    pub pattern: String,
    /// The replacement template.
    pub replacement: String,
}

impl TemplateRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Group(usize),
    Named(String),
}

/// A parsed replacement template: literal text interleaved with group references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTemplate {
    segments: Vec<Segment>,
}

impl ReplacementTemplate {
    /// Parses a template string. Returns a human-readable reason on failure.
    ///
    /// Escapes follow Python's `re` replacement syntax:
    /// * `\1`..`\99` and `\g<N>` / `\g<name>` refer to groups.
    /// * `\0`, `\0NN` and three-digit `\NNN` are octal character codes.
    /// * `\a \b \f \n \r \t \v \\` are control characters or a backslash.
    /// * A backslash before any other ASCII letter is an error; before
    ///   anything else (`\$`, `\(`, `\.`) both characters are kept as-is.
    pub fn parse(template: &str) -> Result<Self, String> {
        let chars: Vec<char> = template.chars().collect();
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            i += 1;
            if c != '\\' {
                text.push(c);
                continue;
            }

            let Some(&next) = chars.get(i) else {
                return Err("dangling backslash at end of template".to_string());
            };
            i += 1;

            let segment = match next {
                'g' => {
                    if chars.get(i) != Some(&'<') {
                        return Err("expected `<` after `\\g`".to_string());
                    }
                    let Some(len) = chars[i + 1..].iter().position(|&ch| ch == '>') else {
                        return Err("unterminated `\\g<...>` reference".to_string());
                    };
                    let name: String = chars[i + 1..i + 1 + len].iter().collect();
                    i += len + 2;
                    if name.is_empty() {
                        return Err("empty `\\g<>` reference".to_string());
                    }
                    match name.parse::<usize>() {
                        Ok(index) => Segment::Group(index),
                        Err(_) => Segment::Named(name),
                    }
                }
                '0' => {
                    let digits = octal_run(&chars[i..], 2);
                    i += digits.len();
                    text.push(octal_char(&format!("0{digits}"))?);
                    continue;
                }
                d if d.is_ascii_digit() => {
                    let ahead = octal_run(&chars[i..], 2);
                    if d <= '7' && ahead.len() == 2 {
                        i += 2;
                        text.push(octal_char(&format!("{d}{ahead}"))?);
                        continue;
                    }
                    let mut index = d.to_digit(10).unwrap_or_default() as usize;
                    if let Some(second) = chars.get(i).and_then(|ch| ch.to_digit(10)) {
                        index = index * 10 + second as usize;
                        i += 1;
                    }
                    Segment::Group(index)
                }
                other => {
                    match other {
                        '\\' => text.push('\\'),
                        'a' => text.push('\x07'),
                        'b' => text.push('\x08'),
                        'f' => text.push('\x0c'),
                        'n' => text.push('\n'),
                        'r' => text.push('\r'),
                        't' => text.push('\t'),
                        'v' => text.push('\x0b'),
                        letter if letter.is_ascii_alphabetic() => {
                            return Err(format!("unknown escape `\\{letter}`"));
                        }
                        kept => {
                            text.push('\\');
                            text.push(kept);
                        }
                    }
                    continue;
                }
            };

            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(segment);
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { segments })
    }

    /// Highest positional group referenced, if any.
    pub fn max_group(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Group(index) => Some(*index),
                _ => None,
            })
            .max()
    }

    /// Names of every named group referenced.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Named(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Appends the expansion for one match to `dst`.
    /// Groups that did not take part in the match expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>, dst: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => dst.push_str(text),
                Segment::Group(index) => {
                    if let Some(m) = caps.get(*index) {
                        dst.push_str(m.as_str());
                    }
                }
                Segment::Named(name) => {
                    if let Some(m) = caps.name(name) {
                        dst.push_str(m.as_str());
                    }
                }
            }
        }
    }
}

/// Leading octal digits of `chars`, at most `max` of them.
fn octal_run(chars: &[char], max: usize) -> String {
    chars
        .iter()
        .take(max)
        .take_while(|ch| ('0'..='7').contains(*ch))
        .collect()
}

fn octal_char(digits: &str) -> Result<char, String> {
    let code = u32::from_str_radix(digits, 8).map_err(|_| format!("bad octal escape `\\{digits}`"))?;
    if code > 0o377 {
        return Err(format!("octal escape `\\{digits}` is out of range"));
    }
    char::from_u32(code).ok_or_else(|| format!("bad octal escape `\\{digits}`"))
}

impl Replacer for &ReplacementTemplate {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.expand(caps, dst);
    }
}

/// A template rule after compilation: the regex plus its parsed replacement.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    rule: TemplateRule,
    regex: Regex,
    template: ReplacementTemplate,
}

impl CompiledTemplate {
    /// Compiles `rule`. `index` is its 1-based position, used in error messages.
    pub fn compile(index: usize, rule: TemplateRule) -> Result<Self, RuleError> {
        let regex = Regex::new(&rule.pattern).map_err(|source| RuleError::InvalidPattern {
            index,
            pattern: rule.pattern.clone(),
            source,
        })?;

        let template = ReplacementTemplate::parse(&rule.replacement).map_err(|reason| {
            RuleError::InvalidTemplate {
                index,
                template: rule.replacement.clone(),
                reason,
            }
        })?;

        // captures_len counts the implicit whole-match group 0.
        let available = regex.captures_len() - 1;
        if let Some(group) = template.max_group()
            && group > available
        {
            return Err(RuleError::MissingGroup {
                index,
                pattern: rule.pattern.clone(),
                group,
                available,
            });
        }

        for name in template.group_names() {
            if !regex.capture_names().flatten().any(|n| n == name) {
                return Err(RuleError::MissingNamedGroup {
                    index,
                    pattern: rule.pattern.clone(),
                    name: name.to_string(),
                });
            }
        }

        Ok(Self {
            rule,
            regex,
            template,
        })
    }

    pub fn rule(&self) -> &TemplateRule {
        &self.rule
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn template(&self) -> &ReplacementTemplate {
        &self.template
    }
}

/// The immutable, ordered rule collections shared by every file of a run.
///
/// Built once; construction fails on the first malformed rule so a broken
/// rule is never applied partially across a batch.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    literals: Vec<LiteralRule>,
    templates: Vec<CompiledTemplate>,
}

impl RuleStore {
    pub fn new(literals: Vec<LiteralRule>, templates: Vec<TemplateRule>) -> Result<Self, RuleError> {
        if let Some(position) = literals.iter().position(|r| r.source.is_empty()) {
            return Err(RuleError::EmptySource {
                index: position + 1,
            });
        }

        let templates = templates
            .into_iter()
            .enumerate()
            .map(|(i, rule)| CompiledTemplate::compile(i + 1, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            literals,
            templates,
        })
    }

    /// A store with no rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn literals(&self) -> &[LiteralRule] {
        &self.literals
    }

    pub fn templates(&self) -> &[CompiledTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.literals.len() + self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for LiteralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.source, self.target)
    }
}

impl fmt::Display for TemplateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/ => {}", self.pattern, self.replacement)
    }
}
