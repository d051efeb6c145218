// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules build, check and present the rule data the
// engine consumes.

// `importer` module:
// Reads rules from external files (`pairs`, JSON, YAML or TOML) so they can
// be appended to the configuration.
pub mod importer;

// `patterns` module:
// Defines the rule shapes (`LiteralRule`, `TemplateRule`), the replacement
// template parser and the immutable `RuleStore` built from them.
pub mod patterns;

// `reporter` module:
// The `OutcomeReporter` trait and its `ConsoleReporter` implementation,
// which render per-file verdicts and the run summary.
pub mod reporter;

// `validator` module:
// The `ConfigValidator` trait and `StandardValidator`, which report malformed,
// duplicated and shadowed rules.
pub mod validator;
