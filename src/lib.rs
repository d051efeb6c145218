//! Rule-driven, in-place text substitution over a set of files.
//!
//! A `RuleStore` holds an ordered table of literal phrases and an ordered
//! list of regex templates. The `SubstitutionEngine` applies it to one
//! file's text; the `BatchRunner` does that for many files, writing back the
//! ones that changed and isolating per-file faults.
pub mod builders;
pub mod core;
pub mod utils;


pub use crate::builders::patterns::{LiteralRule, RuleStore, TemplateRule};
pub use crate::core::engine::{SubstitutionEngine, Transformation, transform};
pub use crate::core::runner::{BatchRunner, FileRecord, RunOptions, RunSummary, Verdict, run};
