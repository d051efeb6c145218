// This file is the module declaration file for the `core` module.
// It declares the submodules that carry the replacement logic and exposes
// them to the rest of the crate.

// `config` module:
// The on-disk configuration (`ReplaceConfig`): scan settings plus the ordered
// literal and template tables. `ConfigManager` loads, saves, imports and
// exports it through the `ConfigProvider` trait.
pub mod config;

// `discovery` module:
// Walks the scan root and returns the files a run should process.
pub mod discovery;

// `engine` module:
// The `SubstitutionEngine`, which applies a `RuleStore` to one file's text
// and tells whether anything changed.
pub mod engine;

// `error` module:
// Typed faults: `FileFault` (per file, recoverable) and `RuleError`
// (malformed rule, fatal before the run starts).
pub mod error;

// `files` module:
// The `FileStore` seam between the batch runner and the filesystem.
pub mod files;

// `runner` module:
// The `BatchRunner`, which processes a list of paths under per-file error
// isolation and accumulates a `RunSummary`.
pub mod runner;
