use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::builders::patterns::RuleStore;
use crate::builders::reporter::OutcomeReporter;
use crate::core::engine::SubstitutionEngine;
use crate::core::error::FileFault;
use crate::core::files::{FileStore, LocalFileStore};

/// The terminal outcome of processing one file.
#[derive(Debug)]
pub enum Verdict {
    /// The rules changed the content and it was written back
    /// (or would have been, in a dry run).
    Updated,
    /// The rules left the content as it was. Nothing was written.
    Unchanged,
    /// Reading, decoding or writing the file failed.
    Failed(FileFault),
}

impl Verdict {
    pub fn is_failed(&self) -> bool {
        matches!(self, Verdict::Failed(_))
    }
}

/// One processed path and its verdict. Lives only until it has been reported.
#[derive(Debug)]
pub struct FileRecord {
    pub path: PathBuf,
    pub verdict: Verdict,
}

/// Aggregate counts for a run.
///
/// Counts only move through `record`, so
/// `updated + unchanged + failed == total` always holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    total: usize,
    updated: usize,
    unchanged: usize,
    failed: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Updated => self.updated += 1,
            Verdict::Unchanged => self.unchanged += 1,
            Verdict::Failed(_) => self.failed += 1,
        }
    }

    /// Folds another partial summary into this one.
    pub fn merge(&mut self, other: RunSummary) {
        self.total += other.total;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn updated(&self) -> usize {
        self.updated
    }

    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunOptions {
    /// Compute verdicts without writing anything back.
    pub dry_run: bool,
}

/// Runs the substitution engine over a list of files, one at a time.
///
/// A fault on one file is recorded as that file's verdict and the batch moves
/// on; nothing escapes the per-file boundary.
pub struct BatchRunner<'a, S: FileStore = LocalFileStore> {
    engine: SubstitutionEngine<'a>,
    store: S,
    options: RunOptions,
}

impl<'a> BatchRunner<'a, LocalFileStore> {
    pub fn new(rules: &'a RuleStore) -> Self {
        Self::with_store(rules, LocalFileStore::new())
    }
}

impl<'a, S: FileStore> BatchRunner<'a, S> {
    pub fn with_store(rules: &'a RuleStore, store: S) -> Self {
        Self {
            engine: SubstitutionEngine::new(rules),
            store,
            options: RunOptions::default(),
        }
    }

    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Read, transform and (when changed) write back a single file.
    ///
    /// # Arguments
    /// * `path`: The file to rewrite in place.
    ///
    /// # Returns
    /// A `FileRecord` for `path`. Faults never escape: they become
    /// `Verdict::Failed` and the file is left as it was.
    pub fn process(&self, path: &Path) -> FileRecord {
        let verdict = match self.process_inner(path) {
            Ok(true) => Verdict::Updated,
            Ok(false) => Verdict::Unchanged,
            Err(fault) => {
                warn!(path = %fault.path().display(), kind = fault.kind(), error = %fault, "file failed");
                Verdict::Failed(fault)
            }
        };
        debug!(path = %path.display(), ?verdict, "file processed");

        FileRecord {
            path: path.to_path_buf(),
            verdict,
        }
    }

    fn process_inner(&self, path: &Path) -> Result<bool, FileFault> {
        let original = self.store.read_text(path)?;
        let transformation = self.engine.transform(&original);

        if transformation.changed && !self.options.dry_run {
            self.store.write_text(path, &transformation.result)?;
        }
        Ok(transformation.changed)
    }

    /// Processes every path in order, handing each record to `reporter`.
    ///
    /// # Arguments
    /// * `paths`: Files to process. Duplicates are processed twice.
    /// * `reporter`: Receives one record per path, in order.
    ///
    /// # Returns
    /// The totals for the batch. A failed file does not stop the ones after it.
    pub fn run<I, P>(&self, paths: I, reporter: &mut dyn OutcomeReporter) -> RunSummary
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut summary = RunSummary::new();
        for path in paths {
            let record = self.process(path.as_ref());
            summary.record(&record.verdict);
            reporter.report_file(&record);
        }

        debug!(
            total = summary.total(),
            updated = summary.updated(),
            unchanged = summary.unchanged(),
            failed = summary.failed(),
            "batch finished"
        );
        summary
    }
}

/// Runs `rules` over `paths` on the local filesystem.
pub fn run<I, P>(paths: I, rules: &RuleStore, reporter: &mut dyn OutcomeReporter) -> RunSummary
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    BatchRunner::new(rules).run(paths, reporter)
}
