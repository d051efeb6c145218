use crate::core::runner::{FileRecord, RunSummary, Verdict};

/// Consumes the per-file records and the final summary of a run.
///
/// The runner never prints; anything user-facing goes through an
/// implementation of this trait.
pub trait OutcomeReporter {
    /// Called once per path, in processing order.
    fn report_file(&mut self, record: &FileRecord);

    /// Called once after the last file.
    fn report_summary(&mut self, summary: &RunSummary);
}

/// Prints verdicts and totals to standard output.
///
/// This is the reporter used by the `run` command.
pub struct ConsoleReporter {
    dry_run: bool,
}

impl ConsoleReporter {
    /// Constructs a new `ConsoleReporter`. In a dry run, updated files are
    /// labelled "Would update".
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Formats the status line for a single file.
    ///
    /// ✅: content changed. ⚪: nothing to replace. ❌: read or write fault.
    pub fn format_record(&self, record: &FileRecord) -> String {
        let path = record.path.display();
        match &record.verdict {
            Verdict::Updated if self.dry_run => format!("📝 Would update: {path}"),
            Verdict::Updated => format!("✅ Updated: {path}"),
            Verdict::Unchanged => format!("⚪ No changes: {path}"),
            Verdict::Failed(fault) => format!("❌ Error processing {path}: {fault}"),
        }
    }

    /// Formats the totals block printed at the end of a run.
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        let updated_label = if self.dry_run {
            "Files to update"
        } else {
            "Updated files"
        };
        let mut lines = vec![
            "=".repeat(50),
            "🎉 Replacement finished".to_string(),
            format!("📊 Total files: {}", summary.total()),
            format!("📝 {updated_label}: {}", summary.updated()),
            format!("⚪ No changes: {}", summary.unchanged()),
        ];
        if summary.has_failures() {
            lines.push(format!("❌ Failed: {}", summary.failed()));
        }
        lines.join("\n")
    }
}

impl OutcomeReporter for ConsoleReporter {
    fn report_file(&mut self, record: &FileRecord) {
        println!("{}", self.format_record(record));
    }

    fn report_summary(&mut self, summary: &RunSummary) {
        println!();
        println!("{}", self.format_summary(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FileFault;
    use std::path::PathBuf;

    fn record(path: &str, verdict: Verdict) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            verdict,
        }
    }

    #[test]
    fn test_format_record() {
        let reporter = ConsoleReporter::new(false);
        assert_eq!(
            reporter.format_record(&record("lib/a.dart", Verdict::Updated)),
            "✅ Updated: lib/a.dart"
        );
        assert_eq!(
            reporter.format_record(&record("lib/b.dart", Verdict::Unchanged)),
            "⚪ No changes: lib/b.dart"
        );

        let failed = record(
            "lib/c.dart",
            Verdict::Failed(FileFault::Read {
                path: PathBuf::from("lib/c.dart"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        );
        let line = reporter.format_record(&failed);
        assert!(line.starts_with("❌ Error processing lib/c.dart: read failed: "));
        assert_eq!(line.matches("lib/c.dart").count(), 1);
    }

    #[test]
    fn test_dry_run_wording() {
        let reporter = ConsoleReporter::new(true);
        assert_eq!(
            reporter.format_record(&record("lib/a.dart", Verdict::Updated)),
            "📝 Would update: lib/a.dart"
        );

        let mut summary = RunSummary::new();
        summary.record(&Verdict::Updated);
        let text = reporter.format_summary(&summary);
        assert!(text.contains("Files to update: 1"));
        assert!(!text.contains("Failed"));
    }
}
