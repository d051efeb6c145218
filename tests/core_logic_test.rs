use auto_replace::builders::reporter::OutcomeReporter;
use auto_replace::core::error::FileFault;
use auto_replace::{
    BatchRunner, FileRecord, LiteralRule, RuleStore, RunSummary, TemplateRule, Verdict, run,
    transform,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Default)]
struct Collect {
    records: Vec<(PathBuf, String)>,
}

impl OutcomeReporter for Collect {
    fn report_file(&mut self, record: &FileRecord) {
        let label = match &record.verdict {
            Verdict::Updated => "updated".to_string(),
            Verdict::Unchanged => "unchanged".to_string(),
            Verdict::Failed(fault) => format!("failed:{}", fault.kind()),
        };
        self.records.push((record.path.clone(), label));
    }

    fn report_summary(&mut self, _summary: &RunSummary) {}
}

fn setup() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn test_batch_isolates_missing_file() {
    let td = setup();
    let path1 = td.path().join("one.dart");
    let path2 = td.path().join("two.dart");
    let path3 = td.path().join("three.dart");
    fs::write(&path1, "Text('早餐')").unwrap();
    fs::write(&path2, "Text('Hello')").unwrap();

    let rules = RuleStore::new(vec![LiteralRule::new("早餐", "Breakfast")], vec![]).unwrap();
    let mut collect = Collect::default();

    // The missing file sits in the middle so both neighbours must still be handled.
    let summary = run([&path1, &path3, &path2], &rules, &mut collect);

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.updated(), 1);
    assert_eq!(summary.unchanged(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(
        collect.records,
        vec![
            (path1.clone(), "updated".to_string()),
            (path3.clone(), "failed:read".to_string()),
            (path2.clone(), "unchanged".to_string()),
        ]
    );

    assert_eq!(fs::read_to_string(&path1).unwrap(), "Text('Breakfast')");
    assert_eq!(fs::read_to_string(&path2).unwrap(), "Text('Hello')");
    assert!(!path3.exists(), "runner must not create files");
}

#[test]
fn test_summary_produced_when_everything_fails() {
    let td = setup();
    let rules = RuleStore::empty();
    let mut collect = Collect::default();

    let missing: Vec<_> = (0..3).map(|i| td.path().join(format!("{i}.dart"))).collect();
    let summary = run(&missing, &rules, &mut collect);

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.failed(), 3);
    assert_eq!(collect.records.len(), 3);
}

#[test]
fn test_undecodable_file_is_failed() {
    let td = setup();
    let path = td.path().join("latin1.dart");
    fs::write(&path, [b'c', b'a', b'f', 0xe9]).unwrap();

    let rules = RuleStore::new(vec![LiteralRule::new("caf", "CAF")], vec![]).unwrap();
    let record = BatchRunner::new(&rules).process(&path);

    match record.verdict {
        Verdict::Failed(FileFault::Decode { .. }) => {}
        other => panic!("expected a decode fault, got {other:?}"),
    }
    assert_eq!(fs::read(&path).unwrap(), vec![b'c', b'a', b'f', 0xe9]);
}

#[test]
fn test_original_vocabulary_on_a_widget() {
    let config = auto_replace::core::config::ReplaceConfig::builtin().unwrap();
    let rules = config.rule_store().unwrap();

    let source = "Text('卡路里追踪器'),\nText('早餐'),\nText('25岁'),\nText('吃了 3 次'),\n";
    let out = transform(source, &rules);

    assert!(out.changed);
    assert_eq!(
        out.result,
        "Text('Calorie Tracker'),\nText('Breakfast'),\nText('25 years old'),\nText('eaten 3 times'),\n"
    );
}

#[test]
fn test_template_with_multiple_groups() {
    let rules = RuleStore::new(
        vec![],
        vec![TemplateRule::new(
            r"已添加\s*(\S+)\s*\((\d+)\s*卡路里\)",
            r"Added \1 (\2 calories)",
        )],
    )
    .unwrap();

    let out = transform("'已添加 Apple (52 卡路里)'", &rules);
    assert_eq!(out.result, "'Added Apple (52 calories)'");
}
