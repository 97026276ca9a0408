use chrono::{Local, TimeZone};
use patternaudit_core::{
    render_markdown, scan_and_write, scan_tree, FancyFeature, PatternKind, ReportFormat, ScanOptions,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write fixture");
}

fn key(root: &Path, rel: &str) -> String {
    root.join(rel).display().to_string()
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "b/x.rs",
        r#"pub const P: &[Pattern] = &[
    destructive_pattern!("wipe_all", r"(\w+)(?i)\1.*"),
    safe_pattern!(r"(?<!--)force"),
];
"#,
    );
    write(root, "a/y.rs", r###"safe_pattern!("look", r##"ab(?=c)"#"##);"###);
    write(root, "a/clean.rs", r###"safe_pattern!(r#"^[a-z]+$"#);"###);
    write(root, "notes.txt", r#"destructive_pattern!(r"(?=ignored)")"#);
    dir
}

#[test]
fn scan_collects_only_flagged_files() {
    let dir = fixture();
    let root = dir.path();
    let (result, stats) = scan_tree(root, &ScanOptions::default()).expect("scan");

    assert_eq!(result.file_count(), 2);
    assert_eq!(stats.files_scanned, 3);
    assert_eq!(stats.declarations_total, 4);
    assert_eq!(stats.findings_total, 3);
    assert_eq!(stats.files_with_findings, 2);
    assert!(result.get(&key(root, "a/clean.rs")).is_none());

    let bx = result.get(&key(root, "b/x.rs")).expect("b/x.rs findings");
    assert_eq!(bx.len(), 2);
    assert_eq!(bx[0].kind, PatternKind::Destructive);
    assert_eq!(bx[0].display_name(), "wipe_all");
    assert_eq!(bx[0].reason, r"Found '\1'");
    assert_eq!(bx[0].line, 2);
    assert_eq!(bx[1].display_name(), "UNNAMED");
    assert_eq!(bx[1].feature, FancyFeature::NegativeLookbehind);

    let ay = result.get(&key(root, "a/y.rs")).expect("a/y.rs findings");
    assert_eq!(ay[0].raw, r##"ab(?=c)"#"##);
    assert_eq!(ay[0].feature, FancyFeature::PositiveLookahead);
}

#[test]
fn report_lists_sections_in_path_order() {
    let dir = fixture();
    let root = dir.path();
    let (result, _) = scan_tree(root, &ScanOptions::default()).expect("scan");
    let at = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).single().expect("time");
    let text = render_markdown(&result, &at);

    let a = text.find(&format!("## `{}`", key(root, "a/y.rs"))).expect("a section");
    let b = text.find(&format!("## `{}`", key(root, "b/x.rs"))).expect("b section");
    assert!(a < b);
    assert!(text.contains("| destructive | `wipe_all` | Found '\\1' |"));
    assert!(text.contains("| safe | `UNNAMED` | Found '(?<!' |"));
    assert!(!text.contains("clean.rs"));
    assert!(!text.contains("ignored"));
}

#[test]
fn unreadable_file_does_not_abort_scan() {
    let dir = fixture();
    let root = dir.path();
    write(root, "a/broken.rs", [0xff, 0xfe, b'(', b'?', b'=', 0xc3]);

    let (result, stats) = scan_tree(root, &ScanOptions::default()).expect("scan");
    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.files_scanned, 3);
    assert_eq!(result.file_count(), 2);
    assert!(result.get(&key(root, "a/broken.rs")).is_none());
}

#[test]
fn extension_and_size_filters_apply() {
    let dir = fixture();
    let root = dir.path();

    let opts = ScanOptions { extension: ".txt".into(), ..ScanOptions::default() };
    let (result, _) = scan_tree(root, &opts).expect("scan");
    assert_eq!(result.file_count(), 1);
    assert!(result.get(&key(root, "notes.txt")).is_some());

    let opts = ScanOptions { max_file_size: Some(60), ..ScanOptions::default() };
    let (result, stats) = scan_tree(root, &opts).expect("scan");
    assert_eq!(stats.files_skipped, 1);
    assert!(result.get(&key(root, "b/x.rs")).is_none());
}

#[test]
fn every_subdirectory_is_visited_by_default() {
    let dir = fixture();
    let root = dir.path();
    write(root, "target/gen.rs", r#"destructive_pattern!(r"(?=a)")"#);
    write(root, ".git/hooks.rs", r#"safe_pattern!(r"(?!b)")"#);

    let (result, _) = scan_tree(root, &ScanOptions::default()).expect("scan");
    assert!(result.get(&key(root, "target/gen.rs")).is_some());
    assert!(result.get(&key(root, ".git/hooks.rs")).is_some());
    assert_eq!(result.file_count(), 4);
}

#[test]
fn excluded_directories_are_opt_in() {
    let dir = fixture();
    let root = dir.path();
    write(root, "target/gen.rs", r#"destructive_pattern!(r"(?=a)")"#);

    let opts = ScanOptions { excluded_dirs: vec!["target".into()], ..ScanOptions::default() };
    let (result, stats) = scan_tree(root, &opts).expect("scan");
    assert!(result.get(&key(root, "target/gen.rs")).is_none());
    assert_eq!(stats.files_scanned, 3);
}

#[cfg(unix)]
#[test]
fn symlinked_files_are_scanned() {
    let dir = fixture();
    let root = dir.path();
    let real = tempfile::tempdir().expect("link target dir");
    write(real.path(), "real.rs", r#"safe_pattern!("linked", r"(?=a)")"#);
    std::os::unix::fs::symlink(real.path().join("real.rs"), root.join("link.rs")).expect("symlink");

    let (result, _) = scan_tree(root, &ScanOptions::default()).expect("scan");
    let linked = result.get(&key(root, "link.rs")).expect("symlink findings");
    assert_eq!(linked[0].display_name(), "linked");
    assert_eq!(linked[0].feature, FancyFeature::PositiveLookahead);
}

#[test]
fn parallel_scan_matches_serial_scan() {
    let dir = fixture();
    let root = dir.path();
    for i in 0..20 {
        write(root, &format!("many/f{i:02}.rs"), format!("safe_pattern!(\"p{i}\", r\"(x)\\{}\")", i % 9 + 1));
    }

    let (serial, serial_stats) = scan_tree(root, &ScanOptions::default()).expect("serial");
    let opts = ScanOptions { threads: Some(4), ..ScanOptions::default() };
    let (parallel, parallel_stats) = scan_tree(root, &opts).expect("parallel");

    assert_eq!(serial, parallel);
    assert_eq!(serial_stats, parallel_stats);
    assert_eq!(serial.file_count(), 22);
}

#[test]
fn repeated_runs_differ_only_in_timestamp() {
    let dir = fixture();
    let root = dir.path();
    let out = tempfile::tempdir().expect("out dir");
    let report = out.path().join("docs").join("pattern_audit.md");

    scan_and_write(root, &report, &ScanOptions::default(), ReportFormat::Markdown).expect("first run");
    let first = fs::read_to_string(&report).expect("read first");
    scan_and_write(root, &report, &ScanOptions::default(), ReportFormat::Markdown).expect("second run");
    let second = fs::read_to_string(&report).expect("read second");

    let strip = |s: &str| -> Vec<String> {
        s.lines().filter(|l| !l.starts_with("Generated: ")).map(str::to_string).collect()
    };
    assert_eq!(strip(&first), strip(&second));
    assert!(first.starts_with("# Pattern Audit Report\nGenerated: "));
}

#[test]
fn missing_root_produces_header_only_report() {
    let out = tempfile::tempdir().expect("out dir");
    let report = out.path().join("audit.md");
    let stats = scan_and_write(
        &out.path().join("no-such-dir"),
        &report,
        &ScanOptions::default(),
        ReportFormat::Markdown,
    )
    .expect("run");

    assert_eq!(stats.files_scanned, 0);
    let text = fs::read_to_string(&report).expect("read");
    assert_eq!(text.trim_end().lines().count(), 2);
    assert!(!text.contains("## "));
}

#[test]
fn json_format_is_written() {
    let dir = fixture();
    let out = tempfile::tempdir().expect("out dir");
    let report = out.path().join("audit.json");
    scan_and_write(dir.path(), &report, &ScanOptions::default(), ReportFormat::Json).expect("run");

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).expect("read")).expect("json");
    let files = v["files"].as_object().expect("files object");
    assert_eq!(files.len(), 2);
}
