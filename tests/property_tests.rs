//! Property-based tests for parsing, resolution and URL derivation.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::fs;
use std::io::Read;

use proptest::prelude::*;
use tempfile::TempDir;

use faultline::bundle::{entry_name, zip_directory};
use faultline::core::types::{FailureRecord, FiledIssue, IssueTypeEntry, NO_DETAILS, NO_MESSAGE};
use faultline::report::parse_report;
use faultline::tracker::match_issue_type;
use faultline::ui::output::Verbosity;

/// What a generated test case carries.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    Pass,
    Failure,
    Error,
    Both,
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Pass),
        Just(Outcome::Failure),
        Just(Outcome::Error),
        Just(Outcome::Both),
    ]
}

fn render_suite(cases: &[Outcome]) -> String {
    let mut xml = String::from("<testsuite name=\"Generated\">\n");
    for (i, case) in cases.iter().enumerate() {
        let body = match case {
            Outcome::Pass => "",
            Outcome::Failure => "<failure message=\"f\">trace</failure>",
            Outcome::Error => "<error message=\"e\"/>",
            Outcome::Both => "<error message=\"e\"/><failure message=\"f\"/>",
        };
        xml.push_str(&format!(
            "  <testcase classname=\"Gen\" name=\"case{}\" time=\"0.1\">{}</testcase>\n",
            i, body
        ));
    }
    xml.push_str("</testsuite>");
    xml
}

/// Strategy for issue keys like `QA-123`.
fn issue_key() -> impl Strategy<Value = String> {
    ("[A-Z][A-Z0-9]{0,9}", 1u32..100_000).prop_map(|(project, n)| format!("{}-{}", project, n))
}

/// Strategy for tracker base URLs without a trailing slash.
fn base_url() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", prop::option::of("/[a-z]{1,8}"))
        .prop_map(|(host, path)| format!("https://{}.example.com{}", host, path.unwrap_or_default()))
}

proptest! {
    /// One record per case with a marker; a case with both is counted once.
    #[test]
    fn parse_count_matches_marked_cases(cases in prop::collection::vec(outcome(), 0..40)) {
        let expected = cases.iter().filter(|c| !matches!(c, Outcome::Pass)).count();
        let failures = parse_report(&render_suite(&cases)).unwrap();
        prop_assert_eq!(failures.len(), expected);
    }

    /// Failure wins whenever both markers are present.
    #[test]
    fn failure_marker_takes_precedence(cases in prop::collection::vec(outcome(), 1..20)) {
        let failures = parse_report(&render_suite(&cases)).unwrap();
        let marked = cases.iter().filter(|c| !matches!(c, Outcome::Pass));
        for (case, record) in marked.zip(failures.iter()) {
            let expected = match case {
                Outcome::Error => "e",
                _ => "f",
            };
            prop_assert_eq!(record.message.as_str(), expected);
        }
    }

    /// Blank text always becomes the placeholder.
    #[test]
    fn blank_text_uses_placeholders(ws in "[ \t\n]{0,8}") {
        let record = FailureRecord::new("C", "m", "0", Some(ws.as_str()), Some(ws.as_str()));
        prop_assert_eq!(record.message, NO_MESSAGE);
        prop_assert_eq!(record.details, NO_DETAILS);
    }

    /// Browse URL is base + "/browse/" + key for every key.
    #[test]
    fn browse_url_derivation(base in base_url(), key in issue_key()) {
        let issue = FiledIssue::from_key(&base, key.clone());
        prop_assert_eq!(issue.url, format!("{}/browse/{}", base, key));
        prop_assert_eq!(issue.key, key);
    }

    /// Name matching ignores case for Latin, accented Latin and Cyrillic names.
    #[test]
    fn issue_type_match_ignores_case(name in "[A-Za-zÀ-ÖØ-Þà-öø-þА-яЁё]{1,16}", flip in any::<bool>()) {
        let types = vec![
            IssueTypeEntry::new("1", "Sub-task"),
            IssueTypeEntry::new("42", name.clone()),
        ];
        let query = if flip { name.to_uppercase() } else { name.to_lowercase() };
        prop_assert_eq!(match_issue_type(&types, "QA", &query).unwrap(), "42");
    }

    /// Without a match, every available name appears in the error.
    #[test]
    fn unknown_issue_type_names_all_choices(names in prop::collection::vec("[A-Z][a-z]{2,8}", 1..6)) {
        let types: Vec<IssueTypeEntry> = names
            .iter()
            .enumerate()
            .map(|(i, n)| IssueTypeEntry::new(i.to_string(), n.clone()))
            .collect();
        let err = match_issue_type(&types, "QA", "zz-no-such-type").unwrap_err();
        let message = err.to_string();
        for name in &names {
            prop_assert!(message.contains(name.as_str()));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// N files spread over nested directories give exactly N slash-separated entries.
    #[test]
    fn directory_archive_has_one_entry_per_file(
        files in prop::collection::btree_set("[a-z]{1,6}(/[a-z]{1,6}){0,2}", 1..10),
        empty_dirs in prop::collection::vec("[a-z]{1,6}", 0..3),
    ) {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("evidence");
        fs::create_dir_all(&source).unwrap();

        let mut written = Vec::new();
        for file in &files {
            let path = source.join(format!("{}.txt", file));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file.as_bytes()).unwrap();
            written.push(format!("{}.txt", file));
        }
        for dir in &empty_dirs {
            fs::create_dir_all(source.join(format!("empty-{}", dir))).unwrap();
        }

        let archive = temp.path().join("out.zip");
        let count = zip_directory(&source, &archive, Verbosity::Quiet).unwrap();
        prop_assert_eq!(count, Some(written.len()));

        let mut zip = zip::ZipArchive::new(fs::File::open(&archive).unwrap()).unwrap();
        let mut names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        written.sort();
        prop_assert_eq!(&names, &written);

        for name in &names {
            prop_assert!(!name.contains('\\'));
            let mut contents = String::new();
            zip.by_name(name).unwrap().read_to_string(&mut contents).unwrap();
            prop_assert_eq!(format!("{}.txt", contents), name.clone());
        }
    }
}

#[test]
fn entry_names_use_forward_slashes() {
    let path: std::path::PathBuf = ["a", "b", "c.png"].iter().collect();
    assert_eq!(entry_name(&path), "a/b/c.png");
}
