//! Step outputs for GitHub Actions.
//!
//! When the CLI runs inside a workflow, `GITHUB_OUTPUT` names a file that
//! collects `key=value` lines for later steps.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use digest_lib::DigestResult;

/// `key=value` pairs reported for a finished run.
pub fn output_lines(result: &DigestResult) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("activity_count", result.activity_count.to_string()),
        ("posted", result.posted.to_string()),
    ];
    if let Some(url) = &result.discussion_url {
        lines.push(("discussion_url", url.clone()));
    }
    if let Some(reason) = result.skip_reason {
        lines.push(("skip_reason", reason.to_string()));
    }
    lines
}

/// Appends the run's outputs to the file at `path`.
pub fn append_outputs(path: &Path, result: &DigestResult) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (key, value) in output_lines(result) {
        writeln!(file, "{}={}", key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_lib::SkipReason;

    fn posted() -> DigestResult {
        DigestResult {
            posted: true,
            activity_count: 5,
            discussion_url: Some("https://github.com/o/r/discussions/3".to_string()),
            title: Some("Community Digest: March 8, 2024".to_string()),
            markdown: Some("body".to_string()),
            skip_reason: None,
        }
    }

    #[test]
    fn posted_run_reports_url() {
        let lines = output_lines(&posted());
        assert_eq!(
            lines,
            vec![
                ("activity_count", "5".to_string()),
                ("posted", "true".to_string()),
                ("discussion_url", "https://github.com/o/r/discussions/3".to_string()),
            ]
        );
    }

    #[test]
    fn skipped_run_reports_reason() {
        let result = DigestResult {
            posted: false,
            activity_count: 1,
            discussion_url: None,
            title: None,
            markdown: None,
            skip_reason: Some(SkipReason::BelowThreshold),
        };

        let lines = output_lines(&result);
        assert!(lines.contains(&("posted", "false".to_string())));
        assert!(lines.contains(&("skip_reason", "below_threshold".to_string())));
        assert!(!lines.iter().any(|(k, _)| *k == "discussion_url"));
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        append_outputs(&path, &posted()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "earlier=1\nactivity_count=5\nposted=true\ndiscussion_url=https://github.com/o/r/discussions/3\n"
        );
    }
}
