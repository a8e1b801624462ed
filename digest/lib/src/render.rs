//! Markdown rendering for a digest.
//!
//! Everything here is a pure function of its inputs: the same data and
//! configuration always produce byte-identical output.

use chrono::{DateTime, Utc};

use crate::config::DigestConfig;
use crate::types::{Contributor, DigestData, MergedChange};

const NO_MERGED_CHANGES: &str = "_No pull requests were merged in this period._";
const NO_NEW_CONTRIBUTORS: &str = "_No new contributors in this period._";

/// Calendar date label such as `March 8, 2024`.
fn date_label(ts: DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y").to_string()
}

/// Title for the digest discussion.
///
/// ## Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use digest_lib::generate_title;
///
/// let end = Utc.with_ymd_and_hms(2024, 3, 8, 17, 45, 0).unwrap();
/// assert_eq!(generate_title(end), "Community Digest: March 8, 2024");
/// ```
pub fn generate_title(period_end: DateTime<Utc>) -> String {
    format!("Community Digest: {}", date_label(period_end))
}

/// Merged pull requests plus new contributors.
pub fn calculate_activity_count(data: &DigestData) -> usize {
    data.merged_changes.len() + data.new_contributors.len()
}

/// Renders the digest body as markdown.
///
/// Both sections are always present; an empty list is replaced by an explicit
/// "none in this period" line.
pub fn render_digest(data: &DigestData, config: &DigestConfig) -> String {
    let mut out = String::new();

    out.push_str("## Community Digest\n\n");
    out.push_str(&format!(
        "Here's what happened in **{}** between **{}** and **{}**.\n\n",
        config.repo,
        date_label(data.period_start),
        date_label(data.period_end)
    ));

    out.push_str(&format!(
        "### 🚀 Merged Pull Requests ({})\n\n",
        data.merged_changes.len()
    ));
    if data.merged_changes.is_empty() {
        out.push_str(NO_MERGED_CHANGES);
        out.push('\n');
    } else {
        for change in &data.merged_changes {
            out.push_str(&merged_change_line(change));
        }
    }
    out.push('\n');

    out.push_str(&format!(
        "### 🎉 New Contributors ({})\n\n",
        data.new_contributors.len()
    ));
    if data.new_contributors.is_empty() {
        out.push_str(NO_NEW_CONTRIBUTORS);
        out.push('\n');
    } else {
        for contributor in &data.new_contributors {
            out.push_str(&contributor_line(contributor));
        }
        out.push_str("\nWelcome aboard, and thank you for contributing!\n");
    }

    if config.footer_star_link {
        out.push_str(&format!(
            "\n---\n\n⭐ Enjoying {}? [Star the repository]({}) to show your support!\n",
            escape_link_text(&config.repo.name),
            config.repo.html_url()
        ));
    }

    out
}

fn merged_change_line(change: &MergedChange) -> String {
    format!(
        "- [#{} {}]({}) by [@{}]({})\n",
        change.number,
        escape_link_text(&change.title),
        change.url,
        escape_link_text(&change.author),
        change.author_url
    )
}

fn contributor_line(contributor: &Contributor) -> String {
    format!(
        "- [@{}]({}) made their first contribution in [#{} {}]({})\n",
        escape_link_text(&contributor.login),
        contributor.url,
        contributor.pr_number,
        escape_link_text(&contributor.pr_title),
        contributor.pr_url
    )
}

/// Escapes characters that would end or nest markdown link text.
fn escape_link_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoRef;
    use chrono::TimeZone;
    use pulldown_cmark::{Event, Parser, Tag};

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
    }

    fn change(number: u64, author: &str) -> MergedChange {
        MergedChange {
            number,
            title: format!("Change {}", number),
            url: format!("https://github.com/octo/demo/pull/{}", number),
            author: author.to_string(),
            author_url: format!("https://github.com/{}", author),
            merged_at: end(),
        }
    }

    fn data(changes: Vec<MergedChange>, contributors: Vec<Contributor>) -> DigestData {
        DigestData {
            merged_changes: changes,
            new_contributors: contributors,
            period_start: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            period_end: end(),
        }
    }

    fn config() -> DigestConfig {
        DigestConfig::new(RepoRef::new("octo", "demo"), "General")
    }

    fn link_targets(markdown: &str) -> Vec<String> {
        Parser::new(markdown)
            .filter_map(|event| match event {
                Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn title_uses_calendar_date() {
        assert_eq!(generate_title(end()), "Community Digest: March 8, 2024");
        assert_eq!(generate_title(end()), generate_title(end()));
    }

    #[test]
    fn activity_count_sums_both_lists() {
        let d = data(
            vec![change(1, "a"), change(2, "b")],
            vec![Contributor::from_change(&change(2, "b"))],
        );
        assert_eq!(calculate_activity_count(&d), 3);
        assert_eq!(calculate_activity_count(&data(vec![], vec![])), 0);
    }

    #[test]
    fn lists_changes_and_contributors_as_links() {
        let changes = vec![change(3, "alice"), change(2, "bob"), change(1, "carol")];
        let contributors = vec![Contributor::from_change(&changes[2])];
        let markdown = render_digest(&data(changes, contributors), &config());

        assert!(markdown.contains("### 🚀 Merged Pull Requests (3)"));
        assert!(markdown.contains("### 🎉 New Contributors (1)"));
        assert!(markdown.contains(
            "- [#3 Change 3](https://github.com/octo/demo/pull/3) by [@alice](https://github.com/alice)"
        ));
        assert!(markdown.contains(
            "- [@carol](https://github.com/carol) made their first contribution in [#1 Change 1](https://github.com/octo/demo/pull/1)"
        ));
        assert!(markdown.contains("between **March 1, 2024** and **March 8, 2024**"));

        let links = link_targets(&markdown);
        assert_eq!(links.len(), 3 * 2 + 2 + 1);
        assert_eq!(links.last().unwrap(), "https://github.com/octo/demo");
    }

    #[test]
    fn empty_sections_say_so() {
        let markdown = render_digest(&data(vec![], vec![]), &config());

        assert!(markdown.contains("### 🚀 Merged Pull Requests (0)"));
        assert!(markdown.contains(NO_MERGED_CHANGES));
        assert!(markdown.contains("### 🎉 New Contributors (0)"));
        assert!(markdown.contains(NO_NEW_CONTRIBUTORS));
    }

    #[test]
    fn footer_is_optional() {
        let d = data(vec![change(1, "a")], vec![]);

        let with_footer = render_digest(&d, &config());
        let without_footer = render_digest(&d, &config().with_footer_star_link(false));

        assert!(with_footer.contains("[Star the repository](https://github.com/octo/demo)"));
        assert!(!without_footer.contains("Star the repository"));
        assert!(!without_footer.contains("---"));
    }

    #[test]
    fn brackets_in_titles_do_not_break_links() {
        let mut tricky = change(5, "dev");
        tricky.title = "[WIP] fix ] parser \\ edge".to_string();
        let markdown = render_digest(&data(vec![tricky], vec![]), &config().with_footer_star_link(false));

        assert!(markdown.contains(r"[#5 \[WIP\] fix \] parser \\ edge]"));
        assert_eq!(
            link_targets(&markdown),
            vec![
                "https://github.com/octo/demo/pull/5".to_string(),
                "https://github.com/dev".to_string()
            ]
        );
    }

    #[test]
    fn rendering_is_pure() {
        let d = data(
            vec![change(2, "a"), change(1, "b")],
            vec![Contributor::from_change(&change(1, "b"))],
        );
        assert_eq!(render_digest(&d, &config()), render_digest(&d, &config()));
    }
}
