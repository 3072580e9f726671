use std::collections::HashSet;

use crate::bookmarks::ToggleOutcome;
use crate::models::Article;

const RULE: &str = "────────────────────────────────────────";
const DESCRIPTION_LINES: usize = 3;

/// One entry per article: bookmark marker, title, up to three lines of
/// description, then source and date.
pub fn render_list(articles: &[Article], bookmarked: &HashSet<String>, width: usize) -> String {
    if articles.is_empty() {
        return "No articles\n".to_string();
    }

    let mut out = String::new();
    for article in articles {
        let marker = if bookmarked.contains(&article.article_id) {
            "[*]"
        } else {
            "[ ]"
        };
        let options = textwrap::Options::new(width.saturating_sub(4).max(20))
            .subsequent_indent("    ");
        let title = textwrap::fill(article.display_title(), options);
        out.push_str(&format!("{} {}\n", marker, title));
        if let Some(ref description) = article.description {
            let wrapped = textwrap::wrap(description, width.saturating_sub(4).max(20));
            for line in wrapped.iter().take(DESCRIPTION_LINES) {
                out.push_str(&format!("    {}\n", line));
            }
        }
        out.push_str(&format!("    {}  ({})\n", meta_line(article), article.article_id));
    }
    out
}

/// Detail view of a single article.
pub fn render_article(article: &Article, bookmarked: bool, width: usize) -> String {
    let mut out = String::new();

    out.push_str(&textwrap::fill(article.display_title(), width));
    out.push('\n');
    out.push_str(&meta_line(article));
    if bookmarked {
        out.push_str("  [bookmarked]");
    }
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");

    if let Some(ref description) = article.description {
        out.push_str(&textwrap::fill(description, width));
        out.push_str("\n\n");
    }

    if let Some(ref content) = article.content {
        out.push_str(html2text::from_read(content.as_bytes(), width).trim_end());
        out.push_str("\n\n");
    }

    if let Some(ref link) = article.link {
        out.push_str(&format!("Read full article: {}\n", link));
    }
    out
}

/// Status line after a toggle. A failed save reads as not bookmarked.
pub fn render_toggle(outcome: ToggleOutcome, article: &Article) -> String {
    match outcome {
        ToggleOutcome::NowBookmarked => format!("Bookmarked: {}\n", article.display_title()),
        ToggleOutcome::NowUnbookmarked => {
            format!("Removed bookmark: {}\n", article.display_title())
        }
        ToggleOutcome::Failed => format!(
            "Not bookmarked: {} (bookmarks could not be saved)\n",
            article.display_title()
        ),
    }
}

fn meta_line(article: &Article) -> String {
    let source = article.source_id.as_deref().unwrap_or("unknown source");
    match article.published() {
        Some(published) => format!("{} · {}", source, published.format("%Y-%m-%d")),
        None => source.to_string(),
    }
}
