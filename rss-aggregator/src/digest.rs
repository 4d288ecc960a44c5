use crate::types::{Article, DigestOutput};
use crate::utils::text::{escape_html, truncate_with_ellipsis};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Order in which category groups appear in a digest.
///
/// This is a closed set: articles whose category is not listed here are left
/// out of the rendered digest. Categories added to the configuration must also
/// be added here to show up.
pub const CATEGORY_DISPLAY_ORDER: [&str; 6] = [
    "Higher Ed Specific",
    "Strategy & Leadership",
    "Policy & Governance",
    "Enterprise Tech",
    "AI/ML Developments",
    "General",
];

pub const SUMMARY_DISPLAY_CHARS: usize = 300;
pub const MAX_DISPLAY_KEYWORDS: usize = 5;

pub const DIGEST_TITLE: &str = "Enterprise AI Daily Briefing";
pub const NO_ARTICLES_MESSAGE: &str = "No high-relevance articles found today. Check back tomorrow!";

const RULE_WIDTH: usize = 60;
const SECTION_RULE_WIDTH: usize = 40;

const STYLESHEET: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; line-height: 1.6; color: #333; max-width: 700px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
        .container { background-color: white; border-radius: 8px; padding: 30px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #1a365d; border-bottom: 3px solid #3182ce; padding-bottom: 10px; margin-bottom: 5px; }
        .subtitle { color: #666; font-size: 14px; margin-bottom: 25px; }
        h2 { color: #2c5282; font-size: 18px; margin-top: 30px; margin-bottom: 15px; padding: 8px 12px; background-color: #ebf8ff; border-left: 4px solid #3182ce; border-radius: 0 4px 4px 0; }
        .article { margin-bottom: 20px; padding-bottom: 15px; border-bottom: 1px solid #e2e8f0; }
        .article:last-child { border-bottom: none; }
        .article-title { font-size: 16px; font-weight: 600; margin-bottom: 5px; }
        .article-title a { color: #2b6cb0; text-decoration: none; }
        .article-title a:hover { text-decoration: underline; }
        .article-meta { font-size: 12px; color: #718096; margin-bottom: 8px; }
        .source { background-color: #e2e8f0; padding: 2px 8px; border-radius: 12px; font-weight: 500; }
        .score { color: #38a169; font-weight: 600; }
        .summary { font-size: 14px; color: #4a5568; }
        .keywords { font-size: 11px; color: #a0aec0; margin-top: 5px; }
        .footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #e2e8f0; font-size: 12px; color: #a0aec0; text-align: center; }
        .no-articles { color: #718096; font-style: italic; padding: 20px; text-align: center; }
"#;

/// Renders ranked articles into the HTML and plain-text digests.
///
/// Both renderings depend only on the article list and `generated_at`.
pub struct DigestRenderer;

impl DigestRenderer {
    pub fn render(articles: &[Article], generated_at: DateTime<Utc>) -> DigestOutput {
        DigestOutput {
            subject: Self::subject(generated_at),
            html: Self::render_html(articles, generated_at),
            text: Self::render_text(articles, generated_at),
            article_count: articles.len(),
            generated_at,
        }
    }

    pub fn subject(generated_at: DateTime<Utc>) -> String {
        format!("🎯 Enterprise AI Briefing - {}", generated_at.format("%b %d, %Y"))
    }

    pub fn render_html(articles: &[Article], generated_at: DateTime<Utc>) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n");
        html.push_str(&format!("    <title>{}</title>\n", DIGEST_TITLE));
        html.push_str("    <style>");
        html.push_str(STYLESHEET);
        html.push_str("    </style>\n</head>\n<body>\n    <div class=\"container\">\n");
        html.push_str(&format!("        <h1>🎯 {}</h1>\n", DIGEST_TITLE));
        html.push_str(&format!(
            "        <div class=\"subtitle\">\n            Higher Education Focus • {} • {} high-signal items\n        </div>\n",
            long_date(generated_at),
            articles.len()
        ));

        if articles.is_empty() {
            html.push_str(&format!("        <div class=\"no-articles\">{}</div>\n", NO_ARTICLES_MESSAGE));
        } else {
            for (category, group) in group_by_category(articles) {
                html.push_str(&format!("        <h2>{}</h2>\n", escape_html(category)));
                for article in group {
                    html.push_str(&render_html_article(article));
                }
            }
        }

        html.push_str(
            "        <div class=\"footer\">\n            Generated by Enterprise AI News Aggregator<br>\n            \
             Focused on: AI Strategy • Policy • Higher Education • Enterprise Deployment\n        </div>\n",
        );
        html.push_str("    </div>\n</body>\n</html>\n");
        html
    }

    pub fn render_text(articles: &[Article], generated_at: DateTime<Utc>) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut lines = vec![
            rule.clone(),
            DIGEST_TITLE.to_uppercase(),
            format!("Higher Education Focus • {}", long_date(generated_at)),
            format!("{} high-signal items", articles.len()),
            rule.clone(),
            String::new(),
        ];

        if articles.is_empty() {
            lines.push(NO_ARTICLES_MESSAGE.to_string());
        } else {
            for (category, group) in group_by_category(articles) {
                lines.push(format!("\n▸ {}", category.to_uppercase()));
                lines.push("-".repeat(SECTION_RULE_WIDTH));

                for article in group {
                    lines.push(format!("\n• {}", article.title));
                    lines.push(format!(
                        "  [{}] {} | Score: {}",
                        article.source,
                        published_label(article, "%b %d"),
                        display_score(article.relevance_score)
                    ));
                    lines.push(format!("  {}", article.link));
                    if !article.summary.is_empty() {
                        lines.push(format!("  {}", truncate_with_ellipsis(&article.summary, SUMMARY_DISPLAY_CHARS)));
                    }
                    if !article.matched_keywords.is_empty() {
                        lines.push(format!("  Tags: {}", display_keywords(article)));
                    }
                }
            }
        }

        lines.push(format!("\n{}", rule));
        lines.join("\n")
    }
}

/// Groups articles by category in [`CATEGORY_DISPLAY_ORDER`], keeping input
/// order inside each group. Empty groups and unlisted categories are omitted.
pub fn group_by_category(articles: &[Article]) -> Vec<(&'static str, Vec<&Article>)> {
    let mut by_category: HashMap<&str, Vec<&Article>> = HashMap::new();
    for article in articles {
        by_category.entry(article.category.as_str()).or_default().push(article);
    }

    let groups: Vec<(&'static str, Vec<&Article>)> = CATEGORY_DISPLAY_ORDER
        .iter()
        .filter_map(|category| by_category.remove(category).map(|group| (*category, group)))
        .collect();

    for (category, group) in &by_category {
        warn!(
            "Category {:?} is not in the display order; {} article(s) left out of the digest",
            category,
            group.len()
        );
    }
    debug!("Rendering {} category groups", groups.len());

    groups
}

fn render_html_article(article: &Article) -> String {
    let summary = truncate_with_ellipsis(&article.summary, SUMMARY_DISPLAY_CHARS);
    format!(
        r#"
        <div class="article">
            <div class="article-title">
                <a href="{link}" target="_blank">{title}</a>
            </div>
            <div class="article-meta">
                <span class="source">{source}</span> • {published} •
                <span class="score">Relevance: {score}</span>
            </div>
            <div class="summary">{summary}</div>
            <div class="keywords">Tags: {keywords}</div>
        </div>
"#,
        link = escape_html(&article.link),
        title = escape_html(&article.title),
        source = escape_html(&article.source),
        published = published_label(article, "%b %d, %I:%M %p"),
        score = display_score(article.relevance_score),
        summary = escape_html(&summary),
        keywords = escape_html(&display_keywords(article)),
    )
}

fn long_date(at: DateTime<Utc>) -> String {
    at.format("%A, %B %d, %Y").to_string()
}

fn published_label(article: &Article, format: &str) -> String {
    article
        .published
        .map(|published| published.format(format).to_string())
        .unwrap_or_else(|| "Recent".to_string())
}

/// Scores show as whole numbers, halves rounded to even.
fn display_score(score: f64) -> String {
    format!("{:.0}", score)
}

fn display_keywords(article: &Article) -> String {
    article
        .matched_keywords
        .iter()
        .take(MAX_DISPLAY_KEYWORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap()
    }

    fn article(title: &str, category: &str, score: f64) -> Article {
        let mut article = Article::new(title, format!("https://news.example.edu/{}", title), "Campus Wire")
            .with_summary("Short summary.");
        article.category = category.to_string();
        article.relevance_score = score;
        article.matched_keywords = vec!["AI".to_string()];
        article
    }

    #[test]
    fn half_scores_round_to_even() {
        assert_eq!(display_score(2.5), "2");
        assert_eq!(display_score(3.5), "4");
        assert_eq!(display_score(4.5), "4");
        assert_eq!(display_score(14.5), "14");
        assert_eq!(display_score(17.0), "17");

        let text = DigestRenderer::render_text(&[article("Microsoft briefing", "Enterprise Tech", 4.5)], at());
        assert!(text.contains("| Score: 4\n"));
    }

    #[test]
    fn empty_digest_has_placeholder_in_both_formats() {
        let html = DigestRenderer::render_html(&[], at());
        let text = DigestRenderer::render_text(&[], at());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains(NO_ARTICLES_MESSAGE));
        assert!(html.contains("0 high-signal items"));
        assert!(text.contains(NO_ARTICLES_MESSAGE));
        assert!(!html.contains("<h2>"));
    }

    #[test]
    fn groups_follow_display_order_not_input_order() {
        let articles = vec![
            article("general-1", "General", 20.0),
            article("policy-1", "Policy & Governance", 15.0),
            article("higher-ed-1", "Higher Ed Specific", 10.0),
            article("policy-2", "Policy & Governance", 9.0),
        ];
        let html = DigestRenderer::render_html(&articles, at());

        let higher_ed = html.find("<h2>Higher Ed Specific</h2>").unwrap();
        let policy = html.find("<h2>Policy &amp; Governance</h2>").unwrap();
        let general = html.find("<h2>General</h2>").unwrap();
        assert!(higher_ed < policy && policy < general);

        let policy_1 = html.find("policy-1").unwrap();
        let policy_2 = html.find("policy-2").unwrap();
        assert!(policy_1 < policy_2);
    }

    #[test]
    fn unlisted_categories_are_left_out() {
        let articles = vec![article("kept", "General", 9.0), article("dropped", "Sports", 30.0)];
        let groups = group_by_category(&articles);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "General");
        assert!(!DigestRenderer::render_text(&articles, at()).contains("dropped"));
    }

    #[test]
    fn article_block_shows_meta_summary_and_tags() {
        let mut item = article("ai-policy", "Policy & Governance", 14.6);
        item.published = Some(Utc.with_ymd_and_hms(2026, 3, 9, 15, 45, 0).unwrap());
        item.summary = "x".repeat(320);
        item.matched_keywords = ["a", "b", "c", "d", "e", "f"].iter().map(|s| s.to_string()).collect();

        let html = DigestRenderer::render_html(&[item], at());

        assert!(html.contains(r#"<a href="https://news.example.edu/ai-policy" target="_blank">ai-policy</a>"#));
        assert!(html.contains("Mar 09, 03:45 PM"));
        assert!(html.contains("Relevance: 15"));
        assert!(html.contains(&format!("{}...", "x".repeat(300))));
        assert!(!html.contains(&"x".repeat(301)));
        assert!(html.contains("Tags: a, b, c, d, e</div>"));
    }

    #[test]
    fn undated_articles_show_recent() {
        let text = DigestRenderer::render_text(&[article("undated", "General", 6.0)], at());
        assert!(text.contains("[Campus Wire] Recent | Score: 6"));
    }

    #[test]
    fn markup_in_feed_text_is_escaped() {
        let mut item = article("x", "General", 6.0);
        item.title = "Q&A: <script>alert(1)</script>".to_string();
        let html = DigestRenderer::render_html(&[item], at());

        assert!(html.contains("Q&amp;A: &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn text_digest_layout() {
        let text = DigestRenderer::render_text(&[article("headline", "Enterprise Tech", 11.0)], at());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[1], "ENTERPRISE AI DAILY BRIEFING");
        assert_eq!(lines[2], "Higher Education Focus • Tuesday, March 10, 2026");
        assert_eq!(lines[3], "1 high-signal items");
        assert!(text.contains("▸ ENTERPRISE TECH\n----------------------------------------"));
        assert!(text.contains("• headline\n  [Campus Wire] Recent | Score: 11\n  https://news.example.edu/headline"));
        assert!(text.ends_with(&"=".repeat(60)));
    }

    #[test]
    fn rendering_is_repeatable_for_same_input_and_time() {
        let articles = vec![article("a", "General", 8.0), article("b", "Enterprise Tech", 7.0)];
        let first = DigestRenderer::render(&articles, at());
        let second = DigestRenderer::render(&articles, at());

        assert_eq!(first.html, second.html);
        assert_eq!(first.text, second.text);
        assert_eq!(first.subject, "🎯 Enterprise AI Briefing - Mar 10, 2026");
        assert_eq!(first.article_count, 2);
    }
}
