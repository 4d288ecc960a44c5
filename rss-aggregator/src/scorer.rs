use crate::config::KeywordWeights;
use crate::types::Article;

/// Extra weight a keyword earns when it also appears in the title.
pub const TITLE_BONUS_FACTOR: f64 = 0.5;

/// Weighted keyword relevance. Keywords match case-insensitively as plain
/// substrings, so a fragment can hit inside an unrelated word.
pub struct Scorer {
    // (keyword as written, lowercase keyword, weight), in configuration order
    keywords: Vec<(String, String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relevance {
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

impl Scorer {
    pub fn new(keywords: &KeywordWeights) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|(keyword, weight)| (keyword.clone(), keyword.to_lowercase(), *weight))
                .collect(),
        }
    }

    pub fn evaluate(&self, title: &str, summary: &str) -> Relevance {
        let haystack = format!("{} {}", title, summary).to_lowercase();
        let title_lower = title.to_lowercase();

        let mut score = 0.0;
        let mut matched_keywords = Vec::new();

        for (keyword, keyword_lower, weight) in &self.keywords {
            if haystack.contains(keyword_lower.as_str()) {
                score += weight;
                matched_keywords.push(keyword.clone());
            }
        }

        // The title is a prefix of the haystack, so every title hit is already
        // in matched_keywords; the bonus only moves the score.
        for (_, keyword_lower, weight) in &self.keywords {
            if title_lower.contains(keyword_lower.as_str()) {
                score += weight * TITLE_BONUS_FACTOR;
            }
        }

        Relevance {
            score,
            matched_keywords,
        }
    }

    pub fn score(&self, mut article: Article) -> Article {
        let relevance = self.evaluate(&article.title, &article.summary);
        article.relevance_score = relevance.score;
        article.matched_keywords = relevance.matched_keywords;
        article
    }
}
