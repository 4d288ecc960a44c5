use crate::config::CategoryFragments;
use crate::types::{Article, FALLBACK_CATEGORY};

/// Picks a single category for an article from its matched keywords.
///
/// Each category counts how many matched keywords contain any of its fragments
/// (case-insensitive). The highest count wins; on a tie the category declared
/// first in the configuration wins. A best count of zero yields
/// [`FALLBACK_CATEGORY`].
pub struct Categorizer {
    categories: Vec<(String, Vec<String>)>,
}

impl Categorizer {
    pub fn new(categories: &CategoryFragments) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|(label, fragments)| {
                    (label.clone(), fragments.iter().map(|f| f.to_lowercase()).collect())
                })
                .collect(),
        }
    }

    pub fn categorize(&self, matched_keywords: &[String]) -> String {
        let lowered: Vec<String> = matched_keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut best: Option<(&str, usize)> = None;
        for (label, fragments) in &self.categories {
            let count = lowered
                .iter()
                .filter(|keyword| fragments.iter().any(|fragment| keyword.contains(fragment.as_str())))
                .count();

            // strict '>' keeps the earliest category on ties
            if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((label.as_str(), count));
            }
        }

        best.map(|(label, _)| label.to_string())
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
    }

    pub fn assign(&self, mut article: Article) -> Article {
        article.category = self.categorize(&article.matched_keywords);
        article
    }
}
