//! External tools Ajax can route a message through
//!
//! Tools are black boxes behind small traits so the chat layer can swap in
//! fakes. Image generation returns a URL; web search returns a handful of
//! titled results.

pub mod image;
pub mod search;

pub use image::OpenAiImageTool;
pub use search::DDGSearchTool;

use ajax_common::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Turns a prompt into a hosted image URL
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// One web search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Web search returning at most `limit` results
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// Render results as a plain-text block, one numbered entry per hit
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut entry = format!("{}. {} ({})", i + 1, r.title.trim(), r.link.trim());
            if !r.snippet.trim().is_empty() {
                entry.push_str("\n   ");
                entry.push_str(r.snippet.trim());
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_results() {
        let results = vec![
            SearchResult {
                title: "Tesla Q3".to_string(),
                link: "example.com/tsla".to_string(),
                snippet: "Deliveries up".to_string(),
            },
            SearchResult {
                title: "EV market".to_string(),
                link: "example.com/ev".to_string(),
                snippet: String::new(),
            },
        ];
        assert_eq!(
            format_results(&results),
            "1. Tesla Q3 (example.com/tsla)\n   Deliveries up\n2. EV market (example.com/ev)"
        );
    }

    #[test]
    fn test_format_empty_results() {
        assert_eq!(format_results(&[]), "No results found.");
    }
}
