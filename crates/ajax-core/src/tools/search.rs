//! DuckDuckGo HTML search

use super::{SearchResult, WebSearch};
use ajax_common::{AjaxError, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, trace};

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
const MAX_RESULTS: usize = 10;

/// Scrapes the DuckDuckGo HTML endpoint
pub struct DDGSearchTool {
    client: reqwest::Client,
}

impl DDGSearchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for DDGSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AjaxError::Tool(format!("Bad selector {}: {}", css, e)))
}

/// Pull results out of a DuckDuckGo HTML page
pub fn parse_results(body: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(body);
    let result_selector = selector(".web-result")?;
    let title_selector = selector(".result__a")?;
    let url_selector = selector(".result__url")?;
    let snippet_selector = selector(".result__snippet")?;

    let results = document
        .select(&result_selector)
        .filter_map(|result| {
            let title = result
                .select(&title_selector)
                .next()
                .map(|n| n.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let link = result
                .select(&url_selector)
                .next()
                .map(|n| n.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let snippet = result
                .select(&snippet_selector)
                .next()
                .map(|n| n.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            if title.is_empty() || link.is_empty() {
                return None;
            }
            Some(SearchResult {
                title,
                link,
                snippet,
            })
        })
        .take(limit)
        .collect();
    Ok(results)
}

#[async_trait]
impl WebSearch for DDGSearchTool {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let limit = limit.clamp(1, MAX_RESULTS);
        debug!("Searching DuckDuckGo for '{}' ({} results)", query, limit);

        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", query)])
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("User-Agent", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:140.0) Gecko/20100101 Firefox/140.0")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| AjaxError::Tool(format!("Search request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AjaxError::Tool(format!("Search body error: {}", e)))?;
        if !status.is_success() {
            return Err(AjaxError::Tool(format!("Search returned {}", status)));
        }
        trace!("Search response body: {} characters", body.len());

        let results = parse_results(&body, limit)?;
        debug!("Parsed {} search results", results.len());
        Ok(results)
    }
}
