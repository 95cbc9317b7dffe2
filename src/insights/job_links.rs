//! Job-board search links built from provider keywords

use crate::config::JobLinksConfig;
use crate::error::{Result, ResumeFitError};
use crate::insights::{JobLinkFinder, ProviderError};
use async_trait::async_trait;
use reqwest::Url;

/// Builds one search URL per keyword and board, with the keyword in the `q`
/// query parameter. No network traffic.
#[derive(Debug, Clone)]
pub struct SearchLinkFinder {
    boards: Vec<Url>,
    max_links: usize,
}

impl SearchLinkFinder {
    pub fn new(search_urls: &[String], max_links: usize) -> Result<Self> {
        let boards = search_urls
            .iter()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| ResumeFitError::Configuration(format!("Invalid job search URL '{}': {}", raw, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { boards, max_links })
    }

    pub fn from_config(config: &JobLinksConfig) -> Result<Self> {
        Self::new(&config.search_urls, config.max_links)
    }

    pub fn links_for(&self, keywords: &[String]) -> Vec<String> {
        let mut links: Vec<String> = Vec::new();

        for keyword in keywords.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
            for board in &self.boards {
                if links.len() >= self.max_links {
                    return links;
                }

                let mut url = board.clone();
                url.query_pairs_mut().append_pair("q", keyword);
                let link = url.to_string();
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }

        links
    }
}

#[async_trait]
impl JobLinkFinder for SearchLinkFinder {
    async fn find_listings(&self, keywords: &[String]) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(self.links_for(keywords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder(max_links: usize) -> SearchLinkFinder {
        SearchLinkFinder::new(
            &[
                "https://jobs.example.com/search".to_string(),
                "https://board.example.org/find?remote=true".to_string(),
            ],
            max_links,
        )
        .unwrap()
    }

    #[test]
    fn test_links_are_encoded_per_board() {
        let links = finder(10).links_for(&["rust engineer".to_string()]);

        assert_eq!(
            links,
            vec![
                "https://jobs.example.com/search?q=rust+engineer",
                "https://board.example.org/find?remote=true&q=rust+engineer",
            ]
        );
    }

    #[test]
    fn test_links_capped() {
        let keywords = vec!["rust".to_string(), "tokio".to_string(), "axum".to_string()];
        assert_eq!(finder(3).links_for(&keywords).len(), 3);
        assert!(finder(0).links_for(&keywords).is_empty());
    }

    #[test]
    fn test_blank_keywords_skipped() {
        assert!(finder(5).links_for(&["  ".to_string()]).is_empty());
        assert!(finder(5).links_for(&[]).is_empty());
    }

    #[test]
    fn test_invalid_board_rejected() {
        let result = SearchLinkFinder::new(&["jobs dot com".to_string()], 5);
        assert!(matches!(result, Err(ResumeFitError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_find_listings() {
        let links = finder(2).find_listings(&["data engineer".to_string()]).await.unwrap();
        assert_eq!(links.len(), 2);
    }
}
