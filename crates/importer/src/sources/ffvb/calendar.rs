use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use tracing::info;

use crate::config::{BASE_URL, CALENDAR_URL_DELIMITER, COMPETITION_PATH, FfvbConfig};
use crate::traits::PageSource;
use crate::Result;

lazy_static! {
    /// Competition detail link up to and including the closing quote.
    static ref COMPETITION_URL: Regex = Regex::new(&format!(
        r"{}{}\?[^{delimiter}]*{delimiter}",
        regex::escape(BASE_URL),
        regex::escape(COMPETITION_PATH),
        delimiter = regex::escape(&CALENDAR_URL_DELIMITER.to_string()),
    ))
    .expect("competition URL pattern is valid");
}

/// Finds the competitions a club takes part in from its calendar page.
pub struct CalendarDiscovery<'a> {
    config: &'a FfvbConfig,
}

impl<'a> CalendarDiscovery<'a> {
    pub fn new(config: &'a FfvbConfig) -> Self {
        Self { config }
    }

    pub async fn discover(&self, source: &dyn PageSource) -> Result<Vec<String>> {
        let calendar = source.fetch(&self.config.calendar_url()).await?;
        let urls = extract_competition_urls(&calendar);

        info!(
            "Found {} competition(s) for club {}",
            urls.len(),
            self.config.club_id
        );
        Ok(urls)
    }
}

/// Distinct competition URLs of a calendar body, in order of appearance.
pub fn extract_competition_urls(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    COMPETITION_URL
        .find_iter(body)
        .map(|found| {
            found
                .as_str()
                .trim_end_matches(CALENDAR_URL_DELIMITER)
                .to_string()
        })
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
