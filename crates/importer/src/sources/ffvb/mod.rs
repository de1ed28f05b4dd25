//! Scraper for the FFVB results site (`ffvbbeach.org/ffvbapp`).

mod calendar;
mod client;
mod layout;
mod models;
mod page;
mod row;

pub use calendar::{CalendarDiscovery, extract_competition_urls};
pub use client::FfvbClient;
pub use models::{Competition, Match, ParsedCompetition};
pub use page::PageParser;
pub use row::RowExtractor;

#[cfg(test)]
pub(crate) mod fixtures;
