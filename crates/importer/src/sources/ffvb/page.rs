use reqwest::Url;
use tracing::{debug, error};

use super::layout::{COMPETITION_NAME, MATCH_TABLE, ROW_TAG};
use super::models::{Competition, ParsedCompetition};
use super::row::RowExtractor;
use crate::dom::{self, DomNode};
use crate::{ImporterError, Result};

/// Parses a competition detail page (`vbspo_calendrier.php`).
#[derive(Debug, Clone, Default)]
pub struct PageParser {
    rows: RowExtractor,
}

impl PageParser {
    pub fn new(rows: RowExtractor) -> Self {
        Self { rows }
    }

    /// Returns `Ok(None)` when the competition itself cannot be identified.
    /// Fails when a match row is malformed or the match table is missing.
    pub fn parse(&self, html: &str, url: &str) -> Result<Option<ParsedCompetition>> {
        let dom = dom::parse_document(html);

        let competition = match read_competition(url, &dom) {
            Ok(competition) => competition,
            Err(e) => {
                error!("Cannot read competition metadata from {}: {}", url, e);
                return Ok(None);
            }
        };

        let table = MATCH_TABLE.resolve(&dom)?;
        let mut matches = Vec::new();
        for row in table.attributed_children(ROW_TAG) {
            if let Some(game) = self.rows.extract(row)? {
                matches.push(game);
            }
        }

        debug!(
            "Parsed competition {} ({}): {} match(es)",
            competition.name,
            competition.document_id(),
            matches.len()
        );

        Ok(Some(ParsedCompetition {
            competition,
            matches,
        }))
    }
}

fn read_competition(url: &str, dom: &DomNode) -> Result<Competition> {
    let parsed = Url::parse(url).map_err(|e| ImporterError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let ffvb_id = query_param(&parsed, "codent")?;
    let pool = query_param(&parsed, "poule")?;
    let season = query_param(&parsed, "saison")?;

    let name = COMPETITION_NAME
        .resolve(dom)?
        .value
        .clone()
        .ok_or(ImporterError::MissingCell("competition name"))?;

    Ok(Competition {
        ffvb_id,
        name,
        pool,
        season,
        url: url.to_string(),
    })
}

fn query_param(url: &Url, name: &'static str) -> Result<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(ImporterError::MissingQueryParam(name))
}
