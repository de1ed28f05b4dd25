use tracing::{debug, warn};

use super::layout::{
    AWAY_TEAM_CELL, CELL_TAG, DATE_CELL, FILE_LINK_ATTR, FILE_LINK_CHILD, FILE_LINK_SKIP,
    HOME_TEAM_CELL, MATCH_ID_CELL, REFEREE_CELL, SETS_CELL, TIME_CELL,
};
use super::models::Match;
use crate::config::{BASE_URL, BYE_SENTINEL, CLUB_NAME, SET_SCORE_DELIMITER};
use crate::date::DateParser;
use crate::dom::DomNode;
use crate::{ImporterError, Result};

/// Turns one row of the match table into a [`Match`].
#[derive(Debug, Clone, Default)]
pub struct RowExtractor {
    date_parser: DateParser,
}

impl RowExtractor {
    pub fn new(date_parser: DateParser) -> Self {
        Self { date_parser }
    }

    /// Returns `Ok(None)` for bye slots and for matches the club does not play.
    /// A row without a match id means the layout no longer matches and is an
    /// error.
    pub fn extract(&self, row: &DomNode) -> Result<Option<Match>> {
        let cells: Vec<&DomNode> = row.attributed_children(CELL_TAG).collect();
        let cell_text = |index: usize| cells.get(index).and_then(|cell| cell.first_text());

        let home_team = cell_text(HOME_TEAM_CELL).ok_or(ImporterError::MissingCell("home team"))?;
        let away_team = cell_text(AWAY_TEAM_CELL).ok_or(ImporterError::MissingCell("away team"))?;

        if home_team == BYE_SENTINEL || away_team == BYE_SENTINEL {
            debug!("Skipping bye slot: {} vs {}", home_team, away_team);
            return Ok(None);
        }

        if !involves_club(home_team) && !involves_club(away_team) {
            debug!("Skipping other clubs' match: {} vs {}", home_team, away_team);
            return Ok(None);
        }

        let ffvb_id = cell_text(MATCH_ID_CELL)
            .filter(|id| !id.is_empty())
            .ok_or(ImporterError::MissingMatchId)?;

        let date = cell_text(DATE_CELL);
        let time = cell_text(TIME_CELL);

        let timestamp = date.filter(|date| !date.is_empty()).and_then(|date| {
            let parsed = self.date_parser.parse(date, time);
            if parsed.is_none() {
                warn!(
                    "Unparsable date for match {}: {:?} {:?}",
                    ffvb_id, date, time
                );
            }
            parsed
        });

        let sets_point = cell_text(SETS_CELL)
            .filter(|sets| !sets.is_empty())
            .map(|sets| sets.split(SET_SCORE_DELIMITER).map(str::to_string).collect());

        Ok(Some(Match {
            ffvb_id: ffvb_id.to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            timestamp,
            date: date.map(str::to_string),
            time: time.map(str::to_string),
            sets_point,
            referee: cell_text(REFEREE_CELL).map(str::to_string),
            file_url: file_url(row),
        }))
    }
}

fn involves_club(team: &str) -> bool {
    team.to_lowercase().contains(CLUB_NAME)
}

/// Score sheet link, read from the raw row children rather than data cells.
fn file_url(row: &DomNode) -> Option<String> {
    let link = row
        .children
        .get(FILE_LINK_CHILD)?
        .attrs
        .get(FILE_LINK_ATTR)?;
    let suffix = link.value.get(FILE_LINK_SKIP..)?;

    Some(format!("{}{}", BASE_URL, suffix))
}
