//! Fixed business rules of the FFVB results site and the club this pipeline
//! serves, plus the small runtime configuration built by the binary.

use std::time::Duration;

/// Root of the federation application. File links and endpoints hang off it.
pub const BASE_URL: &str = "https://www.ffvbbeach.org/ffvbapp";

/// Club calendar endpoint, relative to the base URL.
pub const CALENDAR_PATH: &str = "/resu/planning_club_class.php";

/// Competition detail endpoint, relative to the base URL.
pub const COMPETITION_PATH: &str = "/resu/vbspo_calendrier.php";

/// Federation identifier of the club the scheduled trigger syncs.
pub const DEFAULT_CLUB_ID: &str = "0924130";

/// Lowercase substring identifying the club in team names.
pub const CLUB_NAME: &str = "rueil";

/// Team placeholder for bye or unscheduled slots.
pub const BYE_SENTINEL: &str = "xxxxx";

/// Separator between set scores in the sets cell.
pub const SET_SCORE_DELIMITER: &str = ", ";

/// Closes every competition URL literal in the calendar markup.
pub const CALENDAR_URL_DELIMITER: char = '\'';

/// Stored matches younger than this are never deleted by reconciliation.
pub const QUIESCENCE_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Interval between two scheduled runs.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);

/// Collection holding one document per competition.
pub const COMPETITIONS_COLLECTION: &str = "competitions";

/// Sub-collection holding one document per match.
pub const GAMES_COLLECTION: &str = "games";

#[derive(Debug, Clone)]
pub struct FfvbConfig {
    pub club_id: String,
    pub quiescence_window: Duration,
}

impl FfvbConfig {
    pub fn new(club_id: impl Into<String>) -> Self {
        Self {
            club_id: club_id.into(),
            quiescence_window: QUIESCENCE_WINDOW,
        }
    }

    pub fn calendar_url(&self) -> String {
        format!("{}{}?cnclub={}", BASE_URL, CALENDAR_PATH, self.club_id)
    }
}

impl Default for FfvbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CLUB_ID)
    }
}
