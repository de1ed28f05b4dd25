use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One federation pool for one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub ffvb_id: String,
    pub name: String,
    pub pool: String,
    pub season: String,
    pub url: String,
}

impl Competition {
    /// Stable document id: `ffvbId_pool_season`, slashes of the season
    /// replaced by underscores.
    pub fn document_id(&self) -> String {
        format!(
            "{}_{}_{}",
            self.ffvb_id,
            self.pool,
            self.season.replace('/', "_")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub ffvb_id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets_point: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// Everything extracted from one competition page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCompetition {
    pub competition: Competition,
    pub matches: Vec<Match>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_replaces_season_slashes() {
        let competition = Competition {
            ffvb_id: "AB12".to_string(),
            name: "Regionale".to_string(),
            pool: "C".to_string(),
            season: "23/24".to_string(),
            url: String::new(),
        };

        assert_eq!(competition.document_id(), "AB12_C_23_24");
    }

    #[test]
    fn test_match_serializes_camel_case_without_missing_fields() {
        let game = Match {
            ffvb_id: "LAA001".to_string(),
            home_team: "RUEIL VB".to_string(),
            away_team: "PARIS UC".to_string(),
            timestamp: None,
            date: Some("24/03/24".to_string()),
            time: None,
            sets_point: Some(vec!["25:20".to_string(), "25:18".to_string()]),
            referee: None,
            file_url: None,
        };

        assert_eq!(
            serde_json::to_value(&game).unwrap(),
            serde_json::json!({
                "ffvbId": "LAA001",
                "homeTeam": "RUEIL VB",
                "awayTeam": "PARIS UC",
                "date": "24/03/24",
                "setsPoint": ["25:20", "25:18"],
            })
        );
    }
}
