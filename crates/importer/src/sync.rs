use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use storage::{Document, DocumentPath, DocumentStore, DocumentWrite};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::Result;
use crate::config::{COMPETITIONS_COLLECTION, FfvbConfig, GAMES_COLLECTION};
use crate::sources::ffvb::{CalendarDiscovery, PageParser, ParsedCompetition};
use crate::traits::PageSource;

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub competitions_found: usize,
    pub competitions_synced: usize,
    pub competitions_skipped: usize,
    pub competitions_failed: usize,
    pub matches_written: usize,
    pub matches_deleted: usize,
}

/// Discovers the club's competitions, scrapes them concurrently and mirrors
/// the result into the document store.
pub struct SyncOrchestrator {
    config: FfvbConfig,
    source: Arc<dyn PageSource>,
    store: Arc<dyn DocumentStore>,
    parser: Arc<PageParser>,
}

impl SyncOrchestrator {
    pub fn new(
        config: FfvbConfig,
        source: Arc<dyn PageSource>,
        store: Arc<dyn DocumentStore>,
        parser: PageParser,
    ) -> Self {
        Self {
            config,
            source,
            store,
            parser: Arc::new(parser),
        }
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let urls = CalendarDiscovery::new(&self.config)
            .discover(self.source.as_ref())
            .await?;

        let mut report = SyncReport {
            competitions_found: urls.len(),
            ..SyncReport::default()
        };

        if urls.is_empty() {
            info!("No competition listed for club {}", self.config.club_id);
            return Ok(report);
        }

        let competitions = self.fetch_competitions(urls, &mut report).await;

        let mut writes = Vec::new();
        let mut owners = HashSet::new();
        for parsed in &competitions {
            match competition_writes(parsed) {
                Ok(documents) => {
                    owners.insert(parsed.competition.document_id());
                    report.competitions_synced += 1;
                    report.matches_written += parsed.matches.len();
                    writes.extend(documents);
                }
                Err(e) => {
                    report.competitions_failed += 1;
                    warn!("Skipping competition {}: {}", parsed.competition.url, e);
                }
            }
        }

        let written: HashSet<DocumentPath> = writes.iter().map(|write| write.path.clone()).collect();
        if !writes.is_empty() {
            info!("Writing {} document(s)", writes.len());
            self.store.bulk_set(writes).await?;
        }

        let stored = self.store.collection_group(GAMES_COLLECTION).await?;
        let outdated = select_outdated(
            &stored,
            &owners,
            &written,
            Utc::now(),
            self.config.quiescence_window,
        );

        info!("Deleting {} outdated games", outdated.len());
        report.matches_deleted = outdated.len();
        if !outdated.is_empty() {
            self.store.bulk_delete(outdated).await?;
        }

        Ok(report)
    }

    /// Fetches and parses every page concurrently. Pages that fail or yield no
    /// competition are left out; results keep the discovery order.
    async fn fetch_competitions(
        &self,
        urls: Vec<String>,
        report: &mut SyncReport,
    ) -> Vec<ParsedCompetition> {
        let mut tasks = JoinSet::new();
        for (index, url) in urls.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            let parser = Arc::clone(&self.parser);
            tasks.spawn(async move {
                let result = match source.fetch(&url).await {
                    Ok(html) => parser.parse(&html, &url),
                    Err(e) => Err(e),
                };
                (index, url, result)
            });
        }

        let mut parsed = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(Some(competition)))) => parsed.push((index, competition)),
                Ok((_, url, Ok(None))) => {
                    report.competitions_skipped += 1;
                    warn!("No competition found on {}", url);
                }
                Ok((_, url, Err(e))) => {
                    report.competitions_failed += 1;
                    warn!("Skipping competition {}: {}", url, e);
                }
                Err(e) => {
                    report.competitions_failed += 1;
                    error!("Competition task failed: {}", e);
                }
            }
        }

        parsed.sort_by_key(|(index, _)| *index);
        parsed.into_iter().map(|(_, competition)| competition).collect()
    }
}

/// `competitions/<id>` followed by `competitions/<id>/games/<matchId>` for
/// every match.
pub fn competition_writes(parsed: &ParsedCompetition) -> Result<Vec<DocumentWrite>> {
    let competition_path =
        DocumentPath::root(COMPETITIONS_COLLECTION, &parsed.competition.document_id())?;

    let mut writes = Vec::with_capacity(parsed.matches.len() + 1);
    writes.push(DocumentWrite::new(
        competition_path.clone(),
        &parsed.competition,
    )?);

    for game in &parsed.matches {
        let path = competition_path.child(GAMES_COLLECTION, &game.ffvb_id)?;
        writes.push(DocumentWrite::new(path, game)?);
    }

    Ok(writes)
}

/// Stored games to delete: owned by a competition synced this run, not
/// written by it, and last updated before the quiescence window.
pub fn select_outdated(
    stored: &[Document],
    owners: &HashSet<String>,
    written: &HashSet<DocumentPath>,
    now: DateTime<Utc>,
    quiescence_window: Duration,
) -> Vec<DocumentPath> {
    let Some(cutoff) = chrono::Duration::from_std(quiescence_window)
        .ok()
        .and_then(|window| now.checked_sub_signed(window))
    else {
        return Vec::new();
    };

    stored
        .iter()
        .filter(|document| document.update_time < cutoff)
        .filter(|document| !written.contains(&document.path))
        .filter(|document| {
            document.path.parent_document().is_some_and(|parent| {
                parent.collection_id() == COMPETITIONS_COLLECTION
                    && owners.contains(parent.document_id())
            })
        })
        .map(|document| document.path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImporterError;
    use crate::config::QUIESCENCE_WINDOW;
    use crate::sources::ffvb::fixtures::{calendar, competition_url, match_row, page};
    use serde_json::json;
    use std::collections::HashMap;
    use storage::MemoryDocumentStore;

    struct FakeSource {
        pages: HashMap<String, String>,
    }

    #[async_trait::async_trait]
    impl PageSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ImporterError::HttpStatus {
                    status: reqwest::StatusCode::NOT_FOUND,
                    url: url.to_string(),
                })
        }
    }

    fn path(raw: &str) -> DocumentPath {
        DocumentPath::parse(raw).unwrap()
    }

    fn minutes_ago(minutes: i64) -> DateTime<Utc> {
        Utc::now() - chrono::Duration::minutes(minutes)
    }

    /// Calendar listing `LIIDF/RMA` (valid), `ABCCS/3MA` (valid) and
    /// `GONE/X` (404).
    fn source() -> FakeSource {
        let regional = competition_url("LIIDF", "RMA");
        let cup = competition_url("ABCCS", "3MA");
        let gone = competition_url("GONE", "X");

        let mut pages = HashMap::new();
        pages.insert(
            FfvbConfig::default().calendar_url(),
            calendar(&[regional.clone(), cup.clone(), gone, regional.clone()]),
        );
        pages.insert(
            regional,
            page(
                "Regionale Masculine A",
                &[
                    match_row("RMA001", "RUEIL VB", "PARIS UC"),
                    match_row("RMA002", "BOULOGNE", "VERSAILLES"),
                    match_row("RMA003", "PARIS UC", "Rueil VB"),
                ]
                .concat(),
            ),
        );
        pages.insert(
            cup,
            page("Coupe de France", &match_row("3MA010", "xxxxx", "RUEIL VB")),
        );

        FakeSource { pages }
    }

    fn orchestrator(source: FakeSource, store: Arc<MemoryDocumentStore>) -> SyncOrchestrator {
        SyncOrchestrator::new(
            FfvbConfig::default(),
            Arc::new(source),
            store,
            PageParser::default(),
        )
    }

    #[tokio::test]
    async fn test_run_writes_competitions_and_matches() {
        let store = Arc::new(MemoryDocumentStore::new());

        let report = orchestrator(source(), store.clone()).run().await.unwrap();

        assert_eq!(
            report,
            SyncReport {
                competitions_found: 3,
                competitions_synced: 2,
                competitions_skipped: 0,
                competitions_failed: 1,
                matches_written: 2,
                matches_deleted: 0,
            }
        );
        assert_eq!(
            store.paths(),
            vec![
                path("competitions/ABCCS_3MA_2023_2024"),
                path("competitions/LIIDF_RMA_2023_2024"),
                path("competitions/LIIDF_RMA_2023_2024/games/RMA001"),
                path("competitions/LIIDF_RMA_2023_2024/games/RMA003"),
            ]
        );

        let competition = store
            .get(&path("competitions/LIIDF_RMA_2023_2024"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            competition.data,
            json!({
                "ffvbId": "LIIDF",
                "name": "Regionale Masculine A",
                "pool": "RMA",
                "season": "2023/2024",
                "url": competition_url("LIIDF", "RMA"),
            })
        );
    }

    #[tokio::test]
    async fn test_reconciliation_deletes_only_stale_owned_games() {
        let store = Arc::new(MemoryDocumentStore::new());
        let seeds = [
            ("competitions/LIIDF_RMA_2023_2024/games/OLD", 10),
            ("competitions/LIIDF_RMA_2023_2024/games/RECENT", 2),
            ("competitions/LIIDF_RMA_2023_2024/games/RMA001", 10),
            ("competitions/GONE_X_2023_2024/games/G1", 10),
            ("competitions/ARCHIVE_A_2022_2023/games/A1", 600),
        ];
        for (raw, age) in seeds {
            store.insert_at(path(raw), json!({}), minutes_ago(age));
        }

        let report = orchestrator(source(), store.clone()).run().await.unwrap();

        assert_eq!(report.matches_deleted, 1);
        let paths = store.paths();
        assert!(!paths.contains(&path("competitions/LIIDF_RMA_2023_2024/games/OLD")));
        assert!(paths.contains(&path("competitions/LIIDF_RMA_2023_2024/games/RECENT")));
        assert!(paths.contains(&path("competitions/LIIDF_RMA_2023_2024/games/RMA001")));
        assert!(paths.contains(&path("competitions/GONE_X_2023_2024/games/G1")));
        assert!(paths.contains(&path("competitions/ARCHIVE_A_2022_2023/games/A1")));
    }

    #[tokio::test]
    async fn test_fatal_row_excludes_only_its_page() {
        let mut source = source();
        source.pages.insert(
            competition_url("ABCCS", "3MA"),
            page("Coupe de France", &match_row("", "RUEIL VB", "PARIS UC")),
        );
        let store = Arc::new(MemoryDocumentStore::new());
        store.insert_at(
            path("competitions/ABCCS_3MA_2023_2024/games/3MA001"),
            json!({}),
            minutes_ago(60),
        );

        let report = orchestrator(source, store.clone()).run().await.unwrap();

        assert_eq!(report.competitions_synced, 1);
        assert_eq!(report.competitions_failed, 2);
        assert!(store
            .paths()
            .contains(&path("competitions/ABCCS_3MA_2023_2024/games/3MA001")));
        assert!(!store
            .paths()
            .contains(&path("competitions/ABCCS_3MA_2023_2024")));
    }

    #[tokio::test]
    async fn test_page_without_metadata_is_skipped() {
        let mut source = source();
        source.pages.insert(
            competition_url("ABCCS", "3MA"),
            "<html><body>Maintenance</body></html>".to_string(),
        );
        let store = Arc::new(MemoryDocumentStore::new());

        let report = orchestrator(source, store.clone()).run().await.unwrap();

        assert_eq!(report.competitions_skipped, 1);
        assert_eq!(report.competitions_synced, 1);
    }

    #[tokio::test]
    async fn test_no_competition_leaves_store_untouched() {
        let mut pages = HashMap::new();
        pages.insert(FfvbConfig::default().calendar_url(), calendar(&[]));
        let store = Arc::new(MemoryDocumentStore::new());
        store.insert_at(
            path("competitions/LIIDF_RMA_2023_2024/games/OLD"),
            json!({}),
            minutes_ago(600),
        );

        let report = orchestrator(FakeSource { pages }, store.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(report, SyncReport::default());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_calendar_failure_fails_run() {
        let store = Arc::new(MemoryDocumentStore::new());
        let source = FakeSource {
            pages: HashMap::new(),
        };

        let result = orchestrator(source, store.clone()).run().await;

        assert!(matches!(result, Err(ImporterError::HttpStatus { .. })));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_rerun_on_unchanged_pages_has_no_net_diff() {
        let store = Arc::new(MemoryDocumentStore::new());
        let sync = orchestrator(source(), store.clone());

        sync.run().await.unwrap();
        let first = store.collection_group(GAMES_COLLECTION).await.unwrap();
        let report = sync.run().await.unwrap();
        let second = store.collection_group(GAMES_COLLECTION).await.unwrap();

        assert_eq!(report.matches_deleted, 0);
        assert_eq!(first.len(), second.len());
        for (before, after) in first.iter().zip(&second) {
            assert_eq!(before.path, after.path);
            assert_eq!(before.data, after.data);
        }
    }

    #[test]
    fn test_select_outdated_honours_quiescence_window() {
        let now = Utc::now();
        let stale = Document {
            path: path("competitions/K/games/1"),
            data: json!({}),
            update_time: now - chrono::Duration::minutes(10),
        };
        let fresh = Document {
            path: path("competitions/K/games/2"),
            data: json!({}),
            update_time: now - chrono::Duration::minutes(2),
        };
        let owners = HashSet::from(["K".to_string()]);

        let outdated = select_outdated(
            &[stale.clone(), fresh],
            &owners,
            &HashSet::new(),
            now,
            QUIESCENCE_WINDOW,
        );

        assert_eq!(outdated, vec![stale.path]);
    }

    #[test]
    fn test_select_outdated_skips_written_and_foreign_games() {
        let now = Utc::now();
        let old = now - chrono::Duration::hours(1);
        let written_doc = Document {
            path: path("competitions/K/games/1"),
            data: json!({}),
            update_time: old,
        };
        let foreign = Document {
            path: path("competitions/OTHER/games/1"),
            data: json!({}),
            update_time: old,
        };
        let owners = HashSet::from(["K".to_string()]);
        let written = HashSet::from([written_doc.path.clone()]);

        let outdated = select_outdated(
            &[written_doc, foreign],
            &owners,
            &written,
            now,
            QUIESCENCE_WINDOW,
        );

        assert!(outdated.is_empty());
    }

    #[test]
    fn test_competition_writes_layout() {
        let parsed = ParsedCompetition {
            competition: crate::sources::ffvb::Competition {
                ffvb_id: "AB12".to_string(),
                name: "Regionale".to_string(),
                pool: "C".to_string(),
                season: "23/24".to_string(),
                url: competition_url("AB12", "C"),
            },
            matches: Vec::new(),
        };

        let writes = competition_writes(&parsed).unwrap();

        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].path, path("competitions/AB12_C_23_24"));
    }
}
