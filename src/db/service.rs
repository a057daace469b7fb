use crate::analysis::BiasLayer;
use crate::db::models::{
    Analysis, AnalysisKind, ChatMessage, ContributionStatus, LibraryContribution, NewAnalysis,
};
use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::{params, params_from_iter, Connection, Result as DbResult, Row};
use uuid::Uuid;

const ANALYSIS_COLUMNS: &str =
    "id, session_id, kind, mode, input_type, content, result, overall_score, narrative_source, created_at";
const CHAT_COLUMNS: &str = "id, session_id, role, content, topic, source, created_at";
const CONTRIBUTION_COLUMNS: &str =
    "id, term, definition, layer, contributor, status, created_at, reviewed_at";

// DuckDB rejects LIMIT/OFFSET values of 2^62 and above.
const MAX_PAGE_BOUND: usize = 1 << 40;

/// Result of an approve/reject request.
#[derive(Debug)]
pub enum ReviewOutcome {
    Reviewed(LibraryContribution),
    NotFound,
    NotPending(ContributionStatus),
}

pub struct DbService;

impl DbService {
    /// Fixed-width UTC timestamps so text ordering matches time ordering.
    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn page_bound(n: usize) -> i64 {
        n.min(MAX_PAGE_BOUND) as i64
    }

    fn parse_time(val: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(val)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_analysis(row: &Row) -> DbResult<Analysis> {
        let result_str: String = row.get(6)?;
        let result = serde_json::from_str(&result_str).unwrap_or(serde_json::json!({}));
        let kind_str: String = row.get(2)?;
        let score: i32 = row.get(7)?;

        Ok(Analysis {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            session_id: row.get(1)?,
            kind: kind_str.parse().unwrap_or(AnalysisKind::Text),
            mode: row.get(3)?,
            input_type: row.get(4)?,
            content: row.get(5)?,
            result,
            overall_score: score.clamp(0, 100) as u8,
            narrative_source: row.get(8)?,
            created_at: Self::parse_time(&row.get::<_, String>(9)?),
        })
    }

    fn row_to_chat(row: &Row) -> DbResult<ChatMessage> {
        Ok(ChatMessage {
            id: row.get(0)?,
            session_id: row.get(1)?,
            role: row.get(2)?,
            content: row.get(3)?,
            topic: row.get(4)?,
            source: row.get(5)?,
            created_at: Self::parse_time(&row.get::<_, String>(6)?),
        })
    }

    fn row_to_contribution(row: &Row) -> DbResult<LibraryContribution> {
        let layer: Option<String> = row.get(3)?;
        let status: String = row.get(5)?;
        let reviewed: Option<String> = row.get(7)?;

        Ok(LibraryContribution {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            term: row.get(1)?,
            definition: row.get(2)?,
            layer: layer.as_deref().and_then(BiasLayer::from_code),
            contributor: row.get(4)?,
            status: status.parse().unwrap_or(ContributionStatus::Pending),
            created_at: Self::parse_time(&row.get::<_, String>(6)?),
            reviewed_at: reviewed.as_deref().map(Self::parse_time),
        })
    }

    // --- Analysis Operations ---

    pub fn insert_analysis(conn: &Connection, new: &NewAnalysis<'_>) -> DbResult<Analysis> {
        let id = Uuid::new_v4();
        let now = Self::now();

        conn.execute(
            "INSERT INTO analyses (id, session_id, kind, mode, input_type, content, result, overall_score, narrative_source, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id.to_string(),
                new.session_id,
                new.kind.as_str(),
                new.mode,
                new.input_type,
                new.content,
                new.result.to_string(),
                i32::from(new.overall_score),
                new.narrative_source,
                now,
            ],
        )?;

        Self::get_analysis(conn, id)?.ok_or(duckdb::Error::QueryReturnedNoRows)
    }

    pub fn get_analysis(conn: &Connection, id: Uuid) -> DbResult<Option<Analysis>> {
        let sql = format!("SELECT {} FROM analyses WHERE id = ?", ANALYSIS_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_analysis)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Newest first, optionally narrowed to one session and/or kind.
    pub fn list_analyses(
        conn: &Connection,
        session_id: Option<&str>,
        kind: Option<AnalysisKind>,
        limit: usize,
        offset: usize,
    ) -> DbResult<Vec<Analysis>> {
        let mut filters = Vec::new();
        let mut values: Vec<String> = Vec::new();
        if let Some(session_id) = session_id {
            filters.push("session_id = ?");
            values.push(session_id.to_string());
        }
        if let Some(kind) = kind {
            filters.push("kind = ?");
            values.push(kind.as_str().to_string());
        }
        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM analyses {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            ANALYSIS_COLUMNS,
            where_clause,
            Self::page_bound(limit),
            Self::page_bound(offset)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), Self::row_to_analysis)?;

        let mut analyses = Vec::new();
        for row in rows {
            analyses.push(row?);
        }
        Ok(analyses)
    }

    // --- Chat Operations ---

    pub fn insert_chat_message(
        conn: &Connection,
        session_id: &str,
        role: &str,
        content: &str,
        topic: Option<&str>,
        source: Option<&str>,
    ) -> DbResult<ChatMessage> {
        let now = Self::now();

        conn.execute(
            "INSERT INTO chats (session_id, role, content, topic, source, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            params![session_id, role, content, topic, source, now],
        )?;

        // The id comes from the sequence, so read back the newest row for the session.
        let sql = format!(
            "SELECT {} FROM chats WHERE session_id = ? ORDER BY id DESC LIMIT 1",
            CHAT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![session_id], Self::row_to_chat)?;

        match rows.next() {
            Some(row) => row,
            None => Err(duckdb::Error::QueryReturnedNoRows),
        }
    }

    pub fn get_chat_messages(
        conn: &Connection,
        session_id: &str,
        limit: usize,
        offset: usize,
    ) -> DbResult<Vec<ChatMessage>> {
        let sql = format!(
            "SELECT {} FROM chats WHERE session_id = ? ORDER BY id ASC LIMIT ? OFFSET ?",
            CHAT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![session_id, Self::page_bound(limit), Self::page_bound(offset)],
            Self::row_to_chat,
        )?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    // --- Library Operations ---

    pub fn insert_contribution(
        conn: &Connection,
        term: &str,
        definition: &str,
        layer: Option<BiasLayer>,
        contributor: &str,
    ) -> DbResult<LibraryContribution> {
        let id = Uuid::new_v4();
        let now = Self::now();

        conn.execute(
            "INSERT INTO library_contributions (id, term, definition, layer, contributor, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                id.to_string(),
                term,
                definition,
                layer.map(|l| l.code()),
                contributor,
                ContributionStatus::Pending.as_str(),
                now,
            ],
        )?;

        Self::get_contribution(conn, id)?.ok_or(duckdb::Error::QueryReturnedNoRows)
    }

    pub fn get_contribution(conn: &Connection, id: Uuid) -> DbResult<Option<LibraryContribution>> {
        let sql = format!(
            "SELECT {} FROM library_contributions WHERE id = ?",
            CONTRIBUTION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_contribution)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn list_contributions(
        conn: &Connection,
        status: Option<ContributionStatus>,
        limit: usize,
        offset: usize,
    ) -> DbResult<Vec<LibraryContribution>> {
        let rows_out = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM library_contributions WHERE status = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    CONTRIBUTION_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(
                    params![status.as_str(), Self::page_bound(limit), Self::page_bound(offset)],
                    Self::row_to_contribution,
                )?;
                rows.collect::<DbResult<Vec<_>>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM library_contributions ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    CONTRIBUTION_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(
                    params![Self::page_bound(limit), Self::page_bound(offset)],
                    Self::row_to_contribution,
                )?;
                rows.collect::<DbResult<Vec<_>>>()?
            }
        };
        Ok(rows_out)
    }

    /// Edits a contribution and sends it back to the review queue.
    pub fn update_contribution(
        conn: &Connection,
        id: Uuid,
        term: &str,
        definition: &str,
        layer: Option<BiasLayer>,
    ) -> DbResult<Option<LibraryContribution>> {
        let changed = conn.execute(
            "UPDATE library_contributions SET term = ?, definition = ?, layer = ?, status = ?, reviewed_at = NULL WHERE id = ?",
            params![
                term,
                definition,
                layer.map(|l| l.code()),
                ContributionStatus::Pending.as_str(),
                id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::get_contribution(conn, id)
    }

    /// Only pending contributions can be approved or rejected.
    pub fn review_contribution(
        conn: &Connection,
        id: Uuid,
        decision: ContributionStatus,
    ) -> DbResult<ReviewOutcome> {
        let current = match Self::get_contribution(conn, id)? {
            Some(c) => c,
            None => return Ok(ReviewOutcome::NotFound),
        };
        if current.status != ContributionStatus::Pending
            || decision == ContributionStatus::Pending
        {
            return Ok(ReviewOutcome::NotPending(current.status));
        }

        conn.execute(
            "UPDATE library_contributions SET status = ?, reviewed_at = ? WHERE id = ? AND status = ?",
            params![
                decision.as_str(),
                Self::now(),
                id.to_string(),
                ContributionStatus::Pending.as_str(),
            ],
        )?;

        match Self::get_contribution(conn, id)? {
            Some(c) => Ok(ReviewOutcome::Reviewed(c)),
            None => Ok(ReviewOutcome::NotFound),
        }
    }

    pub fn delete_contribution(conn: &Connection, id: Uuid) -> DbResult<bool> {
        let deleted = conn.execute(
            "DELETE FROM library_contributions WHERE id = ?",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }
}
