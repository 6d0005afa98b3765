//! SQLite-backed store
//!
//! Durable single-file persistence. Dates are stored as ISO-8601 TEXT,
//! factor lists and supporting data as JSON columns. The connection is
//! guarded by an async mutex; every operation here is a handful of point
//! reads or a single insert, so contention is not a concern at a
//! personal-journal workload.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{
    BodyMarker, EntryDraft, Insight, InsightDraft, InsightStatus, InsightType, JournalEntry,
    MarkerDraft,
};
use crate::store::Store;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS journal_entries (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    entry_date      TEXT NOT NULL,
    sleep_hours     REAL,
    sleep_quality   INTEGER,
    stress_level    INTEGER,
    energy_level    INTEGER,
    mood_score      INTEGER,
    exercise_mins   INTEGER,
    exercise_type   TEXT,
    water_intake_ml INTEGER,
    notes           TEXT,
    created_at      TEXT NOT NULL,
    UNIQUE (user_id, entry_date)
);

CREATE TABLE IF NOT EXISTS body_markers (
    id          TEXT PRIMARY KEY,
    entry_id    TEXT NOT NULL,
    user_id     TEXT NOT NULL,
    body_region TEXT NOT NULL,
    x_pos       REAL NOT NULL,
    y_pos       REAL NOT NULL,
    symptom     TEXT NOT NULL,
    intensity   INTEGER NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS insights (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    insight_type    TEXT NOT NULL,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    confidence      REAL NOT NULL,
    factors         TEXT NOT NULL,
    supporting_data TEXT NOT NULL,
    status          TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_user_date ON journal_entries (user_id, entry_date);
CREATE INDEX IF NOT EXISTS idx_markers_user ON body_markers (user_id);
CREATE INDEX IF NOT EXISTS idx_markers_entry ON body_markers (entry_id);
CREATE INDEX IF NOT EXISTS idx_insights_user_status ON insights (user_id, status);
";

/// Durable store backed by a single SQLite database file
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database (lost on drop)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Wrap a domain parse failure so it can flow out of a rusqlite row mapper
fn column_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct BadColumn(String);

fn parse_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| column_error(idx, e))
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| column_error(idx, e))
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let date_raw: String = row.get(2)?;
    let created_raw: String = row.get(12)?;
    Ok(JournalEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        entry_date: parse_date(2, &date_raw)?,
        sleep_hours: row.get(3)?,
        sleep_quality: row.get(4)?,
        stress_level: row.get(5)?,
        energy_level: row.get(6)?,
        mood_score: row.get(7)?,
        exercise_mins: row.get(8)?,
        exercise_type: row.get(9)?,
        water_intake_ml: row.get(10)?,
        notes: row.get(11)?,
        created_at: parse_timestamp(12, &created_raw)?,
    })
}

fn marker_from_row(row: &Row<'_>) -> rusqlite::Result<BodyMarker> {
    let created_raw: String = row.get(8)?;
    Ok(BodyMarker {
        id: row.get(0)?,
        entry_id: row.get(1)?,
        user_id: row.get(2)?,
        body_region: row.get(3)?,
        x_pos: row.get(4)?,
        y_pos: row.get(5)?,
        symptom: row.get(6)?,
        intensity: row.get(7)?,
        created_at: parse_timestamp(8, &created_raw)?,
    })
}

fn insight_from_row(row: &Row<'_>) -> rusqlite::Result<Insight> {
    let type_raw: String = row.get(2)?;
    let factors_raw: String = row.get(6)?;
    let supporting_raw: String = row.get(7)?;
    let status_raw: String = row.get(8)?;
    let created_raw: String = row.get(9)?;

    let insight_type = InsightType::parse(&type_raw)
        .ok_or_else(|| column_error(2, BadColumn(format!("unknown insight type {type_raw}"))))?;
    let status = InsightStatus::parse(&status_raw)
        .ok_or_else(|| column_error(8, BadColumn(format!("unknown status {status_raw}"))))?;

    Ok(Insight {
        id: row.get(0)?,
        user_id: row.get(1)?,
        insight_type,
        title: row.get(3)?,
        description: row.get(4)?,
        confidence: row.get(5)?,
        factors: serde_json::from_str(&factors_raw).map_err(|e| column_error(6, e))?,
        supporting_data: serde_json::from_str(&supporting_raw).map_err(|e| column_error(7, e))?,
        status,
        created_at: parse_timestamp(9, &created_raw)?,
    })
}

/// Detect a UNIQUE constraint failure so it can surface as a domain error
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn create_entry(&self, draft: EntryDraft) -> StoreResult<JournalEntry> {
        let conn = self.conn.lock().await;
        let entry = JournalEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            entry_date: draft.entry_date,
            sleep_hours: draft.sleep_hours,
            sleep_quality: draft.sleep_quality,
            stress_level: draft.stress_level,
            energy_level: draft.energy_level,
            mood_score: draft.mood_score,
            exercise_mins: draft.exercise_mins,
            exercise_type: draft.exercise_type,
            water_intake_ml: draft.water_intake_ml,
            notes: draft.notes,
            created_at: Utc::now(),
        };

        let result = conn.execute(
            "INSERT INTO journal_entries (id, user_id, entry_date, sleep_hours, sleep_quality,
                 stress_level, energy_level, mood_score, exercise_mins, exercise_type,
                 water_intake_ml, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                entry.id,
                entry.user_id,
                entry.entry_date.to_string(),
                entry.sleep_hours,
                entry.sleep_quality,
                entry.stress_level,
                entry.energy_level,
                entry.mood_score,
                entry.exercise_mins,
                entry.exercise_type,
                entry.water_intake_ml,
                entry.notes,
                entry.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(entry),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEntry {
                date: entry.entry_date.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn entries_for_analysis(&self, user_id: &str) -> StoreResult<Vec<JournalEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, entry_date, sleep_hours, sleep_quality, stress_level,
                    energy_level, mood_score, exercise_mins, exercise_type, water_intake_ml,
                    notes, created_at
             FROM journal_entries WHERE user_id = ?1 ORDER BY entry_date ASC",
        )?;
        let entries = stmt
            .query_map(params![user_id], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    async fn recent_entries(&self, user_id: &str, limit: usize) -> StoreResult<Vec<JournalEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, entry_date, sleep_hours, sleep_quality, stress_level,
                    energy_level, mood_score, exercise_mins, exercise_type, water_intake_ml,
                    notes, created_at
             FROM journal_entries WHERE user_id = ?1 ORDER BY entry_date DESC LIMIT ?2",
        )?;
        let entries = stmt
            .query_map(params![user_id, limit as i64], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    async fn entry_by_id(&self, id: &str, user_id: &str) -> StoreResult<JournalEntry> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, user_id, entry_date, sleep_hours, sleep_quality, stress_level,
                    energy_level, mood_score, exercise_mins, exercise_type, water_intake_ml,
                    notes, created_at
             FROM journal_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            entry_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("entry {}", id)))
    }

    async fn delete_entry(&self, id: &str, user_id: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "DELETE FROM journal_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("entry {}", id)));
        }
        conn.execute("DELETE FROM body_markers WHERE entry_id = ?1", params![id])?;
        Ok(())
    }

    async fn create_marker(&self, draft: MarkerDraft) -> StoreResult<BodyMarker> {
        let conn = self.conn.lock().await;
        let marker = BodyMarker {
            id: uuid::Uuid::new_v4().to_string(),
            entry_id: draft.entry_id,
            user_id: draft.user_id,
            body_region: draft.body_region,
            x_pos: draft.x_pos,
            y_pos: draft.y_pos,
            symptom: draft.symptom,
            intensity: draft.intensity,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO body_markers (id, entry_id, user_id, body_region, x_pos, y_pos,
                 symptom, intensity, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                marker.id,
                marker.entry_id,
                marker.user_id,
                marker.body_region,
                marker.x_pos,
                marker.y_pos,
                marker.symptom,
                marker.intensity,
                marker.created_at.to_rfc3339(),
            ],
        )?;
        Ok(marker)
    }

    async fn markers_for_user(&self, user_id: &str) -> StoreResult<Vec<BodyMarker>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, entry_id, user_id, body_region, x_pos, y_pos, symptom, intensity,
                    created_at
             FROM body_markers WHERE user_id = ?1",
        )?;
        let markers = stmt
            .query_map(params![user_id], marker_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(markers)
    }

    async fn markers_for_entry(&self, entry_id: &str) -> StoreResult<Vec<BodyMarker>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, entry_id, user_id, body_region, x_pos, y_pos, symptom, intensity,
                    created_at
             FROM body_markers WHERE entry_id = ?1",
        )?;
        let markers = stmt
            .query_map(params![entry_id], marker_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(markers)
    }

    async fn create_insight(&self, draft: InsightDraft) -> StoreResult<Insight> {
        let conn = self.conn.lock().await;
        let insight = Insight {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            insight_type: draft.insight_type,
            title: draft.title,
            description: draft.description,
            confidence: draft.confidence,
            factors: draft.factors,
            supporting_data: draft.supporting_data,
            status: draft.status,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO insights (id, user_id, insight_type, title, description, confidence,
                 factors, supporting_data, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                insight.id,
                insight.user_id,
                insight.insight_type.as_str(),
                insight.title,
                insight.description,
                insight.confidence,
                serde_json::to_string(&insight.factors)?,
                serde_json::to_string(&insight.supporting_data)?,
                insight.status.as_str(),
                insight.created_at.to_rfc3339(),
            ],
        )?;
        Ok(insight)
    }

    async fn insight_by_id(&self, id: &str) -> StoreResult<Insight> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, user_id, insight_type, title, description, confidence, factors,
                    supporting_data, status, created_at
             FROM insights WHERE id = ?1",
            params![id],
            insight_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("insight {}", id)))
    }

    async fn active_insights(&self, user_id: &str) -> StoreResult<Vec<Insight>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, insight_type, title, description, confidence, factors,
                    supporting_data, status, created_at
             FROM insights WHERE user_id = ?1 AND status = 'active'
             ORDER BY confidence DESC",
        )?;
        let insights = stmt
            .query_map(params![user_id], insight_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(insights)
    }

    async fn update_insight_status(&self, id: &str, status: InsightStatus) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE insights SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("insight {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::InsightFactor;
    use crate::store::Direction;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[tokio::test]
    async fn test_entry_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let draft = EntryDraft::new("u1", date(1))
            .sleep_hours(6.5)
            .mood(4)
            .water_ml(1800);
        let created = store.create_entry(draft).await.unwrap();

        let entries = store.entries_for_analysis("u1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, created.id);
        assert_eq!(entries[0].sleep_hours, Some(6.5));
        assert_eq!(entries[0].mood_score, Some(4));
        assert_eq!(entries[0].water_intake_ml, Some(1800));
        assert_eq!(entries[0].stress_level, None);
    }

    #[tokio::test]
    async fn test_duplicate_entry_maps_to_domain_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .create_entry(EntryDraft::new("u1", date(1)))
            .await
            .unwrap();
        let err = store
            .create_entry(EntryDraft::new("u1", date(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry { .. }));
    }

    #[tokio::test]
    async fn test_delete_entry_cascades_markers_and_frees_date() {
        let store = SqliteStore::open_in_memory().unwrap();
        let entry = store
            .create_entry(EntryDraft::new("u1", date(1)))
            .await
            .unwrap();
        store
            .create_marker(MarkerDraft {
                entry_id: entry.id.clone(),
                user_id: "u1".to_string(),
                body_region: "head".to_string(),
                x_pos: 50.0,
                y_pos: 10.0,
                symptom: "Throbbing".to_string(),
                intensity: 7,
            })
            .await
            .unwrap();

        let err = store.delete_entry(&entry.id, "u2").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        store.delete_entry(&entry.id, "u1").await.unwrap();
        let err = store.entry_by_id(&entry.id, "u1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.markers_for_entry(&entry.id).await.unwrap().is_empty());

        // The unique (user, date) slot is usable again
        store
            .create_entry(EntryDraft::new("u1", date(1)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insight_round_trip_with_json_columns() {
        let store = SqliteStore::open_in_memory().unwrap();
        let draft = InsightDraft {
            user_id: "u1".to_string(),
            insight_type: InsightType::Trend,
            title: "Mood is trending upward".to_string(),
            description: "desc".to_string(),
            confidence: 0.8,
            factors: vec![InsightFactor {
                name: "Mood".to_string(),
                direction: Direction::Positive,
                strength: 0.6,
            }],
            supporting_data: serde_json::json!({ "slope": 0.12 }),
            status: InsightStatus::Active,
        };
        let created = store.create_insight(draft).await.unwrap();

        let insights = store.active_insights("u1").await.unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0], created);
        assert_eq!(insights[0].factors[0].direction, Direction::Positive);
        assert_eq!(insights[0].supporting_data["slope"], 0.12);
    }

    #[tokio::test]
    async fn test_dismissed_insights_excluded() {
        let store = SqliteStore::open_in_memory().unwrap();
        let draft = InsightDraft {
            user_id: "u1".to_string(),
            insight_type: InsightType::Correlation,
            title: "t".to_string(),
            description: "d".to_string(),
            confidence: 0.5,
            factors: vec![],
            supporting_data: serde_json::Value::Null,
            status: InsightStatus::Active,
        };
        let created = store.create_insight(draft).await.unwrap();
        store
            .update_insight_status(&created.id, InsightStatus::Dismissed)
            .await
            .unwrap();

        assert!(store.active_insights("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meridian.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .create_entry(EntryDraft::new("u1", date(1)).sleep_hours(8.0))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let entries = store.entries_for_analysis("u1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sleep_hours, Some(8.0));
    }
}
