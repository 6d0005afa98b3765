//! In-memory store
//!
//! Map-per-entity storage behind a `tokio::sync::RwLock`. Not durable;
//! intended for tests and demo runs without a database file.

use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{
    BodyMarker, EntryDraft, Insight, InsightDraft, InsightStatus, JournalEntry, MarkerDraft,
};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    entries: HashMap<String, JournalEntry>,
    markers: HashMap<String, BodyMarker>,
    insights: HashMap<String, Insight>,
}

/// Volatile store backed by in-memory maps
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored insights, all users and statuses (test helper)
    pub async fn insight_count(&self) -> usize {
        self.tables.read().await.insights.len()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn create_entry(&self, draft: EntryDraft) -> StoreResult<JournalEntry> {
        let mut tables = self.tables.write().await;

        let duplicate = tables
            .entries
            .values()
            .any(|e| e.user_id == draft.user_id && e.entry_date == draft.entry_date);
        if duplicate {
            return Err(StoreError::DuplicateEntry {
                date: draft.entry_date.to_string(),
            });
        }

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
        tables.entries.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn entries_for_analysis(&self, user_id: &str) -> StoreResult<Vec<JournalEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<JournalEntry> = tables
            .entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.entry_date);
        Ok(entries)
    }

    async fn recent_entries(&self, user_id: &str, limit: usize) -> StoreResult<Vec<JournalEntry>> {
        let mut entries = self.entries_for_analysis(user_id).await?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    async fn entry_by_id(&self, id: &str, user_id: &str) -> StoreResult<JournalEntry> {
        let tables = self.tables.read().await;
        tables
            .entries
            .get(id)
            .filter(|e| e.user_id == user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entry {}", id)))
    }

    async fn delete_entry(&self, id: &str, user_id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .entries
            .get(id)
            .is_some_and(|e| e.user_id == user_id);
        if !owned {
            return Err(StoreError::NotFound(format!("entry {}", id)));
        }
        tables.entries.remove(id);
        tables.markers.retain(|_, m| m.entry_id != id);
        Ok(())
    }

    async fn create_marker(&self, draft: MarkerDraft) -> StoreResult<BodyMarker> {
        let mut tables = self.tables.write().await;
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
        tables.markers.insert(marker.id.clone(), marker.clone());
        Ok(marker)
    }

    async fn markers_for_user(&self, user_id: &str) -> StoreResult<Vec<BodyMarker>> {
        let tables = self.tables.read().await;
        Ok(tables
            .markers
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn markers_for_entry(&self, entry_id: &str) -> StoreResult<Vec<BodyMarker>> {
        let tables = self.tables.read().await;
        Ok(tables
            .markers
            .values()
            .filter(|m| m.entry_id == entry_id)
            .cloned()
            .collect())
    }

    async fn create_insight(&self, draft: InsightDraft) -> StoreResult<Insight> {
        let mut tables = self.tables.write().await;
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
        tables.insights.insert(insight.id.clone(), insight.clone());
        Ok(insight)
    }

    async fn insight_by_id(&self, id: &str) -> StoreResult<Insight> {
        let tables = self.tables.read().await;
        tables
            .insights
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("insight {}", id)))
    }

    async fn active_insights(&self, user_id: &str) -> StoreResult<Vec<Insight>> {
        let tables = self.tables.read().await;
        let mut insights: Vec<Insight> = tables
            .insights
            .values()
            .filter(|i| i.user_id == user_id && i.status == InsightStatus::Active)
            .cloned()
            .collect();
        insights.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(insights)
    }

    async fn update_insight_status(&self, id: &str, status: InsightStatus) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let insight = tables
            .insights
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("insight {}", id)))?;
        insight.status = status;
        Ok(())
    }
}
