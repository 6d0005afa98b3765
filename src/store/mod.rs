//! Persistence layer
//!
//! Everything the analysis engine and API need from storage is expressed
//! through the [`Store`] trait, so backends can be swapped without touching
//! analysis logic. Two implementations ship:
//!
//! - [`MemoryStore`]: in-memory maps, used by tests and `--memory` runs
//! - [`SqliteStore`]: durable single-file SQLite database

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{
    BodyMarker, Direction, EntryDraft, Insight, InsightDraft, InsightFactor, InsightStatus,
    InsightType, JournalEntry, MarkerDraft,
};

use async_trait::async_trait;

/// Repository contract for journal entries, body markers, and insights
///
/// Implementations must enforce the one-entry-per-(user, date) invariant
/// and are responsible for assigning ids and creation timestamps.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new journal entry.
    ///
    /// Fails with [`StoreError::DuplicateEntry`] if the user already has an
    /// entry for the draft's date.
    async fn create_entry(&self, draft: EntryDraft) -> StoreResult<JournalEntry>;

    /// All of a user's entries, ascending by entry date.
    ///
    /// The analysis engine treats this order as the time axis.
    async fn entries_for_analysis(&self, user_id: &str) -> StoreResult<Vec<JournalEntry>>;

    /// A user's most recent entries, descending by entry date.
    async fn recent_entries(&self, user_id: &str, limit: usize) -> StoreResult<Vec<JournalEntry>>;

    /// Look up one entry by id, scoped to its owner.
    ///
    /// Fails with [`StoreError::NotFound`] if the id does not exist or
    /// belongs to another user.
    async fn entry_by_id(&self, id: &str, user_id: &str) -> StoreResult<JournalEntry>;

    /// Delete an entry and its body markers, scoped to its owner.
    ///
    /// Frees the (user, date) slot for re-creation. Fails with
    /// [`StoreError::NotFound`] if the id does not exist or belongs to
    /// another user.
    async fn delete_entry(&self, id: &str, user_id: &str) -> StoreResult<()>;

    /// Persist a new body marker.
    async fn create_marker(&self, draft: MarkerDraft) -> StoreResult<BodyMarker>;

    /// All of a user's body markers, full history, no particular order.
    async fn markers_for_user(&self, user_id: &str) -> StoreResult<Vec<BodyMarker>>;

    /// The body markers recorded with one entry.
    async fn markers_for_entry(&self, entry_id: &str) -> StoreResult<Vec<BodyMarker>>;

    /// Persist a new insight, assigning id and creation timestamp.
    async fn create_insight(&self, draft: InsightDraft) -> StoreResult<Insight>;

    /// Look up one insight by id.
    ///
    /// Fails with [`StoreError::NotFound`] if the insight does not exist.
    async fn insight_by_id(&self, id: &str) -> StoreResult<Insight>;

    /// A user's active insights, descending by confidence.
    async fn active_insights(&self, user_id: &str) -> StoreResult<Vec<Insight>>;

    /// Transition an insight to a new status.
    ///
    /// Fails with [`StoreError::NotFound`] if the insight does not exist.
    async fn update_insight_status(&self, id: &str, status: InsightStatus) -> StoreResult<()>;
}
