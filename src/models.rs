use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one shared document. Records are seeded or
/// imported once at startup and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub views: u64,
    pub unique_viewers: u64,
    pub avg_time_spent_secs: u32,
    pub last_viewed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub page_count: u32,
}

/// One day of the 7-day view trend. `label` is the short weekday name.
#[derive(Debug, Clone, Serialize)]
pub struct DailyViewPoint {
    pub label: String,
    pub views: u64,
}

/// Synthesized engagement for a single page of a document.
#[derive(Debug, Clone, Serialize)]
pub struct PageEngagementPoint {
    pub page: u32,
    pub avg_time_secs: u32,
    pub views: u64,
}

/// Category of a viewer action, matching what the timeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Opened,
    ViewedPage,
    Skipped,
    Downloaded,
    Returned,
}

/// A discrete viewer action in a document's activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Registry-wide totals shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementOverview {
    pub document_count: usize,
    pub total_views: u64,
    pub total_unique_viewers: u64,
    pub avg_time_spent_secs: u32,
}
