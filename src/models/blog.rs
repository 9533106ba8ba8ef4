use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A full blog row, including the generated article body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// The listing projection: no article body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogSummary {
    pub id: i64,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub read: bool,
}
