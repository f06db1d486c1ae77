use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectorRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Platform tags, stored as TEXT[] in declaration order.
    pub platforms: Vec<String>,
    pub prompt_template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub sector_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
