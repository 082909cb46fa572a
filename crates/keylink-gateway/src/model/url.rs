use jiff::Timestamp;
use keylink_core::UrlRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub target_url: String,
}

/// A record as shown to its owner.
#[derive(Debug, Serialize)]
pub struct UrlInfo {
    pub target_url: String,
    pub is_active: bool,
    pub clicks: u64,
    pub created_at: Timestamp,
    /// The public short link.
    pub url: String,
    /// The admin link carrying the secret key.
    pub admin_url: String,
}

impl UrlInfo {
    pub fn from_record(record: UrlRecord, base_url: &str) -> Self {
        Self {
            url: record.key.to_url(base_url),
            admin_url: record.secret_key.to_admin_url(base_url),
            target_url: record.target_url,
            is_active: record.is_active,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
