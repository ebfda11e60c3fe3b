//! services/dashboard/src/web/records.rs
//!
//! The JSON shapes the REST API sends and receives. These "impure" wire
//! records are converted into core domain values at the edge so nothing past
//! the loaders ever sees raw JSON.

use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use smartdoc_core::domain::{
    AnalysisResult, DocumentRecord, FileType, Sentiment, SentimentBreakdown, StatsSnapshot,
    UserProfile,
};
use smartdoc_core::ports::{PortError, PortResult};
use tracing::warn;

/// Decodes a JSON response body.
pub fn decode<T: DeserializeOwned>(body: &Bytes) -> PortResult<T> {
    serde_json::from_slice(body).map_err(|e| PortError::Decode(e.to_string()))
}

//=========================================================================================
// Entity Records
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserRecord {
    pub fn to_domain(self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            is_admin: self.is_admin,
            created_at: self.created_at.unwrap_or_default(),
        }
    }

    pub fn from_domain(user: &UserProfile) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            created_at: Some(user.created_at.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    /// A JSON-encoded array of strings, stored as text by the backend.
    #[serde(default)]
    pub key_points: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
}

impl AnalysisRecord {
    pub fn to_domain(self) -> AnalysisResult {
        let sentiment = self.sentiment.as_deref().and_then(|label| {
            let sentiment = Sentiment::from_label(label);
            if sentiment.is_none() {
                warn!("Unrecognised sentiment label {:?}", label);
            }
            sentiment
        });

        AnalysisResult {
            sentiment,
            sentiment_score: self.sentiment_score.unwrap_or(0.0),
            summary: self.summary.unwrap_or_default(),
            key_points: parse_key_points(self.key_points.as_deref()),
            word_count: self.word_count.unwrap_or(0),
        }
    }
}

/// Missing or empty text means no key points; so does anything that is not a
/// JSON array of strings.
fn parse_key_points(raw: Option<&str>) -> Vec<String> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Vec::new(),
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(points) => points,
        Err(e) => {
            warn!("Discarding undecodable key points: {}", e);
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentWire {
    pub id: i64,
    pub filename: String,
    pub user_id: i64,
    pub file_type: String,
    pub file_size: u64,
    pub uploaded_at: String,
    #[serde(default)]
    pub analysis: Option<AnalysisRecord>,
}

impl DocumentWire {
    pub fn to_domain(self) -> PortResult<DocumentRecord> {
        let file_type = FileType::from_extension(&self.file_type).ok_or_else(|| {
            PortError::Decode(format!(
                "Document {} has unsupported file type '{}'",
                self.id, self.file_type
            ))
        })?;
        Ok(DocumentRecord {
            id: self.id,
            filename: self.filename,
            user_id: self.user_id,
            file_type,
            file_size: self.file_size,
            uploaded_at: self.uploaded_at,
            analysis: self.analysis.map(AnalysisRecord::to_domain),
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BreakdownRecord {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatsRecord {
    pub total_users: u64,
    pub total_documents: u64,
    pub total_analyses: u64,
    pub sentiment_breakdown: BreakdownRecord,
}

impl StatsRecord {
    pub fn to_domain(self) -> StatsSnapshot {
        StatsSnapshot {
            total_users: self.total_users,
            total_documents: self.total_documents,
            total_analyses: self.total_analyses,
            sentiment_breakdown: SentimentBreakdown {
                positive: self.sentiment_breakdown.positive,
                neutral: self.sentiment_breakdown.neutral,
                negative: self.sentiment_breakdown.negative,
            },
        }
    }
}

//=========================================================================================
// Response Envelopes
//=========================================================================================

#[derive(Debug, Deserialize)]
pub struct UsersEnvelope {
    pub users: Vec<UserRecord>,
}

impl UsersEnvelope {
    pub fn to_domain(self) -> Vec<UserProfile> {
        self.users.into_iter().map(UserRecord::to_domain).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentsEnvelope {
    pub documents: Vec<DocumentWire>,
}

impl DocumentsEnvelope {
    pub fn to_domain(self) -> PortResult<Vec<DocumentRecord>> {
        self.documents
            .into_iter()
            .map(DocumentWire::to_domain)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsEnvelope {
    pub stats: StatsRecord,
}

/// The failure shape every endpoint shares. Success bodies decode to an
/// empty `error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthEnvelope {
    pub access_token: String,
    pub user: UserRecord,
}

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}
