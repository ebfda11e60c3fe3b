//! crates/smartdoc_core/src/domain.rs
//!
//! Defines the pure, core data structures for the dashboard client.
//! These structs are independent of any wire or storage format.

use bytes::Bytes;

/// The signed-in user as persisted in client storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

// Represents a user account - read-only from the client's point of view
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub is_admin: bool,
    /// Timestamp exactly as the server sent it.
    pub created_at: String,
}

/// The two document formats the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Txt,
}

impl FileType {
    /// Parses a lowercase-insensitive extension such as `"pdf"`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "text/plain" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Txt => "text/plain",
        }
    }
}

/// Represents a document uploaded by a user, with its analysis if one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: i64,
    pub filename: String,
    pub user_id: i64,
    pub file_type: FileType,
    pub file_size: u64,
    pub uploaded_at: String,
    /// `None` while processing is pending or after it failed.
    pub analysis: Option<AnalysisResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// The backend's sentiment/summary/key-point extraction for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// `None` when the backend stored no label, or one we do not know.
    pub sentiment: Option<Sentiment>,
    pub sentiment_score: f64,
    pub summary: String,
    pub key_points: Vec<String>,
    pub word_count: u64,
}

impl AnalysisResult {
    /// The bucket the member dashboard counts this analysis in.
    pub fn bucket(&self) -> Sentiment {
        self.sentiment.unwrap_or(Sentiment::Neutral)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentBreakdown {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentBreakdown {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }
}

/// Aggregate counts shown on the stat cards. Derived, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_users: u64,
    pub total_documents: u64,
    pub total_analyses: u64,
    pub sentiment_breakdown: SentimentBreakdown,
}

/// A file picked by the user, before it is sent anywhere.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    /// MIME type reported by the picker. Empty when the platform did not know.
    pub declared_type: String,
    pub size: u64,
    pub contents: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, contents: Bytes) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: contents.len() as u64,
            contents,
        }
    }

    /// The part after the last dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// The three pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Admin,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "index.html",
            Self::Admin => "admin.html",
            Self::Dashboard => "dashboard.html",
        }
    }
}
