pub mod domain;
pub mod ports;

pub use domain::{
    AnalysisResult, DocumentRecord, FileType, Route, Sentiment, SentimentBreakdown, Session,
    StatsSnapshot, UploadFile, UserProfile,
};
pub use ports::{
    ConfirmPrompt, DialogService, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    Navigator, Notice, NoticeKind, PageView, PortError, PortResult, RequestBody, SessionStore,
};
