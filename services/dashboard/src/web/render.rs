//! services/dashboard/src/web/render.rs
//!
//! Renderers for the users table, the admin documents table and the member
//! document cards.
//!
//! Each renderer works in two steps: records are first mapped to plain view
//! models (testable without any page), then the view models are turned into
//! HTML fragments for `PageView::set_html`. Empty input always renders a
//! single placeholder, never an empty container.

use smartdoc_core::domain::{DocumentRecord, FileType, Sentiment, UserProfile};

use crate::web::format::{format_date, format_file_size};

//=========================================================================================
// Badges
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Green,
    Red,
    Yellow,
    Gray,
    Blue,
    Cyan,
}

impl BadgeColor {
    /// The stylesheet class for this color.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Green => "bg-success",
            Self::Red => "bg-danger",
            Self::Yellow => "bg-warning",
            Self::Gray => "bg-secondary",
            Self::Blue => "bg-primary",
            Self::Cyan => "bg-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub color: BadgeColor,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Fixed sentiment table; `None` is a document without an analysis.
pub fn sentiment_badge(sentiment: Option<Sentiment>) -> Badge {
    match sentiment {
        Some(Sentiment::Positive) => Badge {
            color: BadgeColor::Green,
            label: "Positive",
            icon: "😊",
        },
        Some(Sentiment::Negative) => Badge {
            color: BadgeColor::Red,
            label: "Negative",
            icon: "😞",
        },
        Some(Sentiment::Neutral) => Badge {
            color: BadgeColor::Yellow,
            label: "Neutral",
            icon: "😐",
        },
        None => Badge {
            color: BadgeColor::Gray,
            label: "N/A",
            icon: "",
        },
    }
}

pub fn role_badge(is_admin: bool) -> Badge {
    if is_admin {
        Badge {
            color: BadgeColor::Red,
            label: "Admin",
            icon: "",
        }
    } else {
        Badge {
            color: BadgeColor::Blue,
            label: "User",
            icon: "",
        }
    }
}

fn file_icon(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Pdf => "fa-file-pdf",
        FileType::Txt => "fa-file-alt",
    }
}

//=========================================================================================
// View Models
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    DeleteUser(i64),
    DeleteDocument(i64),
    /// Admin accounts cannot be deleted from the table.
    Protected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Badge,
    pub created: String,
    pub action: RowAction,
}

impl UserRow {
    pub fn from_domain(user: &UserProfile) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: role_badge(user.is_admin),
            created: format_date(&user.created_at),
            action: if user.is_admin {
                RowAction::Protected
            } else {
                RowAction::DeleteUser(user.id)
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub id: i64,
    pub filename: String,
    pub owner_id: i64,
    pub type_label: String,
    pub size: String,
    pub sentiment: Badge,
    pub uploaded: String,
    pub action: RowAction,
}

impl DocumentRow {
    pub fn from_domain(doc: &DocumentRecord) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            owner_id: doc.user_id,
            type_label: doc.file_type.as_str().to_uppercase(),
            size: format_file_size(doc.file_size),
            sentiment: sentiment_badge(doc.analysis.as_ref().and_then(|a| a.sentiment)),
            uploaded: format_date(&doc.uploaded_at),
            action: RowAction::DeleteDocument(doc.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub badge: Badge,
    pub sentiment_class: String,
    pub score: f64,
    pub summary: String,
    pub key_points: Vec<String>,
    pub word_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCard {
    pub id: i64,
    pub filename: String,
    pub icon: &'static str,
    pub uploaded: String,
    pub size: String,
    /// `None` renders the compact "pending or failed" card.
    pub analysis: Option<AnalysisView>,
    pub action: RowAction,
}

impl DocumentCard {
    pub fn from_domain(doc: &DocumentRecord) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            icon: file_icon(doc.file_type),
            uploaded: format_date(&doc.uploaded_at),
            size: format_file_size(doc.file_size),
            analysis: doc.analysis.as_ref().map(|a| AnalysisView {
                badge: sentiment_badge(Some(a.bucket())),
                sentiment_class: format!("sentiment-{}", a.bucket().as_str()),
                score: a.sentiment_score,
                summary: a.summary.clone(),
                key_points: a.key_points.clone(),
                word_count: a.word_count,
            }),
            action: RowAction::DeleteDocument(doc.id),
        }
    }
}

//=========================================================================================
// HTML Fragments
//=========================================================================================

pub fn users_table_body(users: &[UserProfile]) -> String {
    if users.is_empty() {
        return placeholder_row(6, "No users found");
    }

    let mut rows = String::new();
    for row in users.iter().map(UserRow::from_domain) {
        rows.push_str(&format!(
            r#"
        <tr>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
        </tr>"#,
            row.id,
            html_escape(&row.full_name),
            html_escape(&row.email),
            badge_html(&row.role),
            row.created,
            action_html(&row.action, false),
        ));
    }
    rows
}

pub fn documents_table_body(documents: &[DocumentRecord]) -> String {
    if documents.is_empty() {
        return placeholder_row(8, "No documents found");
    }

    let mut rows = String::new();
    for row in documents.iter().map(DocumentRow::from_domain) {
        rows.push_str(&format!(
            r#"
        <tr>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td><span class="badge {}">{}</span></td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
        </tr>"#,
            row.id,
            html_escape(&row.filename),
            row.owner_id,
            BadgeColor::Cyan.css_class(),
            row.type_label,
            row.size,
            badge_html(&row.sentiment),
            row.uploaded,
            action_html(&row.action, false),
        ));
    }
    rows
}

pub fn document_cards(documents: &[DocumentRecord]) -> String {
    if documents.is_empty() {
        return r#"
        <div class="empty-state" data-placeholder="documents">
            <i class="fas fa-file-alt"></i>
            <h5>No documents yet</h5>
            <p>Upload your first document to get started!</p>
        </div>"#
            .to_string();
    }

    documents
        .iter()
        .map(DocumentCard::from_domain)
        .map(|card| document_card_html(&card))
        .collect()
}

fn document_card_html(card: &DocumentCard) -> String {
    let Some(analysis) = &card.analysis else {
        return format!(
            r#"
        <div class="card document-card fade-in">
            <div class="card-body">
                <h5><i class="fas {}"></i> {}</h5>
                <p class="text-muted">Uploaded: {}</p>
                <p class="text-warning">Analysis pending or failed</p>
                {}
            </div>
        </div>"#,
            card.icon,
            html_escape(&card.filename),
            card.uploaded,
            action_html(&card.action, true),
        );
    };

    let key_points = if analysis.key_points.is_empty() {
        String::new()
    } else {
        let items: String = analysis
            .key_points
            .iter()
            .map(|point| format!("<li>{}</li>", html_escape(point)))
            .collect();
        format!(
            r#"
                <div class="col-md-12 mb-3">
                    <h6><i class="fas fa-list-ul me-2"></i>Key Points</h6>
                    <ul class="key-points-list">{}</ul>
                </div>"#,
            items
        )
    };

    format!(
        r#"
        <div class="card document-card fade-in mb-3">
            <div class="document-header">
                <div class="row align-items-center">
                    <div class="col-md-8">
                        <div class="document-icon"><i class="fas {icon}"></i></div>
                        <h4 class="mb-2">{filename}</h4>
                        <p class="mb-0"><i class="fas fa-calendar me-2"></i>{uploaded}</p>
                        <p class="mb-0"><i class="fas fa-file-alt me-2"></i>{size}</p>
                    </div>
                    <div class="col-md-4 text-end">
                        <span class="sentiment-badge {sentiment_class} {color}">{label} {emoji}</span>
                        <p class="mt-2 mb-0">Score: {score}</p>
                    </div>
                </div>
            </div>
            <div class="card-body">
                <div class="row">
                    <div class="col-md-12 mb-3">
                        <h6><i class="fas fa-align-left me-2"></i>Summary</h6>
                        <p>{summary}</p>
                    </div>{key_points}
                    <div class="col-md-12">
                        <div class="d-flex justify-content-between align-items-center">
                            <span class="badge {words_color}"><i class="fas fa-font me-1"></i>{word_count} words</span>
                            {action}
                        </div>
                    </div>
                </div>
            </div>
        </div>"#,
        icon = card.icon,
        filename = html_escape(&card.filename),
        uploaded = card.uploaded,
        size = card.size,
        sentiment_class = analysis.sentiment_class,
        color = analysis.badge.color.css_class(),
        label = analysis.badge.label.to_uppercase(),
        emoji = analysis.badge.icon,
        score = analysis.score,
        summary = html_escape(&analysis.summary),
        key_points = key_points,
        words_color = BadgeColor::Cyan.css_class(),
        word_count = analysis.word_count,
        action = action_html(&card.action, true),
    )
}

fn placeholder_row(colspan: u8, text: &str) -> String {
    format!(
        r#"<tr data-placeholder="rows"><td colspan="{}" class="text-center">{}</td></tr>"#,
        colspan, text
    )
}

fn badge_html(badge: &Badge) -> String {
    format!(
        r#"<span class="badge {}">{}</span>"#,
        badge.color.css_class(),
        badge.label
    )
}

fn action_html(action: &RowAction, labelled: bool) -> String {
    let label = if labelled { " Delete" } else { "" };
    match action {
        RowAction::DeleteUser(id) => format!(
            r#"<button class="btn btn-danger btn-sm" data-action="delete-user" data-id="{}"><i class="fas fa-trash"></i>{}</button>"#,
            id, label
        ),
        RowAction::DeleteDocument(id) => format!(
            r#"<button class="btn btn-danger btn-sm" data-action="delete-document" data-id="{}"><i class="fas fa-trash"></i>{}</button>"#,
            id, label
        ),
        RowAction::Protected => r#"<span class="text-muted">Protected</span>"#.to_string(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartdoc_core::domain::AnalysisResult;

    fn doc(id: i64, sentiment: Option<Sentiment>) -> DocumentRecord {
        DocumentRecord {
            id,
            filename: format!("doc-{}.pdf", id),
            user_id: 3,
            file_type: FileType::Pdf,
            file_size: 1536,
            uploaded_at: "2024-01-05T09:30:00".into(),
            analysis: sentiment.map(|sentiment| AnalysisResult {
                sentiment: Some(sentiment),
                sentiment_score: 0.75,
                summary: "Short summary.".into(),
                key_points: vec!["First".into(), "Second".into()],
                word_count: 420,
            }),
        }
    }

    fn user(id: i64, is_admin: bool) -> UserProfile {
        UserProfile {
            id,
            full_name: format!("User {}", id),
            email: format!("u{}@example.com", id),
            is_admin,
            created_at: "2024-01-05T09:30:00".into(),
        }
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn sentiment_table_is_total() {
        let cases = [
            (Some(Sentiment::Positive), BadgeColor::Green, "Positive", "😊"),
            (Some(Sentiment::Negative), BadgeColor::Red, "Negative", "😞"),
            (Some(Sentiment::Neutral), BadgeColor::Yellow, "Neutral", "😐"),
            (None, BadgeColor::Gray, "N/A", ""),
        ];
        for (sentiment, color, label, icon) in cases {
            let badge = sentiment_badge(sentiment);
            assert_eq!(badge.color, color);
            assert_eq!(badge.label, label);
            assert_eq!(badge.icon, icon);
        }
    }

    #[test]
    fn empty_lists_render_one_placeholder_and_no_actions() {
        for html in [documents_table_body(&[]), document_cards(&[]), users_table_body(&[])] {
            assert_eq!(count(&html, "data-placeholder"), 1);
            assert_eq!(count(&html, "data-action"), 0);
        }
    }

    #[test]
    fn one_delete_action_per_document() {
        let docs: Vec<_> = (1..=5)
            .map(|id| doc(id, if id % 2 == 0 { None } else { Some(Sentiment::Neutral) }))
            .collect();
        for html in [documents_table_body(&docs), document_cards(&docs)] {
            assert_eq!(count(&html, r#"data-action="delete-document""#), docs.len());
            assert_eq!(count(&html, "data-placeholder"), 0);
        }
    }

    #[test]
    fn admin_rows_are_protected() {
        let html = users_table_body(&[user(1, true), user(2, false)]);
        assert_eq!(count(&html, r#"data-action="delete-user" data-id="2""#), 1);
        assert_eq!(count(&html, "Protected"), 1);
        assert!(html.contains(r#"<span class="badge bg-danger">Admin</span>"#));
        assert!(html.contains(r#"<span class="badge bg-primary">User</span>"#));
    }

    #[test]
    fn document_row_view_model() {
        let row = DocumentRow::from_domain(&doc(42, None));
        assert_eq!(row.type_label, "PDF");
        assert_eq!(row.size, "1.5 KB");
        assert_eq!(row.sentiment.label, "N/A");
        assert_eq!(row.uploaded, "Jan 5, 2024, 09:30 AM");
        assert_eq!(row.action, RowAction::DeleteDocument(42));
    }

    #[test]
    fn unlabelled_analysis_is_na_in_table_and_neutral_on_card() {
        let mut unlabelled = doc(11, Some(Sentiment::Positive));
        if let Some(analysis) = unlabelled.analysis.as_mut() {
            analysis.sentiment = None;
        }
        let row = DocumentRow::from_domain(&unlabelled);
        assert_eq!(row.sentiment.label, "N/A");
        assert_eq!(row.sentiment.color, BadgeColor::Gray);

        let html = document_cards(&[unlabelled]);
        assert!(html.contains("sentiment-neutral"));
        assert!(!html.contains("Analysis pending"));
    }

    #[test]
    fn analysed_card_shows_analysis() {
        let html = document_cards(&[doc(8, Some(Sentiment::Positive))]);
        assert!(html.contains("sentiment-positive"));
        assert!(html.contains("POSITIVE 😊"));
        assert!(html.contains("Score: 0.75"));
        assert!(html.contains("<li>First</li><li>Second</li>"));
        assert!(html.contains("420 words"));
        assert!(!html.contains("Analysis pending"));
    }

    #[test]
    fn pending_card_and_empty_key_points() {
        let html = document_cards(&[doc(9, None)]);
        assert!(html.contains("Analysis pending or failed"));

        let mut quiet = doc(10, Some(Sentiment::Negative));
        if let Some(analysis) = quiet.analysis.as_mut() {
            analysis.key_points.clear();
        }
        let html = document_cards(&[quiet]);
        assert!(!html.contains("Key Points"));
        assert!(html.contains("NEGATIVE 😞"));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let mut risky = doc(11, None);
        risky.filename = "<script>alert(1)</script>.txt".into();
        let html = documents_table_body(&[risky]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
