//! services/dashboard/src/web/stats.rs
//!
//! Stat-card derivation and binding for both dashboards.

use smartdoc_core::domain::{DocumentRecord, SentimentBreakdown, StatsSnapshot};
use smartdoc_core::ports::PageView;

/// Counts a member's own documents. Documents without an analysis are in the
/// total but in no sentiment bucket.
pub fn derive_member_stats(documents: &[DocumentRecord]) -> StatsSnapshot {
    let mut breakdown = SentimentBreakdown::default();
    let mut analysed = 0;
    for analysis in documents.iter().filter_map(|doc| doc.analysis.as_ref()) {
        breakdown.record(analysis.bucket());
        analysed += 1;
    }
    StatsSnapshot {
        total_users: 0,
        total_documents: documents.len() as u64,
        total_analyses: analysed,
        sentiment_breakdown: breakdown,
    }
}

/// Progress-bar widths in percent, one decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentShares {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentShares {
    pub fn of(breakdown: &SentimentBreakdown) -> Self {
        // An empty breakdown divides by 1 instead of 0.
        let total = breakdown.total().max(1) as f64;
        let share = |count: u64| (count as f64 / total * 1000.0).round() / 10.0;
        Self {
            positive: share(breakdown.positive),
            neutral: share(breakdown.neutral),
            negative: share(breakdown.negative),
        }
    }
}

fn bind_shares(view: &dyn PageView, breakdown: &SentimentBreakdown) {
    let shares = SentimentShares::of(breakdown);
    for (id, pct) in [
        ("positiveBar", shares.positive),
        ("neutralBar", shares.neutral),
        ("negativeBar", shares.negative),
    ] {
        view.set_style(id, "width", &format!("{}%", pct));
    }
}

pub fn bind_admin_stats(view: &dyn PageView, stats: &StatsSnapshot) {
    let breakdown = &stats.sentiment_breakdown;

    // Overview cards
    view.set_text("totalUsers", &stats.total_users.to_string());
    view.set_text("totalDocs", &stats.total_documents.to_string());
    view.set_text("totalAnalyses", &stats.total_analyses.to_string());
    view.set_text("positiveDocs", &breakdown.positive.to_string());

    // Analytics tab
    view.set_text("positiveCount", &breakdown.positive.to_string());
    view.set_text("neutralCount", &breakdown.neutral.to_string());
    view.set_text("negativeCount", &breakdown.negative.to_string());
    view.set_text("analyticsUsers", &stats.total_users.to_string());
    view.set_text("analyticsDocuments", &stats.total_documents.to_string());
    view.set_text("analyticsAnalyses", &stats.total_analyses.to_string());
    bind_shares(view, breakdown);
}

pub fn bind_member_stats(view: &dyn PageView, stats: &StatsSnapshot) {
    let breakdown = &stats.sentiment_breakdown;
    view.set_text("totalDocs", &stats.total_documents.to_string());
    view.set_text("positiveDocs", &breakdown.positive.to_string());
    view.set_text("neutralDocs", &breakdown.neutral.to_string());
    view.set_text("negativeDocs", &breakdown.negative.to_string());
    bind_shares(view, breakdown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SnapshotView;
    use smartdoc_core::domain::{AnalysisResult, FileType, Sentiment};

    fn doc(sentiment: Option<Sentiment>) -> DocumentRecord {
        DocumentRecord {
            id: 1,
            filename: "a.txt".into(),
            user_id: 1,
            file_type: FileType::Txt,
            file_size: 10,
            uploaded_at: String::new(),
            analysis: sentiment.map(|sentiment| AnalysisResult {
                sentiment: Some(sentiment),
                sentiment_score: 0.0,
                summary: String::new(),
                key_points: Vec::new(),
                word_count: 0,
            }),
        }
    }

    #[test]
    fn unanalysed_documents_count_in_total_only() {
        let docs = vec![
            doc(Some(Sentiment::Positive)),
            doc(Some(Sentiment::Positive)),
            doc(Some(Sentiment::Negative)),
            doc(None),
        ];
        let stats = derive_member_stats(&docs);
        assert_eq!(stats.total_documents, 4);
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.sentiment_breakdown.positive, 2);
        assert_eq!(stats.sentiment_breakdown.neutral, 0);
        assert_eq!(stats.sentiment_breakdown.negative, 1);
    }

    #[test]
    fn unlabelled_analysis_counts_as_neutral() {
        let mut unlabelled = doc(Some(Sentiment::Positive));
        if let Some(analysis) = unlabelled.analysis.as_mut() {
            analysis.sentiment = None;
        }
        let stats = derive_member_stats(&[unlabelled]);
        assert_eq!(stats.total_analyses, 1);
        assert_eq!(stats.sentiment_breakdown.neutral, 1);
        assert_eq!(stats.sentiment_breakdown.positive, 0);
    }

    #[test]
    fn shares_with_zero_total_do_not_divide_by_zero() {
        let shares = SentimentShares::of(&SentimentBreakdown::default());
        assert_eq!(shares.positive, 0.0);
        assert_eq!(shares.neutral, 0.0);
        assert_eq!(shares.negative, 0.0);
    }

    #[test]
    fn shares_round_to_one_decimal() {
        let shares = SentimentShares::of(&SentimentBreakdown {
            positive: 1,
            neutral: 1,
            negative: 1,
        });
        assert_eq!(shares.positive, 33.3);
    }

    #[test]
    fn member_binding_sets_cards_and_bars() {
        let view = SnapshotView::default();
        let stats = derive_member_stats(&[doc(Some(Sentiment::Neutral)), doc(None)]);
        bind_member_stats(&view, &stats);
        assert_eq!(view.text("totalDocs").as_deref(), Some("2"));
        assert_eq!(view.text("neutralDocs").as_deref(), Some("1"));
        assert_eq!(view.style("neutralBar", "width").as_deref(), Some("100%"));
        assert_eq!(view.style("positiveBar", "width").as_deref(), Some("0%"));
    }
}
