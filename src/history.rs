//! Per-session interaction history.
//!
//! Each session owns its own log; nothing here is shared between sessions and
//! nothing is persisted once the session ends.

use crate::components::EnsembleClassifier;
use crate::error::ClassifyError;
use crate::verdict::{percent_text, round_percent, EnsembleVerdict, Label};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, Serialize)]
pub struct InteractionRecord {
    pub input_text: String,
    pub label: Label,
    /// Percentage rounded to two decimals.
    pub confidence: f64,
    pub timestamp: DateTime<Local>,
}

impl InteractionRecord {
    pub fn formatted_time(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// First `max_chars` characters of the input, with whitespace runs
    /// collapsed to single spaces, followed by `...`.
    pub fn preview(&self, max_chars: usize) -> String {
        let flattened = self.input_text.split_whitespace().collect::<Vec<_>>().join(" ");
        let head: String = flattened.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/// Append-only, insertion-ordered log owned by one session.
#[derive(Debug, Default)]
pub struct InteractionLog {
    records: Vec<InteractionRecord>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, input_text: &str, verdict: &EnsembleVerdict) -> &InteractionRecord {
        self.push(InteractionRecord {
            input_text: input_text.to_string(),
            label: verdict.final_label,
            confidence: round_percent(verdict.confidence),
            timestamp: Local::now(),
        })
    }

    pub fn push(&mut self, record: InteractionRecord) -> &InteractionRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn entries(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Numbered newest-first listing.
    pub fn render(&self, preview_chars: usize) -> String {
        if self.is_empty() {
            return "No history available yet.".to_string();
        }

        let mut out = String::new();
        for (i, record) in self.newest_first().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} ({}%)",
                i + 1,
                record.label,
                percent_text(record.confidence)
            );
            let _ = writeln!(out, "   {}", record.preview(preview_chars));
            let _ = writeln!(out, "   Time: {}", record.formatted_time());
        }
        out
    }
}

/// One user's interaction context over the shared classifier.
pub struct Session<'a> {
    classifier: &'a EnsembleClassifier,
    log: InteractionLog,
}

impl<'a> Session<'a> {
    pub fn new(classifier: &'a EnsembleClassifier) -> Self {
        Self {
            classifier,
            log: InteractionLog::new(),
        }
    }

    /// Classify and, on success, append to this session's log.
    pub fn analyze(&mut self, text: &str) -> Result<EnsembleVerdict, ClassifyError> {
        let verdict = self.classifier.decide(text)?;
        self.log.record(text, &verdict);
        log::debug!(
            "Session entry {}: {}",
            self.log.len(),
            verdict.summary()
        );
        Ok(verdict)
    }

    pub fn history(&self) -> &InteractionLog {
        &self.log
    }

    pub fn clear_history(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{ModelVerdict, PerModelVerdict};
    use chrono::TimeZone;

    fn verdict(label: Label, confidence: f64) -> EnsembleVerdict {
        EnsembleVerdict {
            final_label: label,
            confidence,
            spam_votes: if label.is_spam() { 3 } else { 0 },
            per_model: vec![PerModelVerdict {
                model: "Naive Bayes".to_string(),
                verdict: ModelVerdict::new(label.is_spam(), confidence),
            }],
        }
    }

    fn record_at(text: &str, label: Label, confidence: f64) -> InteractionRecord {
        InteractionRecord {
            input_text: text.to_string(),
            label,
            confidence,
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut log = InteractionLog::new();
        log.record("first", &verdict(Label::Spam, 2.0 / 3.0));
        log.record("second", &verdict(Label::NotSpam, 0.8833333));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].input_text, "first");
        assert_eq!(log.entries()[0].confidence, 66.67);
        assert_eq!(log.entries()[1].label, Label::NotSpam);
        assert_eq!(log.entries()[1].confidence, 88.33);

        let newest: Vec<&str> = log.newest_first().map(|r| r.input_text.as_str()).collect();
        assert_eq!(newest, vec!["second", "first"]);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let record = record_at(&"é".repeat(200), Label::Spam, 90.0);
        let preview = record.preview(DEFAULT_PREVIEW_CHARS);
        assert_eq!(preview.chars().count(), DEFAULT_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));

        let short = record_at("hi", Label::Spam, 90.0);
        assert_eq!(short.preview(DEFAULT_PREVIEW_CHARS), "hi...");
    }

    #[test]
    fn test_preview_flattens_multi_line_input() {
        let record = record_at("Hi team,\n\n  the agenda\tis attached.\r\nThanks\n", Label::NotSpam, 90.0);
        assert_eq!(
            record.preview(DEFAULT_PREVIEW_CHARS),
            "Hi team, the agenda is attached. Thanks..."
        );
        assert_eq!(record.preview(8), "Hi team,...");

        let mut log = InteractionLog::new();
        log.push(record);
        assert_eq!(log.render(DEFAULT_PREVIEW_CHARS).lines().count(), 3);
    }

    #[test]
    fn test_render() {
        let mut log = InteractionLog::new();
        assert_eq!(log.render(DEFAULT_PREVIEW_CHARS), "No history available yet.");

        log.push(record_at("Meeting notes attached", Label::NotSpam, 88.33));
        log.push(record_at("WIN a FREE cruise", Label::Spam, 66.67));
        let rendered = log.render(DEFAULT_PREVIEW_CHARS);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "1. SPAM (66.67%)");
        assert_eq!(lines[1], "   WIN a FREE cruise...");
        assert_eq!(lines[2], "   Time: 2024-03-09 14:05:00");
        assert_eq!(lines[3], "2. NOT SPAM (88.33%)");
    }

    #[test]
    fn test_clear() {
        let mut log = InteractionLog::new();
        log.push(record_at("x", Label::Spam, 50.0));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_sessions_do_not_share_logs() {
        let mut a = InteractionLog::new();
        let b = InteractionLog::new();
        a.push(record_at("only in a", Label::Spam, 70.0));
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
