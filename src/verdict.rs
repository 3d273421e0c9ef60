//! Verdict types and their text rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Spam,
    NotSpam,
}

impl Label {
    pub fn from_spam(is_spam: bool) -> Self {
        if is_spam {
            Label::Spam
        } else {
            Label::NotSpam
        }
    }

    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }

    /// Label used for the final decision.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Spam => "SPAM",
            Label::NotSpam => "NOT SPAM",
        }
    }

    /// Label used for an individual model.
    pub fn as_model_str(self) -> &'static str {
        match self {
            Label::Spam => "Spam",
            Label::NotSpam => "Not Spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One model's normalized output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub is_spam: bool,
    pub spam_probability: f64,
}

impl ModelVerdict {
    pub fn new(is_spam: bool, spam_probability: f64) -> Self {
        Self {
            is_spam,
            spam_probability: spam_probability.clamp(0.0, 1.0),
        }
    }

    pub fn label(&self) -> Label {
        Label::from_spam(self.is_spam)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerModelVerdict {
    pub model: String,
    #[serde(flatten)]
    pub verdict: ModelVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleVerdict {
    pub final_label: Label,
    /// Mean support for `final_label` across the models.
    pub confidence: f64,
    pub spam_votes: u8,
    /// In model declaration order.
    pub per_model: Vec<PerModelVerdict>,
}

impl EnsembleVerdict {
    pub fn confidence_percent(&self) -> f64 {
        round_percent(self.confidence)
    }

    /// `SPAM (66.67%)`
    pub fn summary(&self) -> String {
        format!("{} ({}%)", self.final_label, format_percent(self.confidence))
    }

    pub fn reasoning(&self) -> String {
        let voters: Vec<&str> = self
            .per_model
            .iter()
            .filter(|m| m.verdict.is_spam)
            .map(|m| m.model.as_str())
            .collect();

        if voters.is_empty() {
            format!("0 of {} models voted spam", self.per_model.len())
        } else {
            format!(
                "{} of {} models voted spam: {}",
                self.spam_votes,
                self.per_model.len(),
                voters.join(", ")
            )
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EnsembleVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Decision: {}", self.summary())?;
        for result in &self.per_model {
            writeln!(
                f,
                "  {}: {} (spam probability {}%)",
                result.model,
                result.verdict.label().as_model_str(),
                format_percent(result.verdict.spam_probability)
            )?;
        }
        Ok(())
    }
}

/// Probability as a percentage rounded to two decimals.
pub fn round_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

/// Rounded percentage without trailing zeros: `66.67`, `90.0`, `100.0`.
pub fn format_percent(probability: f64) -> String {
    percent_text(round_percent(probability))
}

/// Text for an already rounded percentage.
pub fn percent_text(rounded: f64) -> String {
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        let text = format!("{:.2}", rounded);
        text.trim_end_matches('0').to_string()
    }
}
