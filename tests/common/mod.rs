#![allow(dead_code)]

use serde_json::json;
use spam_ensemble::config::Config;
use std::path::Path;
use tempfile::TempDir;

pub const TERMS: [&str; 6] = ["free", "prize", "winner", "meeting", "agenda", "invoice"];

/// Writes a consistent set of four artifacts into `dir`.
pub fn write_artifacts(dir: &Path) {
    let vocabulary: serde_json::Map<String, serde_json::Value> = TERMS
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), json!(i)))
        .collect();

    write(
        dir,
        "vectorizer.json",
        json!({
            "vocabulary": vocabulary,
            "idf": [1.5, 1.8, 2.0, 1.2, 1.7, 1.1],
            "lowercase": true,
            "token_pattern": "(?u)\\b\\w\\w+\\b",
            "sublinear_tf": false,
            "norm": "l2"
        }),
    );

    let spam: Vec<f64> = [0.3f64, 0.3, 0.3, 0.04, 0.03, 0.03].iter().map(|p| p.ln()).collect();
    let ham: Vec<f64> = [0.03f64, 0.03, 0.04, 0.3, 0.3, 0.3].iter().map(|p| p.ln()).collect();
    write(
        dir,
        "naive_bayes_model.json",
        json!({
            "classes": [0, 1],
            "class_log_prior": [0.6f64.ln(), 0.4f64.ln()],
            "feature_log_prob": [ham, spam]
        }),
    );

    write(
        dir,
        "logistic_regression_model.json",
        json!({
            "classes": [0, 1],
            "coef": [4.0, 4.0, 4.0, -4.0, -4.0, -4.0],
            "intercept": -0.3
        }),
    );

    write(
        dir,
        "svm.json",
        json!({
            "classes": [0, 1],
            "coef": [2.5, 2.5, 2.5, -2.5, -2.5, -2.5],
            "intercept": -0.1
        }),
    );
}

pub fn write(dir: &Path, name: &str, value: serde_json::Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

pub fn model_dir() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path());
    let mut config = Config::default();
    config.artifacts.model_dir = dir.path().to_str().unwrap().to_string();
    (dir, config)
}
