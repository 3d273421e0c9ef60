#![allow(clippy::uninlined_format_args)]

use spam_ensemble::classifiers::{
    ClassLabel, LinearSvmArtifact, LogisticRegressionArtifact, NaiveBayesArtifact,
};
use spam_ensemble::config::EnsembleConfig;
use spam_ensemble::features::VectorizerArtifact;
use spam_ensemble::{EnsembleClassifier, PretrainedArtifacts, Session};
use std::collections::HashMap;

const TERMS: [&str; 8] = [
    "free", "winner", "prize", "click", "meeting", "project", "tomorrow", "report",
];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Running the ensemble against a small in-memory model set...");
    println!();

    let vocabulary: HashMap<String, usize> = TERMS
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i))
        .collect();
    let vectorizer = VectorizerArtifact::new(vocabulary, vec![1.4, 1.9, 1.8, 1.2, 1.3, 1.5, 1.1, 1.6]);

    // First four terms lean spam, last four lean ham
    let spam_row: Vec<f64> = [0.2, 0.2, 0.2, 0.2, 0.05, 0.05, 0.05, 0.05]
        .iter()
        .map(|p: &f64| p.ln())
        .collect();
    let ham_row: Vec<f64> = spam_row.iter().rev().copied().collect();
    let classes = vec![ClassLabel::Int(0), ClassLabel::Int(1)];

    let naive_bayes = NaiveBayesArtifact {
        classes: classes.clone(),
        class_log_prior: vec![0.6f64.ln(), 0.4f64.ln()],
        feature_log_prob: vec![ham_row, spam_row],
    };
    let logistic_regression = LogisticRegressionArtifact {
        classes: classes.clone(),
        coef: vec![3.0, 3.0, 3.0, 3.0, -3.0, -3.0, -3.0, -3.0],
        intercept: -0.5,
    };
    let svm = LinearSvmArtifact {
        classes,
        coef: vec![2.0, 2.0, 2.0, 2.0, -2.0, -2.0, -2.0, -2.0],
        intercept: -0.2,
    };

    let config = EnsembleConfig::default();
    let artifacts = PretrainedArtifacts::from_parts(
        vectorizer,
        naive_bayes,
        logistic_regression,
        svm,
        &config.spam_label,
    )?;
    let classifier = EnsembleClassifier::from_artifacts(&artifacts, &config);
    let mut session = Session::new(&classifier);

    let emails = [
        "Congratulations WINNER! Click here to claim your FREE prize",
        "Project meeting moved to tomorrow, please review the report",
        "Free lunch at the project meeting tomorrow",
        "   ",
    ];

    for email in emails {
        println!("📧 {:?}", email);
        match session.analyze(email) {
            Ok(verdict) => {
                print!("{}", verdict);
                println!("   {}", verdict.reasoning());
            }
            Err(e) => println!("⚠️  {}", e),
        }
        println!();
    }

    println!("📜 Session history:");
    print!("{}", session.history().render(60));

    Ok(())
}
