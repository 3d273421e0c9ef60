use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use spam_ensemble::config::{Config, LoggingConfig, DEFAULT_CONFIG_PATH};
use spam_ensemble::features::FeatureExtractor;
use spam_ensemble::{ClassifyError, EnsembleClassifier, EnsembleVerdict, Label, PretrainedArtifacts, Session};
use std::io::{self, BufRead, Write};
use std::process;

fn main() {
    let matches = Command::new("spam-ensemble")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Spam email detection by majority vote of three pretrained classifiers")
        .long_about("Spam Ensemble - classifies email text as SPAM or NOT SPAM:\n\
                    • Naive Bayes, Logistic Regression and SVM over a shared TF-IDF vectorizer\n\
                    • Majority vote (2 of 3) with confidence for the winning label\n\
                    • Per-model detail and an in-memory session history")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Load configuration and artifacts, then report what was loaded")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Classify the given email text")
                .conflicts_with("file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Classify the contents of an email file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start an interactive session reading email text from stdin")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print verdicts as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with per-model detail")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        init_logging(verbose, None);
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);

    let loaded = load_config(config_path);
    init_logging(
        verbose,
        loaded
            .as_ref()
            .ok()
            .and_then(|(config, _)| config.logging.as_ref()),
    );

    let config = match loaded {
        Ok((config, found)) => {
            if !found {
                log::warn!("Configuration file '{config_path}' not found, using default configuration");
            }
            config
        }
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let artifacts = match PretrainedArtifacts::load(&config.artifacts, &config.ensemble.spam_label)
        .with_context(|| format!("Failed to load models from '{}'", config.artifacts.model_dir))
    {
        Ok(artifacts) => artifacts,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
    };

    let classifier = EnsembleClassifier::from_artifacts(&artifacts, &config.ensemble);

    if matches.get_flag("test-config") {
        print_loaded_configuration(&config, &artifacts, &classifier);
        return;
    }

    let json = matches.get_flag("json");

    if let Some(text) = matches.get_one::<String>("text") {
        process::exit(classify_once(&classifier, text, json));
    }

    if let Some(path) = matches.get_one::<String>("file") {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("❌ Error reading email file {path}: {e}");
                process::exit(1);
            }
        };
        process::exit(classify_once(&classifier, &text, json));
    }

    if matches.get_flag("interactive") {
        if let Err(e) = run_interactive(&classifier, &config, json) {
            log::error!("Interactive session failed: {e:#}");
            process::exit(1);
        }
        return;
    }

    eprintln!("Nothing to classify. Use --text, --file or --interactive (see --help).");
    process::exit(2);
}

fn init_logging(verbose: bool, logging: Option<&LoggingConfig>) {
    let mut builder = env_logger::Builder::from_default_env();

    if verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        let level = logging
            .and_then(|l| l.level.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        builder.filter_level(level);
    }

    builder.init();
}

/// Returns the config and whether the file existed.
fn load_config(path: &str) -> anyhow::Result<(Config, bool)> {
    if std::path::Path::new(path).exists() {
        let config = Config::from_file(path)
            .with_context(|| format!("Invalid configuration file '{path}'"))?;
        Ok((config, true))
    } else {
        Ok((Config::default(), false))
    }
}

fn generate_default_config(path: &str) {
    match Config::generated().to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Point artifacts.model_dir at the directory holding the exported models.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn print_loaded_configuration(
    config: &Config,
    artifacts: &PretrainedArtifacts,
    classifier: &EnsembleClassifier,
) {
    println!("🔍 Testing configuration...");
    println!();
    println!("Model directory: {}", config.artifacts.model_dir);
    println!(
        "Vectorizer: {} terms ({})",
        artifacts.vectorizer.vocabulary_size(),
        artifacts.vectorizer.name()
    );
    println!("Feature count: {}", artifacts.feature_count());
    println!("Models: {}", classifier.model_names().join(", "));
    println!(
        "Logistic regression threshold: {}",
        config.ensemble.logistic_regression_threshold
    );
    println!(
        "Spam votes required: {} of 3",
        config.ensemble.spam_votes_required
    );
    println!("Spam label: {}", config.ensemble.spam_label);
    println!("✅ Artifacts loaded and compatible");
}

/// A line holding only this ends the email being pasted.
const END_OF_EMAIL: &str = ".";

fn classify_once(classifier: &EnsembleClassifier, text: &str, json: bool) -> i32 {
    match classifier.decide(text) {
        Ok(verdict) => {
            if let Err(e) = print_verdict(&mut io::stdout(), &verdict, json) {
                log::error!("Failed to write verdict: {e}");
                return 1;
            }
            0
        }
        Err(e) => report_error(&e),
    }
}

fn print_verdict<W: Write>(out: &mut W, verdict: &EnsembleVerdict, json: bool) -> io::Result<()> {
    if json {
        match verdict.to_json() {
            Ok(text) => writeln!(out, "{text}")?,
            Err(e) => log::error!("Failed to serialize verdict: {e}"),
        }
        return Ok(());
    }

    let icon = match verdict.final_label {
        Label::Spam => "🚨",
        Label::NotSpam => "✅",
    };
    write!(out, "{icon} {verdict}")?;
    log::debug!("{}", verdict.reasoning());
    Ok(())
}

fn report_error(error: &ClassifyError) -> i32 {
    if error.is_user_correctable() {
        eprintln!("⚠️  {error}");
        2
    } else {
        log::error!("Classification failed: {error}");
        eprintln!("❌ {error}");
        1
    }
}

fn run_interactive(
    classifier: &EnsembleClassifier,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new(classifier);

    println!("📧 Spam Email Detection");
    println!("Paste email content and finish with a line containing only '{END_OF_EMAIL}'.");
    println!("Commands: :history  :clear  :quit");

    let stdin = io::stdin();
    run_session(
        &mut session,
        stdin.lock(),
        &mut io::stdout(),
        config.session.history_preview_chars,
        json,
    )?;

    log::info!(
        "Session ended after {} analyses; history discarded",
        session.history().len()
    );
    Ok(())
}

/// Reads emails from `input` until `:quit` or EOF. Blank lines stay part of
/// the email; only the end marker or EOF submits it.
fn run_session<R: BufRead, W: Write>(
    session: &mut Session<'_>,
    input: R,
    out: &mut W,
    preview_chars: usize,
    json: bool,
) -> anyhow::Result<()> {
    let mut buffer = String::new();
    prompt(out)?;

    for line in input.lines() {
        let line = line.context("Failed to read from stdin")?;

        if buffer.is_empty() {
            match line.trim() {
                ":quit" | ":q" => return Ok(()),
                ":history" => {
                    writeln!(out, "📜 Analysis History")?;
                    write!(out, "{}", session.history().render(preview_chars))?;
                    writeln!(out)?;
                    prompt(out)?;
                    continue;
                }
                ":clear" => {
                    session.clear_history();
                    writeln!(out, "History cleared.")?;
                    prompt(out)?;
                    continue;
                }
                // Blank lines before the email starts
                "" => continue,
                _ => {}
            }
        }

        if line.trim_end() == END_OF_EMAIL {
            analyze_block(session, &buffer, out, json)?;
            buffer.clear();
            prompt(out)?;
            continue;
        }

        buffer.push_str(&line);
        buffer.push('\n');
    }

    if !buffer.trim().is_empty() {
        analyze_block(session, &buffer, out, json)?;
    }
    Ok(())
}

fn analyze_block<W: Write>(
    session: &mut Session<'_>,
    text: &str,
    out: &mut W,
    json: bool,
) -> io::Result<()> {
    match session.analyze(text) {
        Ok(verdict) => print_verdict(out, &verdict, json),
        Err(e) => {
            report_error(&e);
            Ok(())
        }
    }
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
