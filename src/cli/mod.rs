//! Command-line interface for lectern.
//!
//! Provides commands for checking content files, browsing and searching the
//! catalog, and watching the content directory for changes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::{build_catalog, BuildReport, QueryService, SearchField, SharedCatalog, Store};
use crate::config;
use crate::content::{ContentWatcher, DirectorySource, TopicSource, WatcherConfig};
use crate::domain::Topic;

/// lectern - Validated catalog of OS and database study topics
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content directory (overrides config and LECTERN_CONTENT)
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the catalog and print the build report
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Exit non-zero if any topic was rejected
        #[arg(long)]
        strict: bool,
    },

    /// List topics in catalog order
    List {
        /// Number of topics to skip
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,

        /// Maximum number of topics to show (defaults to the configured page size)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Show one topic
    Show {
        /// Topic ID
        topic_id: String,

        /// Show code examples, resources and questions in full
        #[arg(short, long)]
        full: bool,
    },

    /// Search topics by keyword
    Search {
        /// Search term (case-insensitive)
        term: String,

        /// Fields to search (repeatable; defaults to title and summary)
        #[arg(short, long = "field", value_enum)]
        fields: Vec<FieldArg>,
    },

    /// Rebuild the catalog whenever content files change
    Watch,

    /// Show resolved configuration (debug)
    Config,
}

/// Search field for CLI (maps to SearchField)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FieldArg {
    Title,
    Summary,
    Explanation,
}

impl From<FieldArg> for SearchField {
    fn from(f: FieldArg) -> Self {
        match f {
            FieldArg::Title => SearchField::Title,
            FieldArg::Summary => SearchField::Summary,
            FieldArg::Explanation => SearchField::Explanation,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let content = self.content;
        match self.command {
            Commands::Check { json, strict } => check_content(content, json, strict).await,
            Commands::List { offset, limit } => list_topics(content, offset, limit).await,
            Commands::Show { topic_id, full } => show_topic(content, &topic_id, full).await,
            Commands::Search { term, fields } => search_topics(content, &term, fields).await,
            Commands::Watch => watch_content(content).await,
            Commands::Config => show_config(content),
        }
    }
}

/// Pick the content directory: flag, then config
fn resolve_content_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir),
        None => config::content_dir(),
    }
}

/// Load content files and build the catalog
async fn load_catalog(flag: Option<PathBuf>) -> Result<(Store, BuildReport)> {
    let dir = resolve_content_dir(flag)?;
    let source = DirectorySource::new(&dir);
    let raw = source
        .load()
        .await
        .with_context(|| format!("Failed to load content from {}", dir.display()))?;
    Ok(build_catalog(raw))
}

/// Build and report
async fn check_content(flag: Option<PathBuf>, json: bool, strict: bool) -> Result<()> {
    let (store, report) = load_catalog(flag).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&store, &report);
    }

    if strict && !report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report(store: &Store, report: &BuildReport) {
    for line in report_lines(store, report) {
        println!("{}", line);
    }
}

/// Human-readable build report
fn report_lines(store: &Store, report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        format!("Accepted: {}", report.accepted_count),
        format!("Rejected: {}", report.rejected.len()),
        format!("Fingerprint: {}", store.fingerprint()),
        format!(
            "Built at: {}",
            store.built_at().format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ];

    if report.is_clean() {
        return lines;
    }

    lines.push(String::new());
    for rejected in &report.rejected {
        lines.push(format!(
            "  {} (input {}): {}",
            rejected.label(),
            rejected.index,
            rejected.rejection
        ));
        for error in rejected.rejection.validation_errors() {
            lines.push(format!("    - {}", error));
        }
    }
    lines
}

/// List a page of topics
async fn list_topics(flag: Option<PathBuf>, offset: i64, limit: Option<i64>) -> Result<()> {
    let limit = match limit {
        Some(limit) => limit,
        None => config::config()?.default_page_size,
    };

    let (store, _) = load_catalog(flag).await?;
    let query = QueryService::new(&store);
    let page = query.paginate(offset, limit)?;

    if store.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }

    print_topic_table(page.iter());
    println!(
        "\nShowing {} of {} topics (offset {})",
        page.len(),
        store.count(),
        offset
    );

    Ok(())
}

/// Search the catalog
async fn search_topics(flag: Option<PathBuf>, term: &str, fields: Vec<FieldArg>) -> Result<()> {
    let (store, _) = load_catalog(flag).await?;
    let query = QueryService::new(&store);

    let fields: Vec<SearchField> = fields.into_iter().map(Into::into).collect();
    let results = query.by_keyword(term, &fields);

    if results.is_empty() {
        println!("No results found for: {}", term);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", results.len(), term);
    print_topic_table(results.into_iter());

    Ok(())
}

/// Show details of one topic
async fn show_topic(flag: Option<PathBuf>, topic_id: &str, full: bool) -> Result<()> {
    let (store, _) = load_catalog(flag).await?;
    let query = QueryService::new(&store);
    let topic = query.by_id(topic_id)?;

    println!("ID: {}", topic.id);
    println!("Title: {}", topic.title);
    if !topic.subtitle.is_empty() {
        println!("Subtitle: {}", topic.subtitle);
    }
    println!("Summary: {}", topic.summary);

    if !topic.explanation.is_empty() {
        println!("\n{}", topic.explanation.trim_end());
    }

    if !topic.key_points.is_empty() {
        println!("\nKey points:");
        for point in &topic.key_points {
            println!("  - {}", point);
        }
    }

    if !full {
        println!(
            "\n{} code example(s), {} resource(s), {} question(s). Use --full to show them",
            topic.code_examples.len(),
            topic.resources.len(),
            topic.questions.len()
        );
        return Ok(());
    }

    for example in &topic.code_examples {
        let language = if example.language.is_empty() {
            "text"
        } else {
            example.language.as_str()
        };
        println!("\n═══ {} ({}) ═══", example.title, language);
        if !example.description.is_empty() {
            println!("{}\n", example.description);
        }
        println!("{}", example.code.trim_end());
    }

    if !topic.resources.is_empty() {
        println!("\nResources:");
        for resource in &topic.resources {
            println!("  - {} <{}>", resource.title, resource.url);
        }
    }

    if !topic.questions.is_empty() {
        println!("\nQuestions:");
        for (i, qa) in topic.questions.iter().enumerate() {
            println!("  Q{}: {}", i + 1, qa.question);
            println!("  A{}: {}", i + 1, qa.answer);
        }
    }

    Ok(())
}

/// Watch the content directory and rebuild on change
async fn watch_content(flag: Option<PathBuf>) -> Result<()> {
    let dir = resolve_content_dir(flag)?;
    let debounce_ms = config::config()?.debounce_ms;

    let (store, report) = load_catalog(Some(dir.clone())).await?;
    print_report(&store, &report);

    let catalog = Arc::new(SharedCatalog::new(store));
    let watcher = ContentWatcher::new(
        WatcherConfig {
            content_dir: dir,
            debounce_ms,
        },
        Arc::clone(&catalog),
    );
    let (mut outcomes, handle) = watcher.watch()?;

    eprintln!("Watching for content changes. Press Ctrl-C to stop.");
    loop {
        tokio::select! {
            Some(outcome) = outcomes.recv() => {
                if outcome.swapped {
                    println!(
                        "Reloaded: {} accepted, {} rejected (fingerprint {})",
                        outcome.report.accepted_count,
                        outcome.report.rejected.len(),
                        outcome.fingerprint
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop().await
}

/// Show resolved configuration
fn show_config(flag: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;

    println!("lectern configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Content dir: {}", resolve_content_dir(flag)?.display());
    println!("Watch debounce: {} ms", cfg.debounce_ms);
    println!("Default page size: {}", cfg.default_page_size);

    Ok(())
}

fn print_topic_table<'a>(topics: impl Iterator<Item = &'a Topic>) {
    println!("{:<32} {:<50}", "ID", "TITLE");
    println!("{}", "-".repeat(82));

    for topic in topics {
        println!(
            "{:<32} {:<50}",
            truncate(topic.id.as_str(), 32),
            truncate(&topic.title, 50)
        );
    }
}

/// Shorten to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Thrashing", 50), "Thrashing");
        assert_eq!(truncate("Readers-Writers Problem", 10), "Readers...");
        assert_eq!(truncate("Ordonnancement des disques é", 5), "Or...");
    }

    #[test]
    fn test_report_lines_show_build_time_and_rejections() {
        let bad = crate::domain::RawTopic::try_from(serde_json::json!({
            "id": "thrashing",
            "title": "Thrashing"
        }))
        .unwrap();
        let (store, report) = build_catalog(vec![bad]);
        let lines = report_lines(&store, &report);

        let stamp = store.built_at().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        assert_eq!(lines[3], format!("Built at: {}", stamp));
        assert!(lines.iter().any(|l| l.starts_with("  thrashing (input 0)")));
        assert!(lines.iter().any(|l| l.contains("summary")));
    }

    #[test]
    fn test_cli_parses_search_fields() {
        let cli = Cli::try_parse_from([
            "lectern", "search", "deadlock", "--field", "title", "--field", "explanation",
        ])
        .unwrap();

        match cli.command {
            Commands::Search { term, fields } => {
                assert_eq!(term, "deadlock");
                let fields: Vec<SearchField> = fields.into_iter().map(Into::into).collect();
                assert_eq!(fields, vec![SearchField::Title, SearchField::Explanation]);
            }
            other => panic!("Expected search command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_content_flag() {
        let cli = Cli::try_parse_from(["lectern", "check", "--content", "/tmp/topics", "--strict"])
            .unwrap();
        assert_eq!(cli.content, Some(PathBuf::from("/tmp/topics")));
        assert!(matches!(cli.command, Commands::Check { strict: true, json: false }));
    }
}
