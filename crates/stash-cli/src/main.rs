//! Stash CLI — personal content vault.
//!
//! Commands: list, import, enrich, tag add, tag rename, dedup, stats.

mod config;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use stash_core::VaultItem;
use stash_enrich::analyze_or_fallback;
use stash_import::{parse_import, ConflictSession, Resolution};
use stash_vault::{ImportOutcome, Vault};

use config::{open_analyzer, open_store, Config, DEFAULT_STORE};

#[derive(Parser)]
#[command(name = "stash")]
#[command(version)]
#[command(about = "Personal content vault")]
struct Cli {
    /// Store location: a worker URL or a local .json path.
    #[arg(long, global = true)]
    store: Option<String>,

    /// Bearer token for the remote store and analyzer.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Config file (default ./stash.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List vault items, newest first.
    #[command(alias = "ls")]
    List {
        /// Only items carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Add one item; content is analyzed to fill title, summary and tags.
    Add { content: String },
    /// Import a structured JSON export or browser bookmark HTML file.
    Import {
        file: PathBuf,
        /// Apply one action to every conflict instead of prompting.
        #[arg(long, value_enum)]
        resolve: Option<ResolveAll>,
    },
    /// Run an analysis sweep over the corpus.
    Enrich {
        /// Only items carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Tag operations.
    #[command(subcommand)]
    Tag(TagCommands),
    /// Show duplicate link groups; optionally delete the older copies.
    Dedup {
        #[arg(long)]
        delete: bool,
    },
    /// Vault statistics.
    Stats,
}

#[derive(clap::Subcommand)]
enum TagCommands {
    /// Add a tag to one item.
    Add { id: String, tag: String },
    /// Rename a tag across the whole corpus.
    Rename { old: String, new: String },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ResolveAll {
    Keep,
    Skip,
    SkipAll,
}

impl From<ResolveAll> for Resolution {
    fn from(value: ResolveAll) -> Self {
        match value {
            ResolveAll::Keep => Resolution::Keep,
            ResolveAll::Skip => Resolution::Skip,
            ResolveAll::SkipAll => Resolution::SkipAll,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;

    let store_spec = cli
        .store
        .or(cfg.store)
        .unwrap_or_else(|| DEFAULT_STORE.to_string());
    let token = cli.token.or(cfg.token);

    let store = open_store(&store_spec, token.clone())?;
    let mut vault = Vault::open(store).await.context("loading vault")?;
    tracing::info!(store = %store_spec, items = vault.items().len(), "vault opened");

    match cli.command {
        Commands::List { tag } => {
            for item in vault.items() {
                if let Some(tag) = &tag {
                    if !item.tags.iter().any(|t| t == tag) {
                        continue;
                    }
                }
                println!(
                    "{}  [{}] {}  ({})",
                    item.id,
                    type_label(item.item_type),
                    item.title,
                    item.tags.join(", ")
                );
            }
        }

        Commands::Add { content } => {
            let analyzer = open_analyzer(cfg.analyzer_url.as_deref(), token)?;
            let analysis = analyze_or_fallback(analyzer.as_ref(), &content).await;
            let mut item = VaultItem::new(analysis.item_type, content, "");
            analysis.apply_to(&mut item);
            vault.save_item(&item).await?;
            println!(
                "Added {} \"{}\" ({}).",
                type_label(item.item_type),
                item.title,
                item.tags.join(", ")
            );
        }

        Commands::Import { file, resolve } => {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("import")
                .to_string();
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;

            let parsed = parse_import(&name, None, &raw)?;
            println!("Parsed {} items from {name}.", parsed.len());

            match vault.import_items(parsed).await? {
                ImportOutcome::Complete { imported } => {
                    println!("Imported {imported} items.");
                }
                ImportOutcome::NeedsResolution { imported, session } => {
                    println!(
                        "Imported {imported} items; {} conflicts to resolve.",
                        session.remaining()
                    );
                    let summary = match resolve {
                        Some(action) => resolve_all(&mut vault, session, action.into()).await?,
                        None => resolve_prompting(&mut vault, session).await?,
                    };
                    println!(
                        "Conflicts resolved: kept {}, skipped {}.",
                        summary.kept, summary.skipped
                    );
                }
            }
            println!("Vault now holds {} items.", vault.items().len());
        }

        Commands::Enrich { tag } => {
            let analyzer = open_analyzer(cfg.analyzer_url.as_deref(), token)?;
            let report = vault
                .enrich(analyzer, tag.as_deref(), |p| {
                    eprintln!("analyzing… {}/{}", p.completed, p.total);
                })
                .await?;
            println!(
                "Enrichment done: {} analyzed, {} already annotated, {} failed.",
                report.analyzed, report.passed, report.failed
            );
        }

        Commands::Tag(TagCommands::Add { id, tag }) => {
            if vault.assign_tag(&id, &tag).await? {
                println!("Tagged {id} with \"{tag}\".");
            } else {
                println!("No change: item missing or already tagged.");
            }
        }

        Commands::Tag(TagCommands::Rename { old, new }) => {
            let changed = vault.rename_tag(&old, &new).await?;
            println!("Renamed \"{old}\" to \"{new}\" on {changed} items.");
        }

        Commands::Dedup { delete } => {
            let groups = vault.duplicate_groups();
            if groups.is_empty() {
                println!("No duplicate links.");
            }
            for group in &groups {
                println!("{} × {}", group.len(), group[0].content);
                for item in group {
                    println!("  {}  {}", item.id, item.title);
                }
            }
            if delete {
                // Keep the newest copy of each group, drop the rest.
                let stale: Vec<String> = groups
                    .iter()
                    .flat_map(|g| g.iter().skip(1).map(|i| i.id.clone()))
                    .collect();
                let count = stale.len();
                vault.delete_items(&stale).await?;
                println!("Deleted {count} duplicates.");
            }
        }

        Commands::Stats => {
            let items = vault.items();
            let mut tags: Vec<&str> = items
                .iter()
                .flat_map(|i| i.tags.iter().map(String::as_str))
                .collect();
            tags.sort_unstable();
            tags.dedup();
            println!("{} items, {} tags", items.len(), tags.len());
        }
    }

    Ok(())
}

fn type_label(t: stash_core::ItemType) -> &'static str {
    match t {
        stash_core::ItemType::Link => "link",
        stash_core::ItemType::Note => "note",
        stash_core::ItemType::Snippet => "snippet",
    }
}

/// Apply one action to every queued conflict (scripted runs).
async fn resolve_all(
    vault: &mut Vault,
    mut session: ConflictSession,
    action: Resolution,
) -> anyhow::Result<stash_import::SessionSummary> {
    loop {
        if let Some(summary) = vault.resolve(&mut session, action).await? {
            return Ok(summary);
        }
    }
}

/// Walk the queue interactively, one head entry at a time.
async fn resolve_prompting(
    vault: &mut Vault,
    mut session: ConflictSession,
) -> anyhow::Result<stash_import::SessionSummary> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(entry) = session.current() else {
            // Defensive: a drained session still reports its summary.
            if let Some(summary) = vault.resolve(&mut session, Resolution::Skip).await? {
                return Ok(summary);
            }
            continue;
        };
        println!(
            "conflict ({} remaining): incoming \"{}\" duplicates existing \"{}\" ({})",
            session.remaining(),
            entry.incoming.title,
            entry.existing.title,
            entry.existing.content
        );
        print!("[k]eep / [s]kip / skip-[a]ll > ");
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            // Closed stdin: skip the rest rather than hang.
            None => "a".to_string(),
        };
        let action = match line.trim() {
            "k" | "keep" => Resolution::Keep,
            "s" | "skip" => Resolution::Skip,
            "a" | "all" | "skip-all" => Resolution::SkipAll,
            _ => {
                println!("unrecognized choice");
                continue;
            }
        };

        if let Some(summary) = vault.resolve(&mut session, action).await? {
            return Ok(summary);
        }
    }
}
