use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::clipboard::copy_to_clipboard;
use crate::extractor::extract_html;
use crate::gateway::{AiGateway, ChatRequest, GatewayConfig, HttpGateway, ToolRegistry};
use crate::models::{ChatMessage, ModelCatalog};
use crate::normalizer::{find_refusal, normalize};
use crate::preview::share_url;
use crate::store::HistoryStore;
use crate::tui;
use crate::utils::{get_data_dir, strip_ansi_codes};

#[derive(Parser)]
#[command(name = "ai-page-studio")]
#[command(version = "0.1.0")]
#[command(about = "Generate and iteratively edit HTML pages with AI models", long_about = None)]
pub struct Cli {
    /// Chat-completions endpoint URL (overrides AI_PAGE_STUDIO_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Gateway API key (overrides AI_PAGE_STUDIO_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a page from a prompt and print (or save) the HTML
    Generate {
        prompt: String,

        /// Model identifier to use
        #[arg(long)]
        model: Option<String>,

        /// Write the HTML to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the normalized response text instead of extracted HTML
        #[arg(long)]
        raw: bool,
    },
    /// List the available model identifiers
    Models,
    /// Show stored history entries and saved versions
    History,
    /// Write a stored entry's page to a file
    Export {
        /// Entry index as shown by `history`
        index: usize,

        #[arg(long)]
        output: PathBuf,
    },
    /// Print a self-contained share URL for a stored entry
    Share {
        /// Entry index as shown by `history`
        index: usize,

        /// Also copy the URL to the clipboard
        #[arg(long)]
        copy: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = GatewayConfig::resolve(cli.endpoint.clone(), cli.api_key.clone());

    match &cli.command {
        Some(Commands::Generate { prompt, model, output, raw }) => {
            generate(config, prompt, model.as_deref(), output.as_deref(), *raw)?;
        }
        Some(Commands::Models) => {
            show_models();
        }
        Some(Commands::History) => {
            show_history()?;
        }
        Some(Commands::Export { index, output }) => {
            export_entry(*index, output)?;
        }
        Some(Commands::Share { index, copy }) => {
            share_entry(*index, *copy)?;
        }
        None => {
            tui::run_interactive(config)?;
        }
    }

    Ok(())
}

/// One-shot generation: prompt in, HTML (or raw text) out, history recorded
fn generate(
    config: GatewayConfig,
    prompt: &str,
    model: Option<&str>,
    output: Option<&std::path::Path>,
    raw: bool,
) -> Result<()> {
    let catalog = ModelCatalog::new();
    let model = model.unwrap_or_else(|| catalog.default_model());
    if !catalog.contains(model) {
        eprintln!("Warning: unknown model '{}', passing it through to the gateway", model);
    }

    let gateway = HttpGateway::from_config(config)?;
    let request = ChatRequest::new(model, vec![ChatMessage::user(prompt)]);
    let response = gateway.chat(&request)?;

    if let Some(refusal) = find_refusal(&response) {
        bail!("{}", refusal);
    }
    if response.is_null() {
        bail!("Empty response from model: {}", model);
    }

    let tools = ToolRegistry::new();
    let text = normalize(&response, &tools);

    let data_dir = get_data_dir()?;
    let mut store = HistoryStore::load_or_default(&data_dir);
    store.append(&text);

    if raw {
        println!("{}", strip_ansi_codes(&text));
        return Ok(());
    }

    match extract_html(&text) {
        Some(html) => match output {
            Some(path) => {
                fs::write(path, &html)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
            None => println!("{}", html),
        },
        None => {
            eprintln!("Warning: no HTML detected in the response, showing raw text");
            println!("{}", strip_ansi_codes(&text));
        }
    }

    Ok(())
}

fn show_models() {
    let catalog = ModelCatalog::new();
    println!("Available models:");
    for model in catalog.models() {
        if model == catalog.default_model() {
            println!("  {} (default)", model);
        } else {
            println!("  {}", model);
        }
    }
}

fn show_history() -> Result<()> {
    let data_dir = get_data_dir()?;
    let store = HistoryStore::load_or_default(&data_dir);

    println!("Page Studio History");
    println!("====================");
    println!("Total entries: {}", store.entries().len());
    println!("Saved versions: {}", store.versions().len());

    if !store.entries().is_empty() {
        println!();
        for (idx, entry) in store.entries().iter().enumerate() {
            let marker = if Some(idx) == store.current_index() { "*" } else { " " };
            let name = entry.project_name.as_deref().unwrap_or("Untitled Page");
            print!(
                "{} #{:<3} {}  {}",
                marker,
                idx,
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                name
            );
            match &entry.description {
                Some(description) => println!("  ({})", description),
                None => println!(),
            }
        }
    }

    Ok(())
}

fn export_entry(index: usize, output: &std::path::Path) -> Result<()> {
    let entry = load_entry(index)?;

    // Prefer the extracted page; fall back to the raw recorded text
    let content = extract_html(&entry.content).unwrap_or(entry.content);
    fs::write(output, &content)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());

    Ok(())
}

fn share_entry(index: usize, copy: bool) -> Result<()> {
    let entry = load_entry(index)?;

    let html = extract_html(&entry.content)
        .context("Entry has no extractable HTML page to share")?;
    let url = share_url(&html)?;
    println!("{}", url);

    if copy {
        copy_to_clipboard(&url)?;
        eprintln!("Copied to clipboard");
    }

    Ok(())
}

fn load_entry(index: usize) -> Result<crate::models::HistoryEntry> {
    let data_dir = get_data_dir()?;
    let store = HistoryStore::load_or_default(&data_dir);
    let total = store.entries().len();

    store.entries().get(index).cloned().with_context(|| {
        format!("No history entry #{} ({} entries recorded)", index, total)
    })
}
