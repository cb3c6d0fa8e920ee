//! Command-line host for the start page core.
//!
//! # Responsibility
//! - Own the single `Store` instance for one invocation.
//! - Stand in for the page UI: stdin/stdout play the clipboard for
//!   import/export.
//!
//! Containers and items are addressed by zero-based position.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use startpage_core::db::open_db;
use startpage_core::{
    default_log_level, init_logging, validate_bytes, ContainerId, Item, ItemId, LaunchParams,
    MemoryStateRepository, SqliteStateRepository, StateRepository, Store,
};
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "startpage", version, about = "Manage start page bookmarks")]
struct Cli {
    /// State database file.
    #[arg(long, default_value = "startpage.sqlite3")]
    db: PathBuf,

    /// Use a throwaway in-memory store instead of `--db`.
    #[arg(long)]
    memory: bool,

    /// Startup query string, e.g. `?demo` or `?clear`.
    #[arg(long, default_value = "")]
    params: String,

    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print containers and their items.
    Show,
    /// Print the serialized document.
    Export,
    /// Replace the stored document with one read from stdin.
    Import,
    /// Check a document read from stdin without storing it.
    Validate,
    AddContainer {
        title: String,
    },
    AddBookmark {
        container: usize,
        title: String,
        url: String,
    },
    AddSpacer {
        container: usize,
        #[arg(long)]
        flexible: bool,
    },
    SetBackground {
        value: String,
    },
    RenameContainer {
        container: usize,
        title: String,
    },
    RemoveContainer {
        container: usize,
    },
    RemoveItem {
        container: usize,
        item: usize,
    },
    MoveContainer {
        container: usize,
        to: usize,
    },
    MoveItem {
        container: usize,
        item: usize,
        to: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let params = LaunchParams::parse(&cli.params);

    if cli.memory {
        let mut store = Store::open(MemoryStateRepository::new(), &params);
        return run(&mut store, cli.command);
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open state database {}", cli.db.display()))?;
    let mut store = Store::open(SqliteStateRepository::new(&conn), &params);
    run(&mut store, cli.command)
}

fn run<R: StateRepository>(store: &mut Store<R>, command: Command) -> Result<()> {
    match command {
        Command::Show => print_document(store),
        Command::Export => println!("{}", store.export()?),
        Command::Import => {
            let input = read_stdin()?;
            store.import_bytes(&input).context("import rejected")?;
            println!("imported {} containers", store.containers().len());
        }
        Command::Validate => {
            let input = read_stdin()?;
            match validate_bytes(&input) {
                Ok(document) => println!("ok: {} containers", document.containers.len()),
                Err(err) => bail!("invalid document: {err}"),
            }
        }
        Command::AddContainer { title } => {
            store.add_container(title)?;
        }
        Command::AddBookmark {
            container,
            title,
            url,
        } => {
            let container = container_at(store, container)?;
            store.add_bookmark(container, "", "");
            store.commit_edit(title, url)?;
        }
        Command::AddSpacer {
            container,
            flexible,
        } => {
            let container = container_at(store, container)?;
            store.add_spacer(container, flexible)?;
        }
        Command::SetBackground { value } => {
            store.set_background(value);
            store.persist()?;
        }
        Command::RenameContainer { container, title } => {
            let container = container_at(store, container)?;
            store.rename_container(container, title)?;
        }
        Command::RemoveContainer { container } => {
            let container = container_at(store, container)?;
            store.remove_container(container)?;
        }
        Command::RemoveItem { container, item } => {
            let (container, item) = item_at(store, container, item)?;
            store.remove_item(container, item)?;
        }
        Command::MoveContainer { container, to } => {
            let container = container_at(store, container)?;
            store.move_container(container, to)?;
        }
        Command::MoveItem {
            container,
            item,
            to,
        } => {
            let (container, item) = item_at(store, container, item)?;
            store.move_item(container, item, to)?;
        }
    }

    Ok(())
}

fn container_at<R: StateRepository>(store: &Store<R>, index: usize) -> Result<ContainerId> {
    store
        .container_ids()
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("no container at position {index}"))
}

fn item_at<R: StateRepository>(
    store: &Store<R>,
    container_index: usize,
    item_index: usize,
) -> Result<(ContainerId, ItemId)> {
    let container = container_at(store, container_index)?;
    let item = store
        .container(container)
        .and_then(|container| container.item_ids().get(item_index).copied())
        .ok_or_else(|| {
            anyhow!("no item at position {item_index} in container {container_index}")
        })?;
    Ok((container, item))
}

fn print_document<R: StateRepository>(store: &Store<R>) {
    println!("background: {}", store.settings().background);
    for (index, container) in store.containers().iter().enumerate() {
        println!("[{index}] {}", container.title);
        for (position, item) in container.items.iter().enumerate() {
            match item {
                Item::Bookmark(bookmark) => {
                    println!("    {position}: {} <{}>", bookmark.title, bookmark.url)
                }
                Item::Spacer(spacer) if spacer.flexible => {
                    println!("    {position}: -- flexible spacer --")
                }
                Item::Spacer(_) => println!("    {position}: -- spacer --"),
            }
        }
    }
}

/// Raw stdin; text decoding is left to the validator.
fn read_stdin() -> Result<Vec<u8>> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}
