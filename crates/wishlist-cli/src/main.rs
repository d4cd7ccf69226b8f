#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::Context;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "wl: persisted wishlist with derived totals",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Work on the wishlist with this id. Without it every run shares the
    /// default slot.
    #[arg(long, short = 'w', global = true, value_name = "ID")]
    wishlist: Option<String>,

    /// Project root holding `.wishlist/`. Defaults to the current directory.
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Show the wishlist",
        after_help = "EXAMPLES:\n    # Show the default wishlist\n    wl show\n\n    # Show a named wishlist as JSON\n    wl --wishlist gifts show --json"
    )]
    Show,

    #[command(
        next_help_heading = "Read",
        about = "Show one item",
        after_help = "EXAMPLES:\n    # Look up an item\n    wl get kettle"
    )]
    Get(cmd::get::GetArgs),

    #[command(
        next_help_heading = "Read",
        about = "Check whether an item is listed",
        after_help = "EXAMPLES:\n    # Prints true or false\n    wl has kettle"
    )]
    Has(cmd::has::HasArgs),

    #[command(
        next_help_heading = "Items",
        about = "Add an item",
        after_help = "EXAMPLES:\n    # Add an item with a price\n    wl add kettle 39.99\n\n    # Attach extra fields\n    wl add kettle 39.99 --field name=\"Electric kettle\" --field qty=2"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Items",
        about = "Remove an item",
        after_help = "EXAMPLES:\n    # Remove by id\n    wl remove kettle"
    )]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        next_help_heading = "Items",
        about = "Replace all items",
        after_help = "EXAMPLES:\n    # Replace the list\n    wl set '[{\"id\":\"a\",\"price\":10},{\"id\":\"b\",\"price\":20}]'"
    )]
    Set(cmd::set::SetArgs),

    #[command(
        next_help_heading = "Items",
        about = "Reset the wishlist",
        long_about = "Reset to the initial empty state. Items, metadata and the wishlist id are dropped."
    )]
    Empty,

    #[command(
        next_help_heading = "Metadata",
        about = "Edit wishlist metadata",
        after_help = "EXAMPLES:\n    # Merge keys\n    wl meta update '{\"coupon\":\"abc\"}'\n\n    # Replace everything\n    wl meta set '{\"delivery\":\"same-day\"}'\n\n    # Drop all keys\n    wl meta clear"
    )]
    Meta(cmd::meta::MetaArgs),

    #[command(
        next_help_heading = "Utilities",
        about = "Generate a wishlist identifier",
        after_help = "EXAMPLES:\n    # Default length\n    wl id\n\n    # Longer id\n    wl id --length 20"
    )]
    Id(cmd::id::IdArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WISHLIST_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "wishlist=debug,wl=debug,info"
        } else {
            "wishlist=info,wl=info,warn"
        })
    });

    let format = env::var("WISHLIST_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir()?,
    };
    let ctx = Context::load(root, cli.json, cli.wishlist)?;

    match cli.command {
        Commands::Show => cmd::show::run_show(&ctx),
        Commands::Get(ref args) => cmd::get::run_get(args, &ctx),
        Commands::Has(ref args) => cmd::has::run_has(args, &ctx),
        Commands::Add(ref args) => cmd::add::run_add(args, &ctx),
        Commands::Remove(ref args) => cmd::remove::run_remove(args, &ctx),
        Commands::Set(ref args) => cmd::set::run_set(args, &ctx),
        Commands::Empty => cmd::empty::run_empty(&ctx),
        Commands::Meta(ref args) => cmd::meta::run_meta(args, &ctx),
        Commands::Id(ref args) => cmd::id::run_id(args, &ctx),
    }
}
