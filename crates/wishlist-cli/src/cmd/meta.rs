//! `wl meta`: clear, replace, or merge the wishlist metadata bag.

use crate::cmd::Context;
use crate::cmd::show::render_state;
use crate::output::fail;
use clap::{Args, Subcommand};
use serde_json::Value;
use wishlist_core::{Metadata, WishlistError};

#[derive(Args, Debug)]
pub struct MetaArgs {
    #[command(subcommand)]
    pub command: MetaCommand,
}

#[derive(Subcommand, Debug)]
pub enum MetaCommand {
    /// Remove every metadata key.
    Clear,
    /// Replace the metadata with a JSON object.
    Set {
        #[arg(value_name = "JSON")]
        metadata: String,
    },
    /// Merge a JSON object into the metadata; its keys win.
    Update {
        #[arg(value_name = "JSON")]
        metadata: String,
    },
}

fn parse_metadata(raw: &str) -> Result<Metadata, WishlistError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(WishlistError::InvalidAction(format!(
            "metadata must be a JSON object, got {other}"
        ))),
        Err(e) => Err(WishlistError::InvalidAction(format!(
            "metadata is not JSON: {e}"
        ))),
    }
}

/// Execute `wl meta <clear|set|update>`.
pub fn run_meta(args: &MetaArgs, ctx: &Context) -> anyhow::Result<()> {
    let parsed = match &args.command {
        MetaCommand::Clear => None,
        MetaCommand::Set { metadata } | MetaCommand::Update { metadata } => {
            Some(parse_metadata(metadata).map_err(|e| fail(ctx.output, &e))?)
        }
    };

    let mut wishlist = ctx.open_wishlist()?;
    match (&args.command, parsed) {
        (MetaCommand::Set { .. }, Some(metadata)) => wishlist.set_metadata(metadata),
        (MetaCommand::Update { .. }, Some(metadata)) => wishlist.update_metadata(metadata),
        _ => wishlist.clear_metadata(),
    }
    ctx.flush(&mut wishlist)?;

    render_state(ctx.output, wishlist.state())
}
