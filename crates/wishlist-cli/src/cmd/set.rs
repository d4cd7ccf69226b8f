//! `wl set`: replace the whole item list from a JSON array.

use crate::cmd::Context;
use crate::cmd::show::render_state;
use crate::output::fail;
use clap::Args;
use serde_json::Value;
use wishlist_core::{InvalidItemReason, Item, WishlistError};

#[derive(Args, Debug)]
pub struct SetArgs {
    /// JSON array of item objects, e.g. `[{"id":"a","price":10}]`.
    #[arg(value_name = "JSON")]
    pub items: String,
}

/// Decode a JSON array of items. Ids are not checked for uniqueness.
pub fn parse_items(raw: &str) -> Result<Vec<Item>, WishlistError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        WishlistError::InvalidItem(InvalidItemReason::Malformed(format!("not JSON: {e}")))
    })?;
    let Value::Array(entries) = value else {
        return Err(WishlistError::InvalidItem(InvalidItemReason::Malformed(
            "expected a JSON array of items".to_string(),
        )));
    };

    entries
        .into_iter()
        .map(|entry| Item::try_from(entry).map_err(WishlistError::InvalidItem))
        .collect()
}

/// Execute `wl set <json>`.
pub fn run_set(args: &SetArgs, ctx: &Context) -> anyhow::Result<()> {
    let items = parse_items(&args.items).map_err(|e| fail(ctx.output, &e))?;

    let mut wishlist = ctx.open_wishlist()?;
    wishlist.set_items(items).map_err(|e| fail(ctx.output, &e))?;
    ctx.flush(&mut wishlist)?;

    render_state(ctx.output, wishlist.state())
}
