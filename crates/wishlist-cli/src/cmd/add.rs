//! `wl add`: append one item to the wishlist.

use crate::cmd::Context;
use crate::cmd::show::render_state;
use crate::output::fail;
use anyhow::bail;
use clap::Args;
use serde_json::Value;
use wishlist_core::Item;
use wishlist_core::model::is_reserved_field;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Item id. Must not already be listed.
    pub id: String,

    /// Item price.
    #[arg(allow_negative_numbers = true)]
    pub price: f64,

    /// Extra item field as `key=value`. Values that parse as JSON are kept
    /// typed; anything else is stored as a string. Repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

/// Split `key=value` and decode the value.
fn parse_field(raw: &str) -> anyhow::Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("field '{raw}' must look like key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("field '{raw}' has an empty key");
    }
    if is_reserved_field(key) {
        bail!("field '{key}' is set by the wishlist itself");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Execute `wl add <id> <price>`.
pub fn run_add(args: &AddArgs, ctx: &Context) -> anyhow::Result<()> {
    if !args.price.is_finite() {
        bail!("price must be a finite number");
    }

    let mut item = Item::new(args.id.clone(), args.price);
    for raw in &args.fields {
        let (key, value) = parse_field(raw)?;
        item = item.with_field(key, value);
    }

    let mut wishlist = ctx.open_wishlist()?;
    wishlist.add_item(item).map_err(|e| fail(ctx.output, &e))?;
    ctx.flush(&mut wishlist)?;

    render_state(ctx.output, wishlist.state())
}
