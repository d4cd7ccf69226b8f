//! `wl show`: print the current wishlist snapshot.
//!
//! The same renderer is used by every mutating command to print the state
//! that resulted from the change.

use crate::cmd::Context;
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use std::io::{self, Write};
use wishlist_core::{Item, WishlistState};

/// Format a price without a trailing `.0` for whole amounts.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{price:.0}")
    } else {
        price.to_string()
    }
}

/// Extra item fields as `key=value` pairs, in key order.
fn extra_fields(item: &Item) -> String {
    item.extra
        .iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => format!("{k}={s}"),
            other => format!("{k}={other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_text(state: &WishlistState, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "{}\t{}\t{}",
        state.id().unwrap_or("-"),
        state.total_wishlist_items(),
        format_price(state.wishlist_total())
    )?;
    for item in state.items() {
        writeln!(
            w,
            "{}\t{}\t{}",
            item.id,
            format_price(item.price),
            extra_fields(item)
        )?;
    }
    Ok(())
}

fn write_pretty(state: &WishlistState, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Wishlist {}", state.id().unwrap_or("(no id)")))?;
    if state.is_wishlist_empty() {
        writeln!(w, "(empty)")?;
    } else {
        for item in state.items() {
            let extra = extra_fields(item);
            if extra.is_empty() {
                writeln!(w, "  {:<20} {:>12}", item.id, format_price(item.price))?;
            } else {
                writeln!(
                    w,
                    "  {:<20} {:>12}  {extra}",
                    item.id,
                    format_price(item.price)
                )?;
            }
        }
    }
    pretty_rule(w)?;
    pretty_kv(w, "Items", state.total_wishlist_items().to_string())?;
    pretty_kv(w, "Total", format_price(state.wishlist_total()))?;
    if !state.metadata().is_empty() {
        pretty_kv(
            w,
            "Metadata",
            serde_json::Value::Object(state.metadata().clone()).to_string(),
        )?;
    }
    Ok(())
}

/// Print `state` in the requested mode.
pub fn render_state(output: OutputMode, state: &WishlistState) -> anyhow::Result<()> {
    render_mode(output, state, write_text, write_pretty)
}

/// Execute `wl show`.
pub fn run_show(ctx: &Context) -> anyhow::Result<()> {
    let wishlist = ctx.open_wishlist()?;
    render_state(ctx.output, wishlist.state())
}
