//! `wl get`: print one item, or fail when it is not listed.

use crate::cmd::Context;
use crate::cmd::show::format_price;
use crate::output::{CliError, pretty_kv, render_error, render_mode};
use clap::Args;
use wishlist_core::ErrorCode;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Item id to look up.
    pub id: String,
}

/// Execute `wl get <id>`.
pub fn run_get(args: &GetArgs, ctx: &Context) -> anyhow::Result<()> {
    let wishlist = ctx.open_wishlist()?;
    let Some(item) = wishlist.get_item(&args.id) else {
        let code = ErrorCode::ItemNotFound;
        render_error(
            ctx.output,
            &CliError::with_details(
                format!("item '{}' is not in the wishlist", args.id),
                code.hint().unwrap_or_default(),
                code.code(),
            ),
        )?;
        anyhow::bail!("{code}: item '{}' not found", args.id);
    };

    render_mode(
        ctx.output,
        item,
        |item, w| writeln!(w, "{}\t{}", item.id, format_price(item.price)),
        |item, w| {
            pretty_kv(w, "Id", &item.id)?;
            pretty_kv(w, "Price", format_price(item.price))?;
            for (key, value) in &item.extra {
                pretty_kv(w, key, value.to_string())?;
            }
            Ok(())
        },
    )
}
