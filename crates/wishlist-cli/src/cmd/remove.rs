//! `wl remove`: drop every item with the given id.

use crate::cmd::Context;
use crate::cmd::show::render_state;
use clap::Args;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Item id to remove. Removing an unlisted id is not an error.
    pub id: String,
}

/// Execute `wl remove <id>`.
pub fn run_remove(args: &RemoveArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut wishlist = ctx.open_wishlist()?;
    if !wishlist.in_wishlist(&args.id) {
        tracing::info!(id = %args.id, "item not listed, nothing removed");
    }
    wishlist.remove_item(&args.id);
    ctx.flush(&mut wishlist)?;

    render_state(ctx.output, wishlist.state())
}
