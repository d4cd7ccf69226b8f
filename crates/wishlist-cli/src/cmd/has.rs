//! `wl has`: print whether an item is listed.

use crate::cmd::Context;
use crate::output::render_mode;
use clap::Args;

#[derive(Args, Debug)]
pub struct HasArgs {
    /// Item id to check.
    pub id: String,
}

pub fn run_has(args: &HasArgs, ctx: &Context) -> anyhow::Result<()> {
    let wishlist = ctx.open_wishlist()?;
    let listed = wishlist.in_wishlist(&args.id);
    render_mode(
        ctx.output,
        &listed,
        |v, w| writeln!(w, "{v}"),
        |v, w| writeln!(w, "{v}"),
    )
}
