//! `wl empty`: reset the wishlist to its initial empty state.
//!
//! This also drops the wishlist's id and metadata. The storage slot keeps its
//! key, so the next run restores the emptied snapshot.

use crate::cmd::Context;
use crate::cmd::show::render_state;

pub fn run_empty(ctx: &Context) -> anyhow::Result<()> {
    let mut wishlist = ctx.open_wishlist()?;
    wishlist.empty_wishlist();
    ctx.flush(&mut wishlist)?;

    render_state(ctx.output, wishlist.state())
}
