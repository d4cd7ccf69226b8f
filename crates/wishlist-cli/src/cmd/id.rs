//! `wl id`: print a freshly generated wishlist identifier.

use crate::cmd::Context;
use crate::output::render_mode;
use anyhow::bail;
use clap::Args;
use serde::Serialize;
use wishlist_core::create_wishlist_identifier;

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Identifier length. Defaults to `[identifier] length` from the project config.
    #[arg(long)]
    pub length: Option<usize>,
}

#[derive(Debug, Serialize)]
struct GeneratedId {
    id: String,
}

pub fn run_id(args: &IdArgs, ctx: &Context) -> anyhow::Result<()> {
    let length = args
        .length
        .unwrap_or(ctx.config.project.identifier.length);
    if length == 0 {
        bail!("identifier length must be at least 1");
    }

    let generated = GeneratedId {
        id: create_wishlist_identifier(length),
    };
    render_mode(
        ctx.output,
        &generated,
        |g, w| writeln!(w, "{}", g.id),
        |g, w| writeln!(w, "{}", g.id),
    )
}
