pub mod add;
pub mod empty;
pub mod get;
pub mod has;
pub mod id;
pub mod meta;
pub mod remove;
pub mod set;
pub mod show;

use anyhow::Context as _;
use std::path::{Path, PathBuf};
use wishlist_core::config::{EffectiveConfig, resolve_config};
use wishlist_core::store::open_storage;
use wishlist_core::{Storage, Wishlist, WishlistOptions};

use crate::output::{OutputMode, fail};

/// The wishlist handle every command works on.
pub type CliWishlist = Wishlist<Box<dyn Storage>>;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub root: PathBuf,
    pub config: EffectiveConfig,
    pub output: OutputMode,
    pub wishlist_id: Option<String>,
}

impl Context {
    /// Load project and user config for `root`.
    pub fn load(root: PathBuf, json: bool, wishlist_id: Option<String>) -> anyhow::Result<Self> {
        let config = resolve_config(&root, json)?;
        let output = OutputMode::from_resolved(&config.resolved_output);
        Ok(Self {
            root,
            config,
            output,
            wishlist_id,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the configured storage backend and the selected wishlist.
    pub fn open_wishlist(&self) -> anyhow::Result<CliWishlist> {
        let storage_config = &self.config.project.storage;
        let storage = open_storage(storage_config, self.root())
            .map_err(|e| fail(self.output, &e.into()))
            .with_context(|| {
                format!(
                    "opening {:?} storage at {}",
                    storage_config.backend,
                    storage_config.resolved_path(self.root()).display()
                )
            })?;

        let mut options = WishlistOptions::new()
            .key_prefix(storage_config.key_prefix.clone())
            .id_length(self.config.project.identifier.length);
        if let Some(id) = &self.wishlist_id {
            options = options.id(id.clone());
        }

        Ok(Wishlist::open(storage, options))
    }

    /// Make sure the last transition reached storage before reporting success.
    pub fn flush(&self, wishlist: &mut CliWishlist) -> anyhow::Result<()> {
        wishlist.flush().map_err(|e| fail(self.output, &e))
    }
}
