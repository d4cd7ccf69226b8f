//! Snapshot persistence: keeps one durable slot mirroring the in-memory state.
//!
//! The reducer never sees storage. The engine calls [`SnapshotSync::commit`]
//! after a new snapshot is already committed in memory, so a failed write
//! never rolls back or blocks a transition; it only marks the slot dirty
//! until the next successful write.

use crate::error::WishlistError;
use crate::model::WishlistState;
use crate::store::Storage;
use crate::totals::derive_state;

/// Where the engine's starting state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Parsed from the durable slot.
    Restored,
    /// Built from caller defaults because the slot was empty.
    Seeded,
    /// Built from caller defaults because the slot could not be read or parsed.
    Recovered,
}

/// Encode a snapshot as JSON.
///
/// Non-finite numbers are written as `null`, which [`decode_snapshot`]
/// rejects; a slot holding one is reseeded on the next open.
///
/// # Errors
///
/// Returns the serializer error for metadata or extra fields it cannot encode.
pub fn encode_snapshot(state: &WishlistState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Decode a JSON snapshot and recompute its aggregates from `items`.
///
/// A snapshot written by this crate decodes to an equal value; a hand-edited
/// one with stale totals is corrected rather than trusted.
///
/// # Errors
///
/// Returns the parse error for malformed JSON or a mistyped field.
pub fn decode_snapshot(raw: &str) -> Result<WishlistState, serde_json::Error> {
    let stored: WishlistState = serde_json::from_str(raw)?;
    let items = stored.items.clone();
    Ok(derive_state(&stored, items))
}

/// Owns the storage collaborator and the slot key for one wishlist.
#[derive(Debug)]
pub struct SnapshotSync<S: Storage> {
    storage: S,
    key: String,
    dirty: bool,
}

impl<S: Storage> SnapshotSync<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            dirty: false,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the last write failed and the slot may be stale.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Restore the slot's snapshot, or fall back to `seed`.
    ///
    /// An empty slot is seeded with `seed`. An unreadable or unparsable slot
    /// is logged and overwritten with `seed`.
    pub fn load_or_seed(&mut self, seed: WishlistState) -> (WishlistState, SnapshotOrigin) {
        let origin = match self.storage.get(&self.key) {
            Ok(Some(raw)) => match decode_snapshot(&raw) {
                Ok(state) => return (state, SnapshotOrigin::Restored),
                Err(e) => {
                    tracing::warn!(
                        key = %self.key,
                        "stored snapshot is unreadable, reseeding: {e}"
                    );
                    SnapshotOrigin::Recovered
                }
            },
            Ok(None) => SnapshotOrigin::Seeded,
            Err(e) => {
                tracing::warn!(key = %self.key, "snapshot read failed, using defaults: {e}");
                SnapshotOrigin::Recovered
            }
        };

        self.commit(&seed);
        (seed, origin)
    }

    /// Post-commit hook: overwrite the slot with `state`.
    ///
    /// Failures are logged and leave the sync dirty; they are not returned
    /// because the in-memory transition has already happened.
    pub fn commit(&mut self, state: &WishlistState) {
        if let Err(e) = self.write(state) {
            self.dirty = true;
            tracing::warn!(key = %self.key, "snapshot write failed, state kept in memory: {e}");
        }
    }

    /// Write `state` now, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns the encode or storage error. The sync stays dirty on failure.
    pub fn flush(&mut self, state: &WishlistState) -> Result<(), WishlistError> {
        self.write(state).inspect_err(|_| self.dirty = true)
    }

    /// Delete the durable slot.
    ///
    /// # Errors
    ///
    /// Returns the storage error.
    pub fn clear(&mut self) -> Result<(), WishlistError> {
        self.storage.remove(&self.key)?;
        self.dirty = false;
        Ok(())
    }

    fn write(&mut self, state: &WishlistState) -> Result<(), WishlistError> {
        let raw = encode_snapshot(state)?;
        self.storage.set(&self.key, &raw)?;
        self.dirty = false;
        Ok(())
    }
}
