//! # Store State
//!
//! Wraps the `Store` facade for use in POS commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_services(store: &StoreState) -> Result<Vec<Service>, ApiError> {
//!     Ok(store.inner().catalog().list().await?)
//! }
//! ```

use carwash_store::Store;

/// Wrapper around `Store` for command state.
///
/// Cloning is cheap; every clone shares the same repositories.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Store,
}

impl StoreState {
    pub fn new(store: Store) -> Self {
        StoreState { store }
    }

    /// Returns a reference to the inner Store.
    pub fn inner(&self) -> &Store {
        &self.store
    }
}
