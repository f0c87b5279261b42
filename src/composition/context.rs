//! Sheet supply and per-render memoization

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::models::SpriteSheet;

use super::error::FetchError;

/// Supplies decoded sprite sheets by identifier.
///
/// Implementations may be called from several threads at once.
pub trait SheetProvider: Send + Sync {
    fn fetch(&self, sheet_id: &str) -> Result<SpriteSheet, FetchError>;
}

impl<F> SheetProvider for F
where
    F: Fn(&str) -> Result<SpriteSheet, FetchError> + Send + Sync,
{
    fn fetch(&self, sheet_id: &str) -> Result<SpriteSheet, FetchError> {
        self(sheet_id)
    }
}

type Cell = Arc<OnceLock<Result<Arc<SpriteSheet>, FetchError>>>;

/// Memoizing wrapper around a [`SheetProvider`] for one render call.
///
/// Each identifier is fetched at most once. A caller asking for an
/// identifier another thread is already fetching waits for that result
/// instead of fetching again. Failures are memoized too.
pub struct SheetCache<'a> {
    provider: &'a dyn SheetProvider,
    cells: Mutex<HashMap<String, Cell>>,
}

impl<'a> SheetCache<'a> {
    pub fn new(provider: &'a dyn SheetProvider) -> Self {
        Self { provider, cells: Mutex::new(HashMap::new()) }
    }

    /// The sheet for `sheet_id`, fetching it on first request.
    pub fn get(&self, sheet_id: &str) -> Result<Arc<SpriteSheet>, FetchError> {
        let cell = {
            // The map is only touched to find the cell; a poisoned lock still
            // holds a consistent map.
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(sheet_id.to_string()).or_default())
        };
        cell.get_or_init(|| {
            log::debug!("Fetching sheet '{}'", sheet_id);
            self.provider.fetch(sheet_id).map(Arc::new)
        })
        .clone()
    }

    /// Number of identifiers requested so far.
    pub fn len(&self) -> usize {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SheetCache<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetCache").field("entries", &self.len()).finish_non_exhaustive()
    }
}
