// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::db::Storage;
use crate::error::Fallible;

/// The storage key the known set lives under.
pub const STORAGE_KEY: &str = "va-plants-progress";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Progress {
    known_cards: Vec<String>,
}

/// The ids of plants the user has marked as mastered.
///
/// Persistence is best-effort: a store that cannot be read yields an empty
/// set, and a store that cannot be written leaves the set in memory only.
/// Neither is ever reported to the caller.
pub struct KnownCards {
    ids: BTreeSet<String>,
    storage: Box<dyn Storage>,
}

impl KnownCards {
    /// Load the stored set. Mutations can only happen after this returns,
    /// so an empty set can never overwrite stored progress before it has
    /// been read.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let ids = match read(storage.as_ref()) {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!("Could not load progress, starting fresh: {e}");
                BTreeSet::new()
            }
        };
        log::debug!("Loaded {} known cards.", ids.len());
        Self { ids, storage }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Known ids that name a plant in `catalog`. Ids of plants that have
    /// since left the catalog are kept, but don't count as progress.
    pub fn count_in(&self, catalog: &Catalog) -> usize {
        self.ids.iter().filter(|id| catalog.get(id).is_some()).count()
    }

    /// Flip membership of `id`. Returns whether it is now known.
    pub fn toggle(&mut self, id: &str) -> bool {
        let known = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.persist();
        known
    }

    pub fn reset(&mut self) {
        self.ids.clear();
        self.persist();
    }

    /// Like `reset`, but a failed write is reported instead of logged.
    pub fn try_reset(&mut self) -> Fallible<()> {
        self.ids.clear();
        write(self.storage.as_ref(), &self.ids)
    }

    fn persist(&self) {
        if let Err(e) = write(self.storage.as_ref(), &self.ids) {
            log::warn!("Could not save progress: {e}");
        }
    }
}

fn read(storage: &dyn Storage) -> Fallible<BTreeSet<String>> {
    match storage.get(STORAGE_KEY)? {
        None => Ok(BTreeSet::new()),
        Some(json) => {
            let progress: Progress = serde_json::from_str(&json)?;
            Ok(progress.known_cards.into_iter().collect())
        }
    }
}

fn write(storage: &dyn Storage, ids: &BTreeSet<String>) -> Fallible<()> {
    let progress = Progress {
        known_cards: ids.iter().cloned().collect(),
    };
    let json = serde_json::to_string(&progress)?;
    storage.set(STORAGE_KEY, &json)
}
