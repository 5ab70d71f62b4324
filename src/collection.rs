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

use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::Database;
use crate::db::MemoryStorage;
use crate::db::Storage;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

pub const DATABASE_FILE_NAME: &str = "vaplants.db";

/// A collection directory: catalog files, settings, images, and progress.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub storage: Box<dyn Storage>,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let catalog = {
            log::debug!("Loading catalog...");
            let start = Instant::now();
            let catalog = Catalog::load(&directory)?;
            let end = Instant::now();
            let duration = end.duration_since(start).as_millis();
            log::debug!("Catalog of {} plants loaded in {duration}ms.", catalog.len());
            catalog
        };

        let db_path: PathBuf = directory.join(DATABASE_FILE_NAME);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let storage: Box<dyn Storage> = match Database::new(db_path) {
            Ok(db) => Box::new(db),
            Err(e) => {
                log::warn!("Progress will not be saved: {e}");
                Box::new(MemoryStorage::new())
            }
        };

        Ok(Self {
            directory,
            config,
            catalog: Arc::new(catalog),
            storage,
        })
    }
}
