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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::CONFIG_FILE_NAME;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::category::CategoryFilter;
use crate::types::plant::Plant;
use crate::types::plant::PlantRef;

/// The plants currently in scope, in catalog order.
pub type WorkingSet = Vec<PlantRef>;

/// The immutable, ordered list of every plant in a collection.
pub struct Catalog {
    plants: Vec<PlantRef>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    plants: Vec<Plant>,
}

impl Catalog {
    /// Builds a catalog, rejecting invalid records and duplicate ids.
    pub fn new(plants: Vec<Plant>) -> Fallible<Self> {
        let mut seen: HashSet<String> = HashSet::new();
        for plant in plants.iter() {
            plant.validate()?;
            if !seen.insert(plant.id.clone()) {
                return fail(format!("duplicate plant id: '{}'.", plant.id));
            }
        }
        let plants = plants.into_iter().map(Arc::new).collect();
        Ok(Self { plants })
    }

    /// Loads every `.toml` and `.json` catalog file under `directory`, in
    /// file name order.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let mut plants: Vec<Plant> = Vec::new();
        for entry in WalkDir::new(directory).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.file_name().is_some_and(|n| n == CONFIG_FILE_NAME) {
                continue;
            }
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => {
                    let contents = read_to_string(path)?;
                    let file: CatalogFile = toml::from_str(&contents).map_err(|e| {
                        ErrorReport::new(format!("failed to parse {}: {e}", path.display()))
                    })?;
                    log::debug!("{}: {} plants", path.display(), file.plants.len());
                    plants.extend(file.plants);
                }
                Some("json") => {
                    let contents = read_to_string(path)?;
                    let file: Vec<Plant> = serde_json::from_str(&contents).map_err(|e| {
                        ErrorReport::new(format!("failed to parse {}: {e}", path.display()))
                    })?;
                    log::debug!("{}: {} plants", path.display(), file.len());
                    plants.extend(file);
                }
                _ => {}
            }
        }
        Self::new(plants)
    }

    pub fn plants(&self) -> &[PlantRef] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PlantRef> {
        self.plants.iter().find(|plant| plant.id == id)
    }

    /// The plants matching `filter`, in catalog order. Never fails: a
    /// category with no plants yields an empty set.
    pub fn filter(&self, filter: CategoryFilter) -> WorkingSet {
        self.plants
            .iter()
            .filter(|plant| filter.matches(plant.category))
            .cloned()
            .collect()
    }
}
