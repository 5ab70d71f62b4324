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

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::known::KnownCards;
use crate::types::category::CATEGORIES;
use crate::types::category::CategoryFilter;
use crate::types::wetland::ALL_STATUSES;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let known = KnownCards::load(coll.storage);
    let stats = Stats::new(&coll.catalog, &known);
    match format {
        StatsFormat::Text => {
            print!("{}", stats.to_text());
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    plant_count: usize,
    native_count: usize,
    known_count: usize,
    /// Keyed by category id, including `all`.
    categories: BTreeMap<String, usize>,
    /// Keyed by indicator code. Codes with no plants are reported as zero.
    wetland_statuses: BTreeMap<String, usize>,
}

impl Stats {
    pub fn new(catalog: &Catalog, known: &KnownCards) -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|c| (c.filter.id().to_string(), catalog.filter(c.filter).len()))
            .collect();
        let wetland_statuses = ALL_STATUSES
            .iter()
            .map(|status| {
                let count = catalog
                    .plants()
                    .iter()
                    .filter(|plant| plant.wetland_status == *status)
                    .count();
                (status.as_str().to_string(), count)
            })
            .collect();
        Self {
            plant_count: catalog.len(),
            native_count: catalog.plants().iter().filter(|p| p.native).count(),
            known_count: known.count_in(catalog),
            categories,
            wetland_statuses,
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} plants, {} native, {} known.\n",
            self.plant_count, self.native_count, self.known_count
        ));
        for descriptor in CATEGORIES.iter() {
            if descriptor.filter == CategoryFilter::All {
                continue;
            }
            let count = self.categories.get(descriptor.filter.id()).unwrap_or(&0);
            out.push_str(&format!("  {}: {count}\n", descriptor.display_name));
        }
        for status in ALL_STATUSES.iter() {
            let count = self.wetland_statuses.get(status.as_str()).unwrap_or(&0);
            out.push_str(&format!("  {status}: {count}\n"));
        }
        out
    }
}
