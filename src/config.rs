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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::session::quiz::QuizType;
use crate::types::category::CategoryFilter;

pub const CONFIG_FILE_NAME: &str = "vaplants.toml";

/// Per-collection settings, read from `vaplants.toml` if present.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub category: CategoryFilter,
    pub quiz_type: QuizType,
    pub open_browser: bool,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    port: Option<u16>,
    category: Option<String>,
    quiz_type: Option<String>,
    open_browser: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            category: CategoryFilter::All,
            quiz_type: QuizType::Mixed,
            open_browser: true,
        }
    }
}

impl Config {
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE_NAME}, using defaults.");
            return Ok(Self::default());
        }
        let contents = read_to_string(&path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Fallible<Self> {
        let raw: RawConfig = toml::from_str(contents)
            .map_err(|e| ErrorReport::new(format!("invalid {CONFIG_FILE_NAME}: {e}")))?;
        let defaults = Self::default();
        Ok(Self {
            port: raw.port.unwrap_or(defaults.port),
            category: match raw.category {
                Some(id) => id.parse()?,
                None => defaults.category,
            },
            quiz_type: match raw.quiz_type {
                Some(kind) => kind.parse()?,
                None => defaults.quiz_type,
            },
            open_browser: raw.open_browser.unwrap_or(defaults.open_browser),
        })
    }
}
