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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A plant's growth form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tree,
    Shrub,
    Herb,
    Vine,
    Grass,
    Fern,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tree => "tree",
            Category::Shrub => "shrub",
            Category::Herb => "herb",
            Category::Vine => "vine",
            Category::Grass => "grass",
            Category::Fern => "fern",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(Category::Tree),
            "shrub" => Ok(Category::Shrub),
            "herb" => Ok(Category::Herb),
            "vine" => Ok(Category::Vine),
            "grass" => Ok(Category::Grass),
            "fern" => Ok(Category::Fern),
            _ => fail(format!("Invalid category: {s}")),
        }
    }
}

/// Which part of the catalog is in scope.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn id(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.parse()?))
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A category as shown in the menu.
pub struct CategoryDescriptor {
    pub filter: CategoryFilter,
    pub display_name: &'static str,
}

/// The menu's category list, in display order.
pub const CATEGORIES: [CategoryDescriptor; 7] = [
    CategoryDescriptor {
        filter: CategoryFilter::All,
        display_name: "All Plants",
    },
    CategoryDescriptor {
        filter: CategoryFilter::Only(Category::Tree),
        display_name: "Trees",
    },
    CategoryDescriptor {
        filter: CategoryFilter::Only(Category::Shrub),
        display_name: "Shrubs",
    },
    CategoryDescriptor {
        filter: CategoryFilter::Only(Category::Herb),
        display_name: "Herbs & Wildflowers",
    },
    CategoryDescriptor {
        filter: CategoryFilter::Only(Category::Grass),
        display_name: "Grasses & Sedges",
    },
    CategoryDescriptor {
        filter: CategoryFilter::Only(Category::Fern),
        display_name: "Ferns",
    },
    CategoryDescriptor {
        filter: CategoryFilter::Only(Category::Vine),
        display_name: "Vines",
    },
];
