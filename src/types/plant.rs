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

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::category::Category;
use crate::types::wetland::WetlandStatus;

/// A plant record, as it appears in catalog files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Stable slug, unique within a catalog.
    pub id: String,
    /// USDA PLANTS symbol, for harvested records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub common_name: String,
    pub scientific_name: String,
    pub wetland_status: WetlandStatus,
    pub category: Category,
    pub native: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub habitat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
    /// Either an `http(s)` URL, or a path relative to the collection root.
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Plants are loaded once and shared by every session.
pub type PlantRef = Arc<Plant>;

pub enum ImageRef<'a> {
    Remote(&'a str),
    Local(&'a str),
}

impl Plant {
    /// Checks the fields every record must have.
    pub fn validate(&self) -> Fallible<()> {
        if self.id.trim().is_empty() {
            return fail("plant has an empty id.");
        }
        if self.common_name.trim().is_empty() {
            return fail(format!("plant '{}' has an empty common name.", self.id));
        }
        if self.scientific_name.trim().is_empty() {
            return fail(format!("plant '{}' has an empty scientific name.", self.id));
        }
        Ok(())
    }

    pub fn image(&self) -> Option<ImageRef<'_>> {
        let image = self.image.as_deref()?.trim();
        if image.is_empty() {
            None
        } else if image.starts_with("http://") || image.starts_with("https://") {
            Some(ImageRef::Remote(image))
        } else {
            Some(ImageRef::Local(image))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "red-maple",
            "commonName": "Red Maple",
            "scientificName": "Acer rubrum",
            "wetlandStatus": "FAC",
            "category": "tree",
            "native": true,
            "imageUrl": "https://example.com/maple.jpg"
        }"#;
        let plant: Plant = serde_json::from_str(json).unwrap();
        assert_eq!(plant.common_name, "Red Maple");
        assert_eq!(plant.wetland_status, WetlandStatus::Fac);
        assert_eq!(plant.category, Category::Tree);
        assert_eq!(plant.description, "");
        assert!(matches!(
            plant.image(),
            Some(ImageRef::Remote("https://example.com/maple.jpg"))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_scientific_name() {
        let mut plant = (*fixtures::plant("red-maple", Category::Tree, WetlandStatus::Fac)).clone();
        assert!(plant.validate().is_ok());
        plant.scientific_name = "  ".to_string();
        let err = plant.validate().err().unwrap();
        assert_eq!(
            err.to_string(),
            "error: plant 'red-maple' has an empty scientific name."
        );
    }

    #[test]
    fn test_local_image() {
        let mut plant = (*fixtures::plant("red-maple", Category::Tree, WetlandStatus::Fac)).clone();
        plant.image = Some("images/red-maple.png".to_string());
        assert!(matches!(plant.image(), Some(ImageRef::Local("images/red-maple.png"))));
        plant.image = Some("".to_string());
        assert!(plant.image().is_none());
    }

    #[test]
    fn test_fixture_common_name() {
        let plant = fixtures::plant("red-maple", Category::Tree, WetlandStatus::Fac);
        assert_eq!(plant.common_name, "Red Maple");
    }
}
