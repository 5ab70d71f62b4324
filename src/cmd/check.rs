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

use crate::catalog::Catalog;
use crate::cmd::drill::image::validate_image_path;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::plant::ImageRef;

/// Validates a collection without touching its progress database: the
/// settings file must parse, every catalog record must be well-formed, and
/// every local image must exist inside the collection.
pub fn check_collection(directory: Option<String>) -> Fallible<()> {
    let directory: PathBuf = match directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    Config::load(&directory)?;
    let catalog = Catalog::load(&directory)?;
    for plant in catalog.plants() {
        if let Some(ImageRef::Local(path)) = plant.image() {
            if let Err(e) = validate_image_path(&directory, path.to_string()) {
                return fail(format!(
                    "plant '{}' has an invalid image '{path}': {e:?}.",
                    plant.id
                ));
            }
        }
    }
    log::debug!("{} plants checked.", catalog.len());
    println!("ok");
    Ok(())
}
