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

use std::path::Path;
use std::path::PathBuf;

use axum::extract;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::utf8_percent_encode;
use tokio::fs::read;

use crate::cmd::drill::state::ServerState;

/// Why an image reference was refused.
#[derive(Debug, PartialEq)]
pub enum ImagePathError {
    Empty,
    /// Contains `..`, or is absolute.
    InvalidPath,
    Symlink,
    NotFound,
    /// Resolves to somewhere outside the collection.
    OutsideDirectory,
}

/// Resolve an image reference against the collection directory. The result
/// is canonical and guaranteed to lie inside `collection`.
pub fn validate_image_path(collection: &Path, reference: String) -> Result<PathBuf, ImagePathError> {
    if reference.trim().is_empty() {
        return Err(ImagePathError::Empty);
    }
    let relative = PathBuf::from(&reference);
    if reference.contains("..") || relative.is_absolute() {
        return Err(ImagePathError::InvalidPath);
    }
    let joined = collection.join(&relative);
    if joined.is_symlink() {
        return Err(ImagePathError::Symlink);
    }
    let resolved = joined
        .canonicalize()
        .map_err(|_| ImagePathError::NotFound)?;
    let root = collection
        .canonicalize()
        .map_err(|_| ImagePathError::NotFound)?;
    // Catches symlinked parent directories.
    if !resolved.starts_with(&root) {
        return Err(ImagePathError::OutsideDirectory);
    }
    Ok(resolved)
}

/// Bytes that can't appear verbatim in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The URL the image route serves a local image reference under. Each
/// segment is encoded separately so the separators survive.
pub fn image_url(reference: &str) -> String {
    let encoded: Vec<String> = reference
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();
    format!("/image/{}", encoded.join("/"))
}

type ImageResponse = (StatusCode, [(HeaderName, &'static str); 2], Vec<u8>);

/// Serves a plant image from the collection directory.
pub async fn image_handler(
    State(state): State<ServerState>,
    extract::Path(path): extract::Path<String>,
) -> Result<ImageResponse, StatusCode> {
    let resolved = match validate_image_path(&state.directory, path) {
        Ok(resolved) => resolved,
        Err(e) => {
            log::debug!("Rejected image request: {e:?}");
            return Err(StatusCode::NOT_FOUND);
        }
    };
    let content_type = content_type_of(&resolved);
    let bytes = read(&resolved).await.map_err(|_| StatusCode::NOT_FOUND)?;
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, "public, max-age=604800"),
        ],
        bytes,
    ))
}

fn content_type_of(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
