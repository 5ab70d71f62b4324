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
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::signal::ctrl_c;
use tokio::time::sleep;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::image::image_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::ServerState;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::controller::Controller;

/// Command-line overrides for the collection's settings.
pub struct ServerConfig {
    pub directory: Option<String>,
    pub port: Option<u16>,
    pub open_browser: Option<bool>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let coll = Collection::new(config.directory)?;
    if coll.catalog.is_empty() {
        return fail("collection has no plants.");
    }
    let port: u16 = config.port.unwrap_or(coll.config.port);
    let open_browser: bool = config.open_browser.unwrap_or(coll.config.open_browser);

    let mut controller = Controller::new(coll.catalog, coll.storage, StdRng::from_os_rng());
    controller.set_category(coll.config.category);
    controller.set_quiz_type(coll.config.quiz_type);

    let state = ServerState {
        directory: coll.directory,
        mutable: Arc::new(Mutex::new(controller)),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.route("/image/{*path}", get(image_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("0.0.0.0:{port}");

    // Start a separate task to open the browser.
    if open_browser {
        let probe = bind.clone();
        let url = format!("http://localhost:{port}/");
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::warn!("Could not open the browser: {e}");
            }
        });
    }

    // Start the server.
    log::info!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if ctrl_c().await.is_ok() {
        log::debug!("Shutting down.");
    }
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
