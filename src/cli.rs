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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_collection;
use crate::cmd::drill::server::ServerConfig;
use crate::cmd::drill::server::start_server;
use crate::cmd::harvest::DEFAULT_SYMBOLS;
use crate::cmd::harvest::harvest;
use crate::cmd::reset::reset_progress;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Study plants in the browser, with flashcards and quizzes.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// The port to use for the web server. Overrides the collection's settings.
        #[arg(long)]
        port: Option<u16>,
        /// Whether to open the browser automatically. Overrides the collection's settings.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Check the integrity of a collection.
    Check {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Print catalog and progress statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Json)]
        format: StatsFormat,
    },
    /// Forget which plants have been marked as known.
    Reset {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Don't ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
    /// Fetch plant records from the USDA PLANTS database into a JSON catalog file.
    Harvest {
        /// USDA symbols to fetch. By default, a built-in list of Virginia wetland plants.
        symbols: Vec<String>,
        /// Where to write the catalog file.
        #[arg(long, default_value = "usda-plants.json")]
        output: PathBuf,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            directory,
            port,
            open_browser,
        } => {
            let config = ServerConfig {
                directory,
                port,
                open_browser,
            };
            start_server(config).await
        }
        Command::Check { directory } => check_collection(directory),
        Command::Stats { directory, format } => print_stats(directory, format),
        Command::Reset { directory, yes } => reset_progress(directory, yes),
        Command::Harvest { symbols, output } => {
            let symbols: Vec<String> = if symbols.is_empty() {
                DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
            } else {
                symbols
            };
            harvest(&symbols, &output).await
        }
    }
}
