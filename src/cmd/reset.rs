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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::known::KnownCards;

pub fn reset_progress(directory: Option<String>, yes: bool) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mut known = KnownCards::load(coll.storage);
    clear_known(&mut known, yes, &mut stdin().lock(), &mut stdout())
}

fn clear_known(
    known: &mut KnownCards,
    yes: bool,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<()> {
    if known.is_empty() {
        writeln!(output, "Nothing to reset.")?;
        return Ok(());
    }
    if !yes {
        let prompt = format!("Reset progress on {} plants? [y/N] ", known.len());
        if !confirm(&prompt, input, output)? {
            writeln!(output, "Cancelled.")?;
            return Ok(());
        }
    }
    known.try_reset()?;
    writeln!(output, "Progress reset.")?;
    Ok(())
}

/// Ask a yes/no question. Anything other than `y` or `yes` is a no.
fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Fallible<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
