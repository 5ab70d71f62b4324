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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::drill::state::ServerState;
use crate::error::ErrorReport;
use crate::error::Fallible;

#[derive(Debug, Deserialize)]
enum Action {
    SelectCategory,
    SelectQuizType,
    StartFlashcards,
    StartQuiz,
    Flip,
    Reveal,
    Hide,
    Prev,
    Next,
    ToggleKnown,
    Answer,
    NextQuestion,
    Menu,
    Reset,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    /// The category id, quiz type, or answer, for actions that take one.
    #[serde(default)]
    value: Option<String>,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(&state, form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to("/")
}

fn action_handler(state: &ServerState, form: FormData) -> Fallible<()> {
    let mut controller = state
        .mutable
        .lock()
        .map_err(|_| ErrorReport::new("session lock poisoned"))?;
    log::debug!("{:?} in {} mode", form.action, controller.mode().name());
    match form.action {
        Action::SelectCategory => controller.select_category(&required(form.value)?),
        Action::SelectQuizType => controller.select_quiz_type(&required(form.value)?),
        Action::StartFlashcards => controller.start_flashcards(),
        Action::StartQuiz => controller.start_quiz(),
        Action::Flip => controller.flip(),
        Action::Reveal => controller.reveal(),
        Action::Hide => controller.hide(),
        Action::Prev => controller.prev(),
        Action::Next => controller.next(),
        Action::ToggleKnown => controller.toggle_known(),
        Action::Answer => controller.submit_answer(&required(form.value)?),
        Action::NextQuestion => controller.advance_question(),
        Action::Menu => {
            controller.return_to_menu();
            Ok(())
        }
        Action::Reset => {
            controller.reset_known();
            Ok(())
        }
    }
}

fn required(value: Option<String>) -> Fallible<String> {
    value.ok_or_else(|| ErrorReport::new("missing form value."))
}
