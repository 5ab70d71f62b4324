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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;
use rand::Rng;
use rand::rngs::StdRng;

use crate::cmd::drill::image::image_url;
use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;
use crate::session::controller::Controller;
use crate::session::controller::Mode;
use crate::session::flashcard::FlashcardSession;
use crate::session::quiz::QUIZ_TYPES;
use crate::session::quiz::QuizSession;
use crate::session::quiz::Verdict;
use crate::types::category::CATEGORIES;
use crate::types::category::CategoryFilter;
use crate::types::plant::ImageRef;
use crate::types::plant::Plant;
use crate::types::wetland::ALL_STATUSES;
use crate::types::wetland::WetlandStatus;

/// Shown when a plant has no image, or its image fails to load.
const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='300' height='200'%3E%3Crect width='100%25' height='100%25' fill='%23ecfdf5'/%3E%3Ctext x='50%25' y='50%25' font-size='48' text-anchor='middle' dominant-baseline='middle'%3E%F0%9F%8C%BF%3C/text%3E%3C/svg%3E";

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let guard = state.mutable.lock().unwrap();
    let controller: &Controller<StdRng> = &guard;
    let content = match controller.mode() {
        Mode::Menu => render_menu(controller),
        Mode::Flashcards(session) => render_flashcards(controller, session),
        Mode::Quiz(quiz) => render_quiz(quiz),
        Mode::Results(quiz) => render_results(quiz),
    };
    let body = html! {
        @if !matches!(controller.mode(), Mode::Menu) {
            form.back action="/" method="post" {
                button id="menu" type="submit" name="action" value="Menu" { "← Menu" }
            }
        }
        div class=(format!("root {}", controller.mode().name())) {
            (content)
        }
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

fn render_menu<R: Rng>(controller: &Controller<R>) -> Markup {
    let catalog = controller.catalog();
    let available = controller.working_set().len();
    let known = controller.known().count_in(catalog);
    let total = catalog.len();
    let percent = if total == 0 { 0 } else { known * 100 / total };
    html! {
        section.categories {
            h2 { "Category" }
            (category_selector(controller.category()))
            p.available { (available) " plants available" }
        }
        div.modes {
            section.mode {
                h3 { "Flashcards" }
                p { "Learn plant names, wetland status, and characteristics" }
                form action="/" method="post" {
                    button.primary id="start-flashcards" type="submit" name="action" value="StartFlashcards" disabled[available == 0] {
                        "Start Learning"
                    }
                }
            }
            section.mode {
                h3 { "Quiz" }
                p { "Test your knowledge" }
                form.quiz-types action="/" method="post" {
                    input type="hidden" name="action" value="SelectQuizType";
                    @for quiz_type in QUIZ_TYPES {
                        button.chip.selected[quiz_type == controller.quiz_type()] type="submit" name="value" value=(quiz_type.as_str()) {
                            (quiz_type.label())
                        }
                    }
                }
                form action="/" method="post" {
                    button.primary id="start-quiz" type="submit" name="action" value="StartQuiz" disabled[available == 0] {
                        "Start Quiz"
                    }
                }
            }
        }
        section.progress {
            div.section-header {
                h3 { "Progress" }
                @if !controller.known().is_empty() {
                    form action="/" method="post" onsubmit="return confirm('Reset all progress?');" {
                        button id="reset" type="submit" name="action" value="Reset" { "Reset" }
                    }
                }
            }
            div.progress-row {
                div {
                    div.count { (known) }
                    div.label { "Mastered" }
                }
                div.bar {
                    div.fill style=(format!("width: {percent}%")) {}
                }
                div.total { (total) }
            }
        }
        section.legend {
            h3 { "Wetland Indicator Status" }
            @for status in ALL_STATUSES {
                div.legend-row {
                    (status_badge(status))
                    span { (status.description().split(" - ").nth(1).unwrap_or_default()) }
                }
            }
        }
    }
}

fn render_flashcards<R: Rng>(controller: &Controller<R>, session: &FlashcardSession) -> Markup {
    let plant = match session.current() {
        Some(plant) => plant,
        None => {
            return html! {
                (category_selector(controller.category()))
                div.empty {
                    p { "No plants in this category." }
                }
            };
        }
    };
    let known = controller.is_known(&plant.id);
    let side: Markup = if session.is_revealed() {
        html! {
            div.back {
                div.names {
                    h2 { (plant.common_name) }
                    p.scientific { (plant.scientific_name) }
                }
                div.badges {
                    (status_badge(plant.wetland_status))
                    span.tag { (plant.category) }
                    @if plant.native {
                        span.tag.native { "Native" }
                    }
                }
                p.description { (plant.description) }
                @if !plant.habitat.is_empty() {
                    p.habitat { span.label { "Habitat:" } " " (plant.habitat) }
                }
                @if let Some(fun_fact) = &plant.fun_fact {
                    p.fun-fact { span.label { "Fun Fact:" } " " (fun_fact) }
                }
            }
        }
    } else {
        html! {
            div.front {
                (plant_image(plant))
                p.question { "What is this plant?" }
            }
        }
    };
    html! {
        (category_selector(controller.category()))
        div.status-row {
            span.position { (session.position() + 1) " / " (session.len()) }
            span.hint { "← → to navigate, space to flip" }
            @if known {
                span.mastered { "Mastered" }
            }
        }
        div.card.flipped[session.is_revealed()] {
            (side)
            form action="/" method="post" {
                button id="flip" type="submit" name="action" value="Flip" {
                    @if session.is_revealed() { "Flip back" } @else { "Reveal" }
                }
            }
        }
        form.controls action="/" method="post" {
            button id="prev" type="submit" name="action" value="Prev" aria-label="Previous card" { "←" }
            button.known[known] id="toggle-known" type="submit" name="action" value="ToggleKnown" {
                @if known { "✓ Mastered" } @else { "Mark as Known" }
            }
            button id="next" type="submit" name="action" value="Next" aria-label="Next card" { "→" }
        }
    }
}

fn render_quiz(quiz: &QuizSession) -> Markup {
    let question = quiz.current();
    let plant = question.plant();
    let (score, judged) = quiz.live_score();
    let percent = judged * 100 / quiz.len();
    let selected = quiz.selected_answer();
    html! {
        div.status-row {
            span.position { "Question " (quiz.current_index() + 1) " of " (quiz.len()) }
            span.live-score { (score) "/" (judged) }
        }
        div.bar {
            div.fill style=(format!("width: {percent}%")) {}
        }
        div.question {
            (plant_image(plant))
            h3 { (plant.common_name) }
            p.prompt { (question.kind().prompt()) }
            form.options action="/" method="post" {
                input type="hidden" name="action" value="Answer";
                @for (i, option) in question.options().iter().enumerate() {
                    @let option_css = option_class(option, question.correct_answer(), selected);
                    button id=(format!("option-{}", i + 1)) class=(option_css) type="submit" name="value" value=(option) disabled[selected.is_some()] {
                        (option)
                    }
                }
            }
            @if let Some(answer) = selected {
                @if answer == question.correct_answer() {
                    div.feedback.correct {
                        p { "Correct!" }
                    }
                } @else {
                    div.feedback.wrong {
                        p { "The answer is " strong { (question.correct_answer()) } }
                    }
                }
                form action="/" method="post" {
                    button.primary id="next-question" type="submit" name="action" value="NextQuestion" {
                        @if quiz.is_last() { "See Results" } @else { "Next Question" }
                    }
                }
            }
        }
    }
}

fn render_results(quiz: &QuizSession) -> Markup {
    let verdict = quiz.verdict();
    let tier = match verdict {
        Verdict::Excellent => "excellent",
        Verdict::Good => "good",
        Verdict::KeepStudying => "keep-studying",
    };
    html! {
        div.results {
            h2 { "Quiz Complete" }
            p {
                "You scored " span.score { (quiz.score()) } " out of " span { (quiz.len()) }
                " (" (quiz.percentage()) "%)"
            }
            div.bar {
                div class=(format!("fill {tier}")) style=(format!("width: {}%", quiz.percentage())) {}
            }
            p.verdict { (verdict.message()) }
            ol.review {
                @for question in quiz.questions() {
                    li {
                        span.plant-name { (question.plant().common_name) }
                        ": "
                        span.answer { (question.correct_answer()) }
                    }
                }
            }
            form.controls action="/" method="post" {
                button.primary id="try-again" type="submit" name="action" value="StartQuiz" { "Try Again" }
                button id="back" type="submit" name="action" value="Menu" { "Back to Menu" }
            }
        }
    }
}

fn category_selector(selected: CategoryFilter) -> Markup {
    html! {
        form.category-selector action="/" method="post" {
            input type="hidden" name="action" value="SelectCategory";
            @for descriptor in CATEGORIES.iter() {
                button.chip.selected[descriptor.filter == selected] type="submit" name="value" value=(descriptor.filter.id()) {
                    (descriptor.display_name)
                }
            }
        }
    }
}

fn plant_image(plant: &Plant) -> Markup {
    let src: String = match plant.image() {
        Some(ImageRef::Remote(url)) => url.to_string(),
        Some(ImageRef::Local(path)) => image_url(path),
        None => PLACEHOLDER_IMAGE.to_string(),
    };
    html! {
        img.plant-image src=(src) alt=(plant.common_name) data-fallback=(PLACEHOLDER_IMAGE) onerror="this.onerror=null;this.src=this.dataset.fallback;";
    }
}

fn status_badge(status: WetlandStatus) -> Markup {
    html! {
        span class=(format!("badge badge-{}", status.as_str().to_lowercase())) { (status.as_str()) }
    }
}

fn option_class(option: &str, correct: &str, selected: Option<&str>) -> &'static str {
    match selected {
        None => "option",
        Some(_) if option == correct => "option correct",
        Some(answer) if answer == option => "option wrong",
        Some(_) => "option dim",
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::Catalog;
    use crate::error::Fallible;
    use crate::session::quiz::QuizStep;
    use crate::session::quiz::QuizType;
    use crate::session::quiz::generate_quiz;
    use crate::types::category::Category;
    use crate::types::plant::fixtures::plant;

    #[test]
    fn test_option_class() {
        assert_eq!(option_class("A", "A", None), "option");
        assert_eq!(option_class("A", "A", Some("A")), "option correct");
        assert_eq!(option_class("A", "A", Some("B")), "option correct");
        assert_eq!(option_class("B", "A", Some("B")), "option wrong");
        assert_eq!(option_class("C", "A", Some("B")), "option dim");
    }

    #[test]
    fn test_status_badge() {
        let html = status_badge(WetlandStatus::Facw).into_string();
        assert_eq!(html, r#"<span class="badge badge-facw">FACW</span>"#);
    }

    #[test]
    fn test_results_after_perfect_quiz() -> Fallible<()> {
        let plants: Vec<Plant> = [
            plant("buttonbush", Category::Shrub, WetlandStatus::Obl),
            plant("spicebush", Category::Shrub, WetlandStatus::Fac),
            plant("elderberry", Category::Shrub, WetlandStatus::Facw),
        ]
        .into_iter()
        .map(|p| (*p).clone())
        .collect();
        let catalog = Catalog::new(plants)?;
        let shrubs = catalog.filter(CategoryFilter::Only(Category::Shrub));
        let mut rng = StdRng::seed_from_u64(3);
        let mut quiz = generate_quiz(&shrubs, &catalog, QuizType::Wetland, &mut rng)?;
        loop {
            let correct = quiz.current().correct_answer().to_string();
            quiz.submit_answer(&correct);
            if quiz.advance()? == QuizStep::Finished {
                break;
            }
        }
        let html = render_results(&quiz).into_string();
        assert!(html.contains(
            r#"You scored <span class="score">3</span> out of <span>3</span> (100%)"#
        ));
        assert!(html.contains(Verdict::Excellent.message()));
        assert_eq!(html.matches(r#"<span class="answer">"#).count(), 3);
        Ok(())
    }
}
