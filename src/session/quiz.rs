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

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Catalog;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::plant::PlantRef;
use crate::types::wetland::DISTRACTOR_STATUSES;
use crate::types::wetland::WetlandStatus;

/// The most questions a quiz will ask.
pub const QUIZ_LENGTH: usize = 10;

/// Options per question: the correct answer plus three distractors.
pub const OPTION_COUNT: usize = 4;

/// What the user asked to be quizzed on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuizType {
    /// Scientific names only.
    Name,
    /// Wetland indicator statuses only.
    Wetland,
    /// A coin flip per question.
    Mixed,
}

pub const QUIZ_TYPES: [QuizType; 3] = [QuizType::Name, QuizType::Wetland, QuizType::Mixed];

impl QuizType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::Name => "name",
            QuizType::Wetland => "wetland",
            QuizType::Mixed => "mixed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuizType::Name => "Scientific Names",
            QuizType::Wetland => "Wetland Status",
            QuizType::Mixed => "Mixed",
        }
    }
}

impl Display for QuizType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuizType {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(QuizType::Name),
            "wetland" => Ok(QuizType::Wetland),
            "mixed" => Ok(QuizType::Mixed),
            _ => fail(format!("Invalid quiz type: {s}")),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QuestionKind {
    ScientificName,
    WetlandStatus,
}

impl QuestionKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            QuestionKind::ScientificName => "What is the scientific name?",
            QuestionKind::WetlandStatus => "What is the wetland indicator status?",
        }
    }
}

pub struct QuizQuestion {
    plant: PlantRef,
    kind: QuestionKind,
    options: Vec<String>,
    correct_answer: String,
}

impl QuizQuestion {
    pub fn plant(&self) -> &PlantRef {
        &self.plant
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }
}

/// Result of moving past an answered question.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuizStep {
    Next,
    Finished,
}

/// How well a finished quiz went.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Excellent,
    Good,
    KeepStudying,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Excellent => "Excellent! You really know your Virginia plants!",
            Verdict::Good => "Good job! Keep practicing to improve.",
            Verdict::KeepStudying => "Keep studying! Try the flashcards to learn more.",
        }
    }
}

pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: usize,
    selected_answer: Option<String>,
}

/// Build a quiz over `working_set`. Distractor names are drawn from the
/// whole catalog so that small categories still get four options.
pub fn generate_quiz<R: Rng + ?Sized>(
    working_set: &[PlantRef],
    catalog: &Catalog,
    quiz_type: QuizType,
    rng: &mut R,
) -> Fallible<QuizSession> {
    if working_set.is_empty() {
        return fail("no plants in the selected category.");
    }
    let mut selected: Vec<PlantRef> = working_set.to_vec();
    selected.shuffle(rng);
    selected.truncate(QUIZ_LENGTH);

    let mut questions: Vec<QuizQuestion> = Vec::with_capacity(selected.len());
    for plant in selected {
        let question = match quiz_type {
            QuizType::Name => match name_question(&plant, catalog, rng) {
                Some(question) => question,
                None => {
                    return fail(format!(
                        "not enough distinct scientific names to quiz on '{}'.",
                        plant.id
                    ));
                }
            },
            QuizType::Wetland => wetland_question(&plant, rng),
            QuizType::Mixed => {
                if rng.random_bool(0.5) {
                    match name_question(&plant, catalog, rng) {
                        Some(question) => question,
                        None => wetland_question(&plant, rng),
                    }
                } else {
                    wetland_question(&plant, rng)
                }
            }
        };
        questions.push(question);
    }
    log::debug!(
        "Generated {} {} questions.",
        questions.len(),
        quiz_type.as_str()
    );
    Ok(QuizSession {
        questions,
        current_index: 0,
        score: 0,
        selected_answer: None,
    })
}

fn name_question<R: Rng + ?Sized>(
    plant: &PlantRef,
    catalog: &Catalog,
    rng: &mut R,
) -> Option<QuizQuestion> {
    let mut others: Vec<&PlantRef> = catalog
        .plants()
        .iter()
        .filter(|other| other.id != plant.id)
        .collect();
    others.shuffle(rng);
    let correct_answer = plant.scientific_name.clone();
    let mut options: Vec<String> = vec![correct_answer.clone()];
    for other in others {
        if options.len() == OPTION_COUNT {
            break;
        }
        if !options.contains(&other.scientific_name) {
            options.push(other.scientific_name.clone());
        }
    }
    if options.len() < OPTION_COUNT {
        return None;
    }
    options.shuffle(rng);
    Some(QuizQuestion {
        plant: plant.clone(),
        kind: QuestionKind::ScientificName,
        options,
        correct_answer,
    })
}

fn wetland_question<R: Rng + ?Sized>(plant: &PlantRef, rng: &mut R) -> QuizQuestion {
    // Four codes remain once the correct one is excluded (five if the plant
    // is NI), so three distractors are always available.
    let mut pool: Vec<WetlandStatus> = DISTRACTOR_STATUSES
        .iter()
        .copied()
        .filter(|status| *status != plant.wetland_status)
        .collect();
    pool.shuffle(rng);
    let correct_answer = plant.wetland_status.as_str().to_string();
    let mut options: Vec<String> = vec![correct_answer.clone()];
    options.extend(
        pool.iter()
            .take(OPTION_COUNT - 1)
            .map(|status| status.as_str().to_string()),
    );
    options.shuffle(rng);
    QuizQuestion {
        plant: plant.clone(),
        kind: QuestionKind::WetlandStatus,
        options,
        correct_answer,
    }
}

impl QuizSession {
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &QuizQuestion {
        &self.questions[self.current_index]
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    pub fn is_answered(&self) -> bool {
        self.selected_answer.is_some()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// Record an answer to the current question. Does nothing if the
    /// question has already been answered.
    pub fn submit_answer(&mut self, answer: &str) {
        if self.is_answered() {
            return;
        }
        if answer == self.current().correct_answer {
            self.score += 1;
        }
        self.selected_answer = Some(answer.to_string());
    }

    /// Move past the current question, which must have been answered.
    pub fn advance(&mut self) -> Fallible<QuizStep> {
        if !self.is_answered() {
            return fail("the current question has not been answered.");
        }
        if self.is_last() {
            return Ok(QuizStep::Finished);
        }
        self.current_index += 1;
        self.selected_answer = None;
        Ok(QuizStep::Next)
    }

    /// The running score as `(correct, judged)`, counting only questions
    /// that have been answered.
    pub fn live_score(&self) -> (usize, usize) {
        let judged = self.current_index + usize::from(self.is_answered());
        (self.score, judged)
    }

    /// Percentage of the whole quiz answered correctly, rounded down.
    pub fn percentage(&self) -> usize {
        self.score * 100 / self.questions.len()
    }

    pub fn verdict(&self) -> Verdict {
        let len = self.questions.len();
        // Integer forms of `score >= 0.8 * len` and `score >= 0.6 * len`.
        if self.score * 10 >= len * 8 {
            Verdict::Excellent
        } else if self.score * 10 >= len * 6 {
            Verdict::Good
        } else {
            Verdict::KeepStudying
        }
    }
}
