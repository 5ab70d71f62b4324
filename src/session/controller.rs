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

use std::mem::replace;
use std::sync::Arc;

use rand::Rng;

use crate::catalog::Catalog;
use crate::catalog::WorkingSet;
use crate::db::Storage;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::flashcard::Direction;
use crate::session::flashcard::FlashcardSession;
use crate::session::known::KnownCards;
use crate::session::quiz::QuizSession;
use crate::session::quiz::QuizStep;
use crate::session::quiz::QuizType;
use crate::session::quiz::generate_quiz;
use crate::types::category::CategoryFilter;

pub enum Mode {
    Menu,
    Flashcards(FlashcardSession),
    Quiz(QuizSession),
    Results(QuizSession),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Menu => "menu",
            Mode::Flashcards(_) => "flashcards",
            Mode::Quiz(_) => "quiz",
            Mode::Results(_) => "results",
        }
    }
}

/// Owns all study state. The presentation layer reads state through the
/// accessors and changes it only through the command methods, each of which
/// either succeeds or leaves the state untouched.
pub struct Controller<R: Rng> {
    catalog: Arc<Catalog>,
    category: CategoryFilter,
    quiz_type: QuizType,
    mode: Mode,
    known: KnownCards,
    rng: R,
}

impl<R: Rng> Controller<R> {
    pub fn new(catalog: Arc<Catalog>, storage: Box<dyn Storage>, rng: R) -> Self {
        Self {
            catalog,
            category: CategoryFilter::All,
            quiz_type: QuizType::Mixed,
            mode: Mode::Menu,
            known: KnownCards::load(storage),
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn quiz_type(&self) -> QuizType {
        self.quiz_type
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn known(&self) -> &KnownCards {
        &self.known
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    pub fn working_set(&self) -> WorkingSet {
        self.catalog.filter(self.category)
    }

    pub fn select_category(&mut self, id: &str) -> Fallible<()> {
        let filter: CategoryFilter = id.parse()?;
        self.set_category(filter);
        Ok(())
    }

    pub fn set_category(&mut self, filter: CategoryFilter) {
        self.category = filter;
        let items = self.working_set();
        if let Mode::Flashcards(session) = &mut self.mode {
            session.replace_items(items);
        }
    }

    pub fn select_quiz_type(&mut self, kind: &str) -> Fallible<()> {
        self.quiz_type = kind.parse()?;
        Ok(())
    }

    pub fn set_quiz_type(&mut self, quiz_type: QuizType) {
        self.quiz_type = quiz_type;
    }

    pub fn start_flashcards(&mut self) -> Fallible<()> {
        let items = self.working_set();
        if items.is_empty() {
            return fail("no plants in the selected category.");
        }
        log::debug!("Starting flashcards over {} plants.", items.len());
        self.mode = Mode::Flashcards(FlashcardSession::new(items));
        Ok(())
    }

    pub fn start_quiz(&mut self) -> Fallible<()> {
        let items = self.working_set();
        let quiz = generate_quiz(&items, &self.catalog, self.quiz_type, &mut self.rng)?;
        self.mode = Mode::Quiz(quiz);
        Ok(())
    }

    pub fn flip(&mut self) -> Fallible<()> {
        self.flashcards()?.flip();
        Ok(())
    }

    pub fn reveal(&mut self) -> Fallible<()> {
        self.flashcards()?.reveal();
        Ok(())
    }

    pub fn hide(&mut self) -> Fallible<()> {
        self.flashcards()?.hide();
        Ok(())
    }

    pub fn next(&mut self) -> Fallible<()> {
        self.flashcards()?.advance(Direction::Forward);
        Ok(())
    }

    pub fn prev(&mut self) -> Fallible<()> {
        self.flashcards()?.advance(Direction::Backward);
        Ok(())
    }

    pub fn toggle_known(&mut self) -> Fallible<()> {
        let id = match &self.mode {
            Mode::Flashcards(session) => match session.current() {
                Some(plant) => plant.id.clone(),
                None => return fail("there is no current card."),
            },
            _ => return fail("not in flashcard mode."),
        };
        let known = self.known.toggle(&id);
        log::debug!("{id} known={known}");
        Ok(())
    }

    pub fn submit_answer(&mut self, answer: &str) -> Fallible<()> {
        match &mut self.mode {
            Mode::Quiz(quiz) => {
                quiz.submit_answer(answer);
                Ok(())
            }
            _ => fail("not in quiz mode."),
        }
    }

    pub fn advance_question(&mut self) -> Fallible<()> {
        let step = match &mut self.mode {
            Mode::Quiz(quiz) => quiz.advance()?,
            _ => return fail("not in quiz mode."),
        };
        if step == QuizStep::Finished {
            if let Mode::Quiz(quiz) = replace(&mut self.mode, Mode::Menu) {
                log::debug!("Quiz finished: {}/{}", quiz.score(), quiz.len());
                self.mode = Mode::Results(quiz);
            }
        }
        Ok(())
    }

    pub fn return_to_menu(&mut self) {
        self.mode = Mode::Menu;
    }

    pub fn reset_known(&mut self) {
        log::debug!("Resetting progress.");
        self.known.reset();
    }

    fn flashcards(&mut self) -> Fallible<&mut FlashcardSession> {
        match &mut self.mode {
            Mode::Flashcards(session) => Ok(session),
            _ => fail("not in flashcard mode."),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::db::MemoryStorage;
    use crate::db::testing::BrokenStorage;
    use crate::types::category::Category;
    use crate::types::plant::Plant;
    use crate::types::plant::fixtures::plant;
    use crate::types::wetland::WetlandStatus;

    fn catalog() -> Arc<Catalog> {
        let plants: Vec<Plant> = vec![
            plant("red-maple", Category::Tree, WetlandStatus::Fac),
            plant("tulip-poplar", Category::Tree, WetlandStatus::Facu),
            plant("sweetgum", Category::Tree, WetlandStatus::Fac),
            plant("bald-cypress", Category::Tree, WetlandStatus::Obl),
            plant("river-birch", Category::Tree, WetlandStatus::Facw),
            plant("cinnamon-fern", Category::Fern, WetlandStatus::Facw),
            plant("royal-fern", Category::Fern, WetlandStatus::Obl),
            plant("buttonbush", Category::Shrub, WetlandStatus::Obl),
            plant("spicebush", Category::Shrub, WetlandStatus::Fac),
            plant("elderberry", Category::Shrub, WetlandStatus::Facw),
        ]
        .into_iter()
        .map(|p| (*p).clone())
        .collect();
        Arc::new(Catalog::new(plants).unwrap())
    }

    fn controller(storage: Box<dyn Storage>) -> Controller<StdRng> {
        Controller::new(catalog(), storage, StdRng::seed_from_u64(42))
    }

    fn flashcards(c: &Controller<StdRng>) -> &FlashcardSession {
        match c.mode() {
            Mode::Flashcards(session) => session,
            _ => panic!("expected flashcard mode"),
        }
    }

    fn quiz(c: &Controller<StdRng>) -> &QuizSession {
        match c.mode() {
            Mode::Quiz(quiz) | Mode::Results(quiz) => quiz,
            _ => panic!("expected quiz mode"),
        }
    }

    #[test]
    fn test_starts_in_menu() {
        let c = controller(Box::new(MemoryStorage::new()));
        assert_eq!(c.mode().name(), "menu");
        assert_eq!(c.category(), CategoryFilter::All);
        assert_eq!(c.quiz_type(), QuizType::Mixed);
        assert_eq!(c.working_set().len(), 10);
    }

    #[test]
    fn test_flashcard_navigation() -> Fallible<()> {
        let mut c = controller(Box::new(MemoryStorage::new()));
        c.select_category("fern")?;
        c.start_flashcards()?;
        assert_eq!(flashcards(&c).position(), 0);
        c.prev()?;
        assert_eq!(flashcards(&c).position(), 1);
        c.next()?;
        assert_eq!(flashcards(&c).position(), 0);
        c.flip()?;
        assert!(flashcards(&c).is_revealed());
        c.next()?;
        assert!(!flashcards(&c).is_revealed());
        Ok(())
    }

    #[test]
    fn test_restarting_flashcards_resets_position() -> Fallible<()> {
        let mut c = controller(Box::new(MemoryStorage::new()));
        c.start_flashcards()?;
        c.next()?;
        c.next()?;
        c.return_to_menu();
        c.start_flashcards()?;
        assert_eq!(flashcards(&c).position(), 0);
        Ok(())
    }

    #[test]
    fn test_category_switch_clamps_position() -> Fallible<()> {
        let mut c = controller(Box::new(MemoryStorage::new()));
        c.select_category("tree")?;
        c.start_flashcards()?;
        for _ in 0..4 {
            c.next()?;
        }
        c.reveal()?;
        assert_eq!(flashcards(&c).position(), 4);
        c.select_category("fern")?;
        assert_eq!(flashcards(&c).len(), 2);
        assert_eq!(flashcards(&c).position(), 1);
        assert!(!flashcards(&c).is_revealed());
        Ok(())
    }

    #[test]
    fn test_start_rejected_on_empty_category() -> Fallible<()> {
        let mut c = controller(Box::new(MemoryStorage::new()));
        c.select_category("vine")?;
        assert!(c.working_set().is_empty());
        assert!(c.start_flashcards().is_err());
        assert!(c.start_quiz().is_err());
        assert_eq!(c.mode().name(), "menu");
        Ok(())
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut c = controller(Box::new(MemoryStorage::new()));
        assert!(c.select_category("cactus").is_err());
        assert_eq!(c.category(), CategoryFilter::All);
        assert!(c.select_quiz_type("trivia").is_err());
        assert_eq!(c.quiz_type(), QuizType::Mixed);
    }

    #[test]
    fn test_commands_outside_their_mode_fail() {
        let mut c = controller(Box::new(MemoryStorage::new()));
        assert!(c.flip().is_err());
        assert!(c.next().is_err());
        assert!(c.toggle_known().is_err());
        assert!(c.submit_answer("FAC").is_err());
        assert!(c.advance_question().is_err());
        assert_eq!(c.mode().name(), "menu");
    }

    #[test]
    fn test_toggle_known_survives_reload() -> Fallible<()> {
        let storage = MemoryStorage::new();
        let mut c = controller(Box::new(storage.clone()));
        c.start_flashcards()?;
        assert_eq!(flashcards(&c).current().unwrap().id, "red-maple");
        c.toggle_known()?;
        assert!(c.is_known("red-maple"));
        assert_eq!(flashcards(&c).position(), 0);
        c.select_category("fern")?;
        assert!(c.is_known("red-maple"));

        let reloaded = controller(Box::new(storage));
        assert!(reloaded.is_known("red-maple"));
        Ok(())
    }

    #[test]
    fn test_reset_known() -> Fallible<()> {
        let storage = MemoryStorage::new();
        let mut c = controller(Box::new(storage.clone()));
        c.start_flashcards()?;
        c.toggle_known()?;
        c.reset_known();
        assert!(c.known().is_empty());
        let reloaded = controller(Box::new(storage));
        assert!(reloaded.known().is_empty());
        Ok(())
    }

    #[test]
    fn test_three_plant_wetland_quiz() -> Fallible<()> {
        let mut c = controller(Box::new(MemoryStorage::new()));
        c.select_category("shrub")?;
        c.select_quiz_type("wetland")?;
        c.start_quiz()?;
        assert_eq!(quiz(&c).len(), 3);
        for _ in 0..3 {
            let correct = quiz(&c).current().correct_answer().to_string();
            c.submit_answer(&correct)?;
            c.advance_question()?;
        }
        assert_eq!(c.mode().name(), "results");
        assert_eq!(quiz(&c).score(), 3);
        assert_eq!(format!("{}/{}", quiz(&c).score(), quiz(&c).len()), "3/3");
        Ok(())
    }

    #[test]
    fn test_advance_before_answer_leaves_state() -> Fallible<()> {
        let mut c = controller(Box::new(MemoryStorage::new()));
        c.start_quiz()?;
        assert!(c.advance_question().is_err());
        assert_eq!(c.mode().name(), "quiz");
        assert_eq!(quiz(&c).current_index(), 0);
        Ok(())
    }

    #[test]
    fn test_return_to_menu_discards_quiz() -> Fallible<()> {
        let mut c = controller(Box::new(MemoryStorage::new()));
        c.start_quiz()?;
        c.submit_answer("anything")?;
        c.return_to_menu();
        assert_eq!(c.mode().name(), "menu");
        c.start_quiz()?;
        assert_eq!(quiz(&c).current_index(), 0);
        assert_eq!(quiz(&c).score(), 0);
        assert!(!quiz(&c).is_answered());
        Ok(())
    }

    #[test]
    fn test_broken_storage_full_session() -> Fallible<()> {
        let mut c = controller(Box::new(BrokenStorage));
        assert!(c.known().is_empty());
        c.start_flashcards()?;
        c.toggle_known()?;
        assert!(c.is_known("red-maple"));
        c.return_to_menu();
        c.start_quiz()?;
        let len = quiz(&c).len();
        for _ in 0..len {
            let correct = quiz(&c).current().correct_answer().to_string();
            c.submit_answer(&correct)?;
            c.advance_question()?;
        }
        assert_eq!(c.mode().name(), "results");
        assert_eq!(quiz(&c).score(), len);
        c.reset_known();
        assert!(c.known().is_empty());
        Ok(())
    }
}
