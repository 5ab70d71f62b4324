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

use crate::catalog::WorkingSet;
use crate::types::plant::PlantRef;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Forward,
    Backward,
}

/// Sequential browsing of a working set, wrapping at both ends.
pub struct FlashcardSession {
    items: WorkingSet,
    /// Always `< items.len()` when `items` is non-empty.
    position: usize,
    revealed: bool,
}

impl FlashcardSession {
    pub fn new(items: WorkingSet) -> Self {
        Self {
            items,
            position: 0,
            revealed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn current(&self) -> Option<&PlantRef> {
        self.items.get(self.position)
    }

    pub fn advance(&mut self, direction: Direction) {
        self.revealed = false;
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.position = match direction {
            Direction::Forward => (self.position + 1) % len,
            Direction::Backward => (self.position + len - 1) % len,
        };
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn hide(&mut self) {
        self.revealed = false;
    }

    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Swap in a new working set after a category change, keeping the
    /// position if it is still in range.
    pub fn replace_items(&mut self, items: WorkingSet) {
        self.items = items;
        if self.position >= self.items.len() {
            self.position = self.items.len().saturating_sub(1);
        }
        self.revealed = false;
    }
}
