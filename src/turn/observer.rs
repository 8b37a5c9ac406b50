//! Change notifications for presentation and sync layers.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::core::{Color, DiceRoll, GameState, Move};

/// What just happened to the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted { first: Color },
    DiceRolled { color: Color, roll: DiceRoll },
    MoveApplied { color: Color, mv: Move },
    Passed { color: Color },
    GameOver { winner: Color },
}

/// Receives the state after every mutation, together with the event that
/// caused it.
pub trait StateObserver: Send {
    fn on_event(&mut self, state: &GameState, event: &GameEvent);
}

/// Keeps every event. Clones share one log, so a clone handed to a
/// coordinator can be inspected through the original.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<GameEvent>> {
        // A panicking observer elsewhere does not invalidate the log.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the events so far.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.log().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }

    pub fn clear(&self) {
        self.log().clear();
    }
}

impl StateObserver for RecordingObserver {
    fn on_event(&mut self, _state: &GameState, event: &GameEvent) {
        self.log().push(event.clone());
    }
}
