//! Turn flow: who rolls, who decides, and who hears about it.

pub mod coordinator;
pub mod observer;
pub mod session;

pub use coordinator::{Controller, TurnCoordinator, TurnOutcome};
pub use observer::{GameEvent, RecordingObserver, StateObserver};
pub use session::Session;
