//! Composition root: one configured game.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::coordinator::{Controller, TurnCoordinator};
use super::observer::StateObserver;
use crate::board::PathCatalog;
use crate::config::{ConfigError, SeatConfig, SessionConfig};
use crate::core::Color;
use crate::rules::GameEngine;

/// A game built from a `SessionConfig`: the engine, both seats and the
/// coordinator that drives them.
pub struct Session {
    config: SessionConfig,
    coordinator: TurnCoordinator,
}

impl Session {
    /// Build with the standard board paths.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, &PathCatalog::standard())
    }

    /// Build against a specific path catalog.
    pub fn with_catalog(config: SessionConfig, catalog: &PathCatalog) -> Result<Self, ConfigError> {
        let variant = config.resolve_variant(catalog)?;
        let engine = Arc::new(GameEngine::new(variant, catalog)?);
        let white = Self::controller(&config.white, &engine, &config);
        let black = Self::controller(&config.black, &engine, &config);
        info!(
            variant = %engine.variant().id,
            white = ?white,
            black = ?black,
            seed = config.seed,
            "session created"
        );

        let mut coordinator = TurnCoordinator::new(engine, white, black, config.seed)
            .with_yield_interval(Duration::from_millis(config.search.yield_interval_ms));
        if let Some(limit) = config.move_time_limit() {
            coordinator = coordinator.with_move_time_limit(limit);
        }
        Ok(Self { config, coordinator })
    }

    fn controller(seat: &SeatConfig, engine: &GameEngine, config: &SessionConfig) -> Controller {
        match seat {
            SeatConfig::Local { strategy } => {
                Controller::Local(strategy.build(engine, &config.search))
            }
            SeatConfig::External => Controller::External,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn coordinator(&self) -> &TurnCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut TurnCoordinator {
        &mut self.coordinator
    }

    pub fn add_observer(&mut self, observer: impl StateObserver + 'static) {
        self.coordinator.add_observer(observer);
    }

    /// Draw the first player and start play.
    pub fn start(&mut self) -> Result<Color, crate::error::EngineError> {
        self.coordinator.start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::VariantId;
    use crate::search::StrategyKind;

    #[test]
    fn test_session_from_config() {
        let config = SessionConfig::default()
            .with_variant("aseb")
            .with_seats(
                SeatConfig::local(StrategyKind::Random),
                SeatConfig::External,
            );
        let session = Session::new(config).unwrap();
        let coord = session.coordinator();
        assert_eq!(coord.engine().variant().id, VariantId::Aseb);
        assert!(matches!(
            coord.controller(Color::White),
            Controller::Local(s) if s.name() == "random"
        ));
        assert!(coord.controller(Color::Black).is_external());
        let pieces = coord.engine().config().pieces_per_player as usize;
        assert_eq!(coord.state().pieces_per_player(), pieces);
    }

    #[test]
    fn test_unknown_variant_fails() {
        let config = SessionConfig::default().with_variant("Senet");
        assert!(matches!(Session::new(config), Err(ConfigError::Configuration(_))));
    }

    #[test]
    fn test_local_session_plays_out() {
        let config = SessionConfig::default().with_variant("Blitz").with_seats(
            SeatConfig::local(StrategyKind::Heuristic),
            SeatConfig::local(StrategyKind::Random),
        );
        let mut session = Session::new(config).unwrap();
        session.start().unwrap();
        let winner = session.coordinator_mut().run(10_000).unwrap();
        assert!(winner.is_some());
    }
}
