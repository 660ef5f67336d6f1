//! Errors reported by the solver.

use thiserror::Error;

use crate::prelude::PlayerIndex;

/// Errors that can occur while setting up or running a solve.
///
/// Running out of iterations is not an error; see [`crate::Termination`].
#[derive(Error, Debug)]
pub enum Error {
	#[error("invalid solver configuration: {what}")]
	InvalidConfig { what: String },

	#[error("control dimensions {dims:?} do not partition a joint control of dimension {m}")]
	ControlLayout { dims: Vec<usize>, m: usize },

	#[error("{costs} player costs given for {players} players")]
	PlayerCount { costs: usize, players: usize },

	#[error("{found} strategies given for {expected} players")]
	StrategyCount { found: usize, expected: usize },

	#[error("strategy for player {player} is malformed: {what}")]
	StrategyShape { player: PlayerIndex, what: String },

	#[error("operating point has {found} time steps, expected {expected}")]
	OperatingPointLength { found: usize, expected: usize },

	#[error("cost expansions cover {found} time steps, dynamics cover {expected}")]
	ApproximationLength { found: usize, expected: usize },

	#[error("player {player} does not share player 0's exponential constant")]
	ExponentialMismatch { player: PlayerIndex },

	#[error("exponential constant must be positive")]
	NonPositiveExponentialConstant,

	#[error("accumulated exponentiated cost of player {player} is not positive")]
	NonPositiveAccumulatedCost { player: PlayerIndex },

	#[error("coupled control system is singular at time step {time_step}")]
	SingularCoupling { time_step: usize },

	#[error("strategy modification failed at iteration {iteration}: {what}")]
	StrategyModification { iteration: usize, what: String },
}

pub type Result<T> = std::result::Result<T, Error>;
