mod approximate;
pub mod autodiff;
mod config;
mod cost;
mod dynamics;
mod error;
mod evaluate;
mod layout;
pub mod linear;
mod lq_game;
mod operating_point;
mod player_cost;
mod prelude;
pub mod quadratic;
mod solver;
mod strategy;

#[cfg(feature = "proptest-support")]
pub mod proptest;

#[cfg(test)]
mod fixtures;

pub use approximate::LqApproximation;
pub use config::SolverConfig;
pub use cost::Cost;
pub use dynamics::Dynamics;
pub use error::{Error, Result};
pub use evaluate::strategy_costs;
pub use layout::ControlLayout;
pub use linear::{LinearDynamics, LinearPolicy};
pub use lq_game::solve_lq_game;
pub use operating_point::OperatingPoint;
pub use player_cost::{GameCosts, PlayerCost, TermId};
pub use prelude::*;
pub use quadratic::{QuadraticCost, QuadraticStateCost};
pub use solver::{
	rollout, rollout_into, IterateLog, ModifierError, ScaleFeedforward, Solution, Solver,
	SolverLog, StrategyModifier, Termination,
};
pub use strategy::Strategy;
