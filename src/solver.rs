use std::mem;

use nalgebra::RealField;
use tracing::{debug, info, warn};

use crate::approximate::LqApproximation;
use crate::autodiff::Real;
use crate::config::SolverConfig;
use crate::cost::Cost;
use crate::dynamics::Dynamics;
use crate::error::{Error, Result};
use crate::layout::ControlLayout;
use crate::lq_game::solve_lq_game;
use crate::operating_point::OperatingPoint;
use crate::player_cost::GameCosts;
use crate::prelude::*;
use crate::strategy::Strategy;

/// Error type returned by a [`StrategyModifier`].
pub type ModifierError = Box<dyn std::error::Error + Send + Sync>;

/// Adjusts the strategies produced by each LQ game solve before they are used for the next
/// rollout.
pub trait StrategyModifier<T: RealField, const N: usize, const M: usize> {
	fn modify(
		&self,
		operating_point: &OperatingPoint<T, N, M>,
		strategies: &mut [Strategy<T, N>],
	) -> std::result::Result<(), ModifierError>;
}

/// Scales every feedforward term by a constant factor, keeping the next operating point close to
/// the current one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFeedforward<T> {
	pub factor: T,
}

impl<T: RealField + Copy, const N: usize, const M: usize> StrategyModifier<T, N, M>
	for ScaleFeedforward<T>
{
	fn modify(
		&self,
		_operating_point: &OperatingPoint<T, N, M>,
		strategies: &mut [Strategy<T, N>],
	) -> std::result::Result<(), ModifierError> {
		for strategy in strategies {
			strategy.scale_feedforward(self.factor);
		}
		Ok(())
	}
}

/// Receives every iterate of a solve, starting with the initial one.
pub trait IterateLog<T: RealField, const N: usize, const M: usize> {
	fn add_iterate(
		&mut self,
		operating_point: &OperatingPoint<T, N, M>,
		strategies: &[Strategy<T, N>],
	);
}

/// Keeps a copy of every iterate in memory.
#[derive(Debug, Clone, Default)]
pub struct SolverLog<T: RealField, const N: usize, const M: usize> {
	pub iterates: Vec<(OperatingPoint<T, N, M>, Vec<Strategy<T, N>>)>,
}

impl<T: RealField + Copy, const N: usize, const M: usize> SolverLog<T, N, M> {
	pub fn num_iterates(&self) -> usize {
		self.iterates.len()
	}

	pub fn final_operating_point(&self) -> Option<&OperatingPoint<T, N, M>> {
		self.iterates.last().map(|(op, _)| op)
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> IterateLog<T, N, M>
	for SolverLog<T, N, M>
{
	fn add_iterate(
		&mut self,
		operating_point: &OperatingPoint<T, N, M>,
		strategies: &[Strategy<T, N>],
	) {
		self.iterates.push((operating_point.clone(), strategies.to_vec()));
	}
}

/// Why a solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
	/// Consecutive operating points agreed to within the convergence tolerance.
	Converged,
	/// The iteration budget ran out first.
	IterationBudget,
}

#[derive(Debug, Clone)]
pub struct Solution<T: RealField, const N: usize, const M: usize> {
	pub operating_point: OperatingPoint<T, N, M>,
	pub strategies: Vec<Strategy<T, N>>,
	pub iterations: usize,
	pub termination: Termination,
}

/// Rolls out `strategies` from `x0` into `current`, measuring state deviations against
/// `reference` and applying each player's strategy about the reference control.
pub fn rollout_into<T: Real, const N: usize, const M: usize>(
	dynamics: &impl Dynamics<T, N, M>,
	strategies: &[Strategy<T, N>],
	reference: &OperatingPoint<T, N, M>,
	x0: &Vector<T, N>,
	dt: T,
	current: &mut OperatingPoint<T, N, M>,
) {
	let num_time_steps = reference.num_time_steps();
	current.xs.resize(num_time_steps, Vector::zeros());
	current.us.resize(num_time_steps, Vector::zeros());
	current.t0 = reference.t0;
	if num_time_steps == 0 {
		return;
	}

	current.xs[0] = *x0;
	let mut t = reference.t0;
	for k in 0..num_time_steps {
		let x = current.xs[k];
		let dx = x - reference.xs[k];
		let mut u = Vector::zeros();
		for strategy in strategies {
			strategy.apply(k, &dx, &reference.us[k], &mut u);
		}
		current.us[k] = u;
		if k + 1 < num_time_steps {
			current.xs[k + 1] = dynamics.integrate(t, dt, &x, &u);
		}
		t = t + dt;
	}
}

/// Rolls out `strategies` from `x0` about `reference`, returning the new operating point.
pub fn rollout<T: Real, const N: usize, const M: usize>(
	dynamics: &impl Dynamics<T, N, M>,
	strategies: &[Strategy<T, N>],
	reference: &OperatingPoint<T, N, M>,
	x0: &Vector<T, N>,
	dt: T,
) -> OperatingPoint<T, N, M> {
	let mut current = OperatingPoint::zeros(reference.num_time_steps(), reference.t0);
	rollout_into(dynamics, strategies, reference, x0, dt, &mut current);
	current
}

/// Iterative LQ game solver.
///
/// Each iteration rolls out the current strategies, approximates the game about the resulting
/// operating point as an LQ game, and solves that for the next strategies.
pub struct Solver<T: Real, D, C, const N: usize, const M: usize> {
	dynamics: D,
	costs: GameCosts<T, C>,
	config: SolverConfig,
	layout: ControlLayout,
	modifier: Box<dyn StrategyModifier<T, N, M>>,
}

impl<T, D, C, const N: usize, const M: usize> Solver<T, D, C, N, M>
where
	T: Real,
	D: Dynamics<T, N, M>,
	C: Cost<T, N, M>,
{
	/// Checks the configuration and that there is one player cost per player of the dynamics.
	///
	/// Feedforward terms are scaled by the configured damping unless another modifier is set
	/// with [`Solver::with_modifier`].
	pub fn new(dynamics: D, costs: GameCosts<T, C>, config: SolverConfig) -> Result<Self> {
		config.validate()?;
		let layout = ControlLayout::new(&dynamics.control_dims(), M)?;
		if costs.num_players() != layout.num_players() {
			return Err(Error::PlayerCount {
				costs: costs.num_players(),
				players: layout.num_players(),
			});
		}
		let modifier = Box::new(ScaleFeedforward {
			factor: T::from_subset(&config.damping),
		});
		Ok(Solver {
			dynamics,
			costs,
			config,
			layout,
			modifier,
		})
	}

	pub fn with_modifier(mut self, modifier: impl StrategyModifier<T, N, M> + 'static) -> Self {
		self.modifier = Box::new(modifier);
		self
	}

	pub fn dynamics(&self) -> &D {
		&self.dynamics
	}

	pub fn costs(&self) -> &GameCosts<T, C> {
		&self.costs
	}

	pub fn costs_mut(&mut self) -> &mut GameCosts<T, C> {
		&mut self.costs
	}

	pub fn config(&self) -> &SolverConfig {
		&self.config
	}

	pub fn layout(&self) -> &ControlLayout {
		&self.layout
	}

	pub fn num_time_steps(&self) -> usize {
		self.config.num_time_steps()
	}

	pub fn time_step(&self) -> T {
		T::from_subset(&self.config.time_step)
	}

	/// Strategies that replay the reference controls, one per player.
	pub fn zero_strategies(&self) -> Vec<Strategy<T, N>> {
		self.layout
			.ranges()
			.map(|controls| Strategy::zeros(self.num_time_steps(), controls))
			.collect()
	}

	fn check_initial_iterate(
		&self,
		operating_point: &OperatingPoint<T, N, M>,
		strategies: &[Strategy<T, N>],
	) -> Result<()> {
		let num_time_steps = self.num_time_steps();
		if strategies.len() != self.layout.num_players() {
			return Err(Error::StrategyCount {
				found: strategies.len(),
				expected: self.layout.num_players(),
			});
		}
		for (player, (strategy, controls)) in
			strategies.iter().zip(self.layout.ranges()).enumerate()
		{
			strategy.check_shape(player, num_time_steps, controls)?;
		}
		if operating_point.num_time_steps() != num_time_steps
			|| operating_point.us.len() != num_time_steps
		{
			return Err(Error::OperatingPointLength {
				found: operating_point.num_time_steps(),
				expected: num_time_steps,
			});
		}
		Ok(())
	}

	/// Iterates from the given operating point and strategies until consecutive operating points
	/// agree or the iteration budget runs out.
	pub fn solve(
		&self,
		x0: &Vector<T, N>,
		initial_operating_point: OperatingPoint<T, N, M>,
		initial_strategies: Vec<Strategy<T, N>>,
		mut log: Option<&mut dyn IterateLog<T, N, M>>,
	) -> Result<Solution<T, N, M>> {
		self.check_initial_iterate(&initial_operating_point, &initial_strategies)?;

		let dt = self.time_step();
		let tolerance = T::from_subset(&self.config.convergence_tolerance);
		let regularization = T::from_subset(&self.config.regularization);
		let max_condition_number = T::from_subset(&self.config.max_condition_number);

		let mut current = initial_operating_point;
		let mut last = current.clone();
		let mut strategies = initial_strategies;
		let mut lq = LqApproximation::new(self.num_time_steps(), self.layout.num_players());
		if let Some(log) = log.as_deref_mut() {
			log.add_iterate(&current, &strategies);
		}

		let mut iteration = 0;
		loop {
			iteration += 1;
			mem::swap(&mut current, &mut last);
			rollout_into(&self.dynamics, &strategies, &last, x0, dt, &mut current);

			lq.refill(&self.dynamics, &self.costs, &current, dt);
			strategies = solve_lq_game(
				&self.layout,
				&lq.linearization,
				&lq.quadraticization,
				regularization,
				max_condition_number,
			)?;
			self.modifier
				.modify(&current, &mut strategies)
				.map_err(|err| Error::StrategyModification {
					iteration,
					what: err.to_string(),
				})?;

			let difference = current.max_difference(&last);
			debug!(iteration, ?difference, "finished iteration");
			let termination = if difference <= tolerance {
				Some(Termination::Converged)
			} else if iteration >= self.config.max_iterations {
				Some(Termination::IterationBudget)
			} else {
				None
			};

			if let Some(log) = log.as_deref_mut() {
				log.add_iterate(&current, &strategies);
			}

			if let Some(termination) = termination {
				match termination {
					Termination::Converged => info!(iteration, "converged"),
					Termination::IterationBudget => {
						warn!(
							iteration,
							?difference,
							"iteration budget exhausted before converging"
						);
					}
				}
				return Ok(Solution {
					operating_point: current,
					strategies,
					iterations: iteration,
					termination,
				});
			}
		}
	}
}
