use nalgebra::ComplexField;

use crate::autodiff::Real;
use crate::cost::Cost;
use crate::dynamics::Dynamics;
use crate::error::{Error, Result};
use crate::layout::ControlLayout;
use crate::operating_point::OperatingPoint;
use crate::player_cost::GameCosts;
use crate::prelude::*;
use crate::strategy::Strategy;

/// Total cost each player incurs when every player follows `strategies` from `x0`.
///
/// Each strategy must drive its player's slice of the joint control as laid out by
/// [`Dynamics::control_dims`], over as many steps as `operating_point` has.
///
/// Closed loop, strategies react to deviations from `operating_point` over all of its steps.
/// Open loop, they replay their controls about it with no feedback over one step fewer, and
/// each step is scored at the state it leads to. Exponentiated players, who must all share the
/// same positive constant `a`, report `ln(Σ exp(a c)) / a`.
pub fn strategy_costs<T, C, const N: usize, const M: usize>(
	costs: &GameCosts<T, C>,
	strategies: &[Strategy<T, N>],
	operating_point: &OperatingPoint<T, N, M>,
	dynamics: &impl Dynamics<T, N, M>,
	x0: &Vector<T, N>,
	dt: T,
	open_loop: bool,
) -> Result<Vec<T>>
where
	T: Real,
	C: Cost<T, N, M>,
{
	let layout = ControlLayout::new(&dynamics.control_dims(), M)?;
	let num_players = costs.num_players();
	if num_players != layout.num_players() {
		return Err(Error::PlayerCount {
			costs: num_players,
			players: layout.num_players(),
		});
	}
	if strategies.len() != num_players {
		return Err(Error::StrategyCount {
			found: strategies.len(),
			expected: num_players,
		});
	}
	let num_time_steps = operating_point.num_time_steps();
	if operating_point.us.len() != num_time_steps {
		return Err(Error::OperatingPointLength {
			found: operating_point.us.len(),
			expected: num_time_steps,
		});
	}
	for (player, (strategy, controls)) in strategies.iter().zip(layout.ranges()).enumerate() {
		strategy.check_shape(player, num_time_steps, controls)?;
	}

	let exponential_constant = if num_players > 0 { costs.exponential_constant(0) } else { None };
	for player in 1..num_players {
		if costs.exponential_constant(player) != exponential_constant {
			return Err(Error::ExponentialMismatch { player });
		}
	}
	if let Some(a) = exponential_constant {
		if !(a > T::zero()) {
			return Err(Error::NonPositiveExponentialConstant);
		}
	}

	let num_steps = if open_loop {
		num_time_steps.saturating_sub(1)
	} else {
		num_time_steps
	};
	let mut totals = vec![T::zero(); num_players];
	let mut x = *x0;
	let mut t = operating_point.t0;
	for k in 0..num_steps {
		let dx = if open_loop {
			Vector::zeros()
		} else {
			x - operating_point.xs[k]
		};
		let mut u = Vector::zeros();
		for strategy in strategies {
			strategy.apply(k, &dx, &operating_point.us[k], &mut u);
		}
		let x_next = dynamics.integrate(t, dt, &x, &u);

		for (player, total) in totals.iter_mut().enumerate() {
			let cost = if open_loop {
				costs.evaluate_offset(player, t, t + dt, &x_next, &u)
			} else {
				costs.evaluate(player, t, &x, &u)
			};
			*total += match exponential_constant {
				Some(a) => ComplexField::exp(a * cost),
				None => cost,
			};
		}
		x = x_next;
		t = t + dt;
	}

	match exponential_constant {
		Some(a) => totals
			.into_iter()
			.enumerate()
			.map(|(player, total)| {
				if total > T::zero() {
					Ok(ComplexField::ln(total) / a)
				} else {
					Err(Error::NonPositiveAccumulatedCost { player })
				}
			})
			.collect(),
		None => Ok(totals),
	}
}
