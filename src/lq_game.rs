use std::iter::zip;

use nalgebra::{DMatrix, DVector, RealField};

use crate::error::{Error, Result};
use crate::layout::ControlLayout;
use crate::prelude::*;
use crate::strategy::Strategy;
use crate::{LinearDynamics, LinearPolicy, QuadraticCost, QuadraticStateCost};

/// Number of times a singular coupled system is retried with a larger diagonal shift.
const MAX_REGULARIZATION_ATTEMPTS: i32 = 3;

/// Computes the feedback Nash equilibrium strategies of a time-varying LQ game.
///
/// `quadraticization[k][i]` is player `i`'s cost at step `k`. There is no terminal cost beyond
/// the last step's.
///
/// The coupled control system of a step counts as singular when its smallest singular value is
/// at most `M ε σ_max` or at most `σ_max / max_condition_number`. An infinite
/// `max_condition_number` keeps only the first cutoff. A positive `regularization` lets a
/// singular system be retried with a diagonal shift instead of failing.
pub fn solve_lq_game<T: RealField + Copy, const N: usize, const M: usize>(
	layout: &ControlLayout,
	linearization: &[LinearDynamics<T, N, M>],
	quadraticization: &[Vec<QuadraticCost<T, N, M>>],
	regularization: T,
	max_condition_number: T,
) -> Result<Vec<Strategy<T, N>>> {
	backward_pass(
		layout,
		linearization,
		quadraticization,
		regularization,
		max_condition_number,
	)
	.map(|(strategies, _)| strategies)
}

/// Runs the coupled Riccati recursion, returning the strategies and every player's value
/// function at every step, `values[k][i]`, including the zero value after the last step.
fn backward_pass<T: RealField + Copy, const N: usize, const M: usize>(
	layout: &ControlLayout,
	linearization: &[LinearDynamics<T, N, M>],
	quadraticization: &[Vec<QuadraticCost<T, N, M>>],
	regularization: T,
	max_condition_number: T,
) -> Result<(Vec<Strategy<T, N>>, Vec<Vec<QuadraticStateCost<T, N>>>)> {
	let num_time_steps = linearization.len();
	if quadraticization.len() != num_time_steps {
		return Err(Error::ApproximationLength {
			found: quadraticization.len(),
			expected: num_time_steps,
		});
	}
	if let Some(costs) = quadraticization.iter().find(|costs| costs.len() != layout.num_players()) {
		return Err(Error::PlayerCount {
			costs: costs.len(),
			players: layout.num_players(),
		});
	}

	let mut strategies: Vec<_> = layout
		.ranges()
		.map(|controls| Strategy::zeros(num_time_steps, controls))
		.collect();
	let mut values =
		vec![vec![QuadraticStateCost::zeros(); layout.num_players()]; num_time_steps + 1];

	for k in (0..num_time_steps).rev() {
		let step_costs: Vec<QuadraticCost<T, N, M>> = zip(&values[k + 1], &quadraticization[k])
			.map(|(value, cost)| value.backstep(&linearization[k]) + *cost)
			.collect();

		// Row block i is player i's first order optimality condition in its own control.
		let mut s = Matrix::<T, M, M>::zeros();
		let mut y = Matrix::<T, M, N>::zeros();
		let mut y0 = Vector::<T, M>::zeros();
		for (cost, range) in zip(&step_costs, layout.ranges()) {
			let (start, len) = (range.start, range.len());
			s.rows_mut(start, len).copy_from(&cost.q_uu.rows(start, len));
			y.rows_mut(start, len).copy_from(&cost.q_ux.rows(start, len));
			y0.rows_mut(start, len).copy_from(&cost.r_u.rows(start, len));
		}

		let (p, alpha) = solve_coupled(&s, &y, &y0, regularization, max_condition_number, k)?;
		for (strategy, range) in zip(&mut strategies, layout.ranges()) {
			strategy.ps[k] = p.rows(range.start, range.len()).into_owned();
			strategy.alphas[k] = alpha.rows(range.start, range.len()).into_owned();
		}

		let policy = LinearPolicy { k: -p, l: -alpha };
		values[k] = step_costs.iter().map(|cost| cost.substitute(&policy)).collect();
	}
	Ok((strategies, values))
}

/// Solves `S P = Y` and `S α = y`, shifting `S` along the diagonal if it is singular and
/// `regularization` allows.
fn solve_coupled<T: RealField + Copy, const N: usize, const M: usize>(
	s: &Matrix<T, M, M>,
	y: &Matrix<T, M, N>,
	y0: &Vector<T, M>,
	regularization: T,
	max_condition_number: T,
	time_step: usize,
) -> Result<(Matrix<T, M, N>, Vector<T, M>)> {
	if let Some(solution) = try_solve(s, y, y0, max_condition_number) {
		return Ok(solution);
	}
	if regularization > T::zero() {
		let mut lambda = regularization;
		for attempt in 0..MAX_REGULARIZATION_ATTEMPTS {
			tracing::warn!(
				time_step,
				attempt,
				?lambda,
				"singular coupled control system, regularizing"
			);
			let shifted = s + Matrix::<T, M, M>::identity() * lambda;
			if let Some(solution) = try_solve(&shifted, y, y0, max_condition_number) {
				return Ok(solution);
			}
			lambda *= T::from_subset(&10.0);
		}
	}
	Err(Error::SingularCoupling { time_step })
}

fn try_solve<T: RealField + Copy, const N: usize, const M: usize>(
	s: &Matrix<T, M, M>,
	y: &Matrix<T, M, N>,
	y0: &Vector<T, M>,
	max_condition_number: T,
) -> Option<(Matrix<T, M, N>, Vector<T, M>)> {
	let s = DMatrix::from_iterator(M, M, s.iter().copied());

	let singular_values = s.clone().singular_values();
	let (largest, smallest) = (singular_values.max(), singular_values.min());
	let tolerance = (T::from_subset(&(M as f64)) * T::default_epsilon() * largest)
		.max(largest / max_condition_number);
	if !largest.is_finite() || !(smallest > tolerance) {
		return None;
	}

	let lu = s.lu();
	let p = lu.solve(&DMatrix::from_iterator(M, N, y.iter().copied()))?;
	let alpha = lu.solve(&DVector::from_iterator(M, y0.iter().copied()))?;
	if p.iter().chain(alpha.iter()).any(|v| !v.is_finite()) {
		return None;
	}
	Some((
		Matrix::from_iterator(p.iter().copied()),
		Vector::from_iterator(alpha.iter().copied()),
	))
}
