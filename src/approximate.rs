use itertools::izip;

use crate::autodiff::Real;
use crate::cost::Cost;
use crate::dynamics::Dynamics;
use crate::operating_point::OperatingPoint;
use crate::player_cost::GameCosts;
use crate::{LinearDynamics, QuadraticCost};

/// Linearized dynamics and each player's quadraticized cost at every step of an operating point.
#[derive(Debug, Clone)]
pub struct LqApproximation<T: Real, const N: usize, const M: usize> {
	pub linearization: Vec<LinearDynamics<T, N, M>>,
	/// Indexed by time step, then player.
	pub quadraticization: Vec<Vec<QuadraticCost<T, N, M>>>,
}

impl<T: Real, const N: usize, const M: usize> LqApproximation<T, N, M> {
	pub fn new(num_time_steps: usize, num_players: usize) -> Self {
		LqApproximation {
			linearization: vec![LinearDynamics::identity(); num_time_steps],
			quadraticization: vec![vec![QuadraticCost::zeros(); num_players]; num_time_steps],
		}
	}

	/// Overwrites the approximation with one about `op`.
	pub fn refill<C: Cost<T, N, M>>(
		&mut self,
		dynamics: &impl Dynamics<T, N, M>,
		costs: &GameCosts<T, C>,
		op: &OperatingPoint<T, N, M>,
		dt: T,
	) {
		let mut t = op.t0;
		for (linear, quadratics, x, u) in izip!(
			&mut self.linearization,
			&mut self.quadraticization,
			&op.xs,
			&op.us
		) {
			*linear = LinearDynamics::identity();
			dynamics.linearize(t, dt, x, u, linear);
			for (player, quadratic) in quadratics.iter_mut().enumerate() {
				*quadratic = costs.quadraticize(player, t, x, u);
			}
			t = t + dt;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::autodiff::Scalar;
	use crate::prelude::*;

	/// `ẋ = t u`, so the control Jacobian depends on time.
	struct TimeScaled;

	impl Dynamics<f64, 1, 1> for TimeScaled {
		fn evaluate<U: Scalar + From<f64>>(
			&self,
			t: f64,
			_x: &Vector<U, 1>,
			u: &Vector<U, 1>,
		) -> Vector<U, 1> {
			u * U::from(t)
		}
	}

	/// `t x²`.
	struct TimeWeighted;

	impl Cost<f64, 1, 1> for TimeWeighted {
		fn evaluate<U: Scalar + From<f64>>(
			&self,
			t: f64,
			x: &Vector<U, 1>,
			_u: &Vector<U, 1>,
		) -> U {
			U::from(t) * x[0] * x[0]
		}
	}

	#[test]
	fn refill_uses_step_times_and_resets_linearization() {
		let mut costs = GameCosts::new();
		let term = costs.add_term(TimeWeighted);
		let player = costs.add_player("only");
		costs.add_player_term(player, term);

		let mut op = OperatingPoint::<f64, 1, 1>::zeros(3, 1.0);
		op.xs = vec![nalgebra::vector![1.0]; 3];
		let mut lq = LqApproximation::new(3, 1);
		const DT: f64 = 0.5;
		// Refilling twice must not accumulate.
		lq.refill(&TimeScaled, &costs, &op, DT);
		lq.refill(&TimeScaled, &costs, &op, DT);

		for (k, t) in [1.0, 1.5, 2.0].into_iter().enumerate() {
			assert_eq!(lq.linearization[k].a[(0, 0)], 1.0);
			assert_eq!(lq.linearization[k].b[(0, 0)], t * DT);
			assert_eq!(lq.quadraticization[k][0].q_xx[(0, 0)], 2.0 * t);
			assert_eq!(lq.quadraticization[k][0].r_x[0], 2.0 * t);
		}
	}
}
