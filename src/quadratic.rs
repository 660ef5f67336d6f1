use std::ops::{Add, AddAssign};

use crate::prelude::*;
use crate::{LinearDynamics, LinearPolicy};
use nalgebra::RealField;

/// A quadratic cost over states, `½ xᵀ Q x + rᵀ x`. Value functions of the backward recursion
/// take this form.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct QuadraticStateCost<T: RealField, const N: usize> {
	pub q: Matrix<T, N, N>,
	pub r: Vector<T, N>,
}

impl<T: RealField + Copy, const N: usize> QuadraticStateCost<T, N> {
	pub fn zeros() -> Self {
		QuadraticStateCost {
			q: Matrix::zeros(),
			r: Vector::zeros(),
		}
	}

	/// Computes the cost at a given state.
	pub fn compute(&self, x: &Vector<T, N>) -> T {
		let half = T::from_subset(&0.5);
		(self.q * (x * half) + self.r).dot(x)
	}

	/// Returns a cost over states and controls that is equal to this cost at the state produced by
	/// applying the given dynamics at a state and control.
	pub fn backstep<const M: usize>(
		&self,
		dynamics: &LinearDynamics<T, N, M>,
	) -> QuadraticCost<T, N, M> {
		let qa = self.q * dynamics.a;
		let qb = self.q * dynamics.b;
		let g = &self.r;
		QuadraticCost {
			q_xx: dynamics.a.ad_mul(&qa),
			q_ux: dynamics.b.ad_mul(&qa),
			q_uu: dynamics.b.ad_mul(&qb),
			r_x: dynamics.a.ad_mul(g),
			r_u: dynamics.b.ad_mul(g),
		}
	}
}

/// A quadratic cost over states and joint controls,
/// `½ xᵀ Qxx x + uᵀ Qux x + ½ uᵀ Quu u + r_xᵀ x + r_uᵀ u`.
///
/// `q_uu` holds every player's control block, including the cross terms between players.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct QuadraticCost<T: RealField, const N: usize, const M: usize> {
	pub q_xx: Matrix<T, N, N>,
	pub q_ux: Matrix<T, M, N>,
	pub q_uu: Matrix<T, M, M>,
	pub r_x: Vector<T, N>,
	pub r_u: Vector<T, M>,
}

impl<T: RealField + Copy, const N: usize, const M: usize> QuadraticCost<T, N, M> {
	pub fn zeros() -> Self {
		QuadraticCost {
			q_xx: Matrix::zeros(),
			q_ux: Matrix::zeros(),
			q_uu: Matrix::zeros(),
			r_x: Vector::zeros(),
			r_u: Vector::zeros(),
		}
	}

	/// Computes the cost at a given state and control.
	pub fn compute(&self, x: &Vector<T, N>, u: &Vector<T, M>) -> T {
		let half = T::from_subset(&0.5);
		let g_x = self.q_xx * (x * half) + self.r_x;
		let g_u = self.q_uu * (u * half) + self.q_ux * x + self.r_u;
		g_x.dot(x) + g_u.dot(u)
	}

	/// Computes the gradient of the cost at a given state and control with respect to the control.
	pub fn d_du(&self, x: &Vector<T, N>, u: &Vector<T, M>) -> Vector<T, M> {
		self.q_uu * u + self.q_ux * x + self.r_u
	}

	/// Returns the cost over states obtained by choosing the control with the given policy, up
	/// to a constant.
	pub fn substitute(&self, policy: &LinearPolicy<T, N, M>) -> QuadraticStateCost<T, N> {
		let LinearPolicy { k, l } = policy;
		let k_ad_q_ux = k.ad_mul(&self.q_ux);
		let k_ad_q_uu = k.ad_mul(&self.q_uu);
		let q = self.q_xx + k_ad_q_ux + k_ad_q_ux.adjoint() + k_ad_q_uu * k;
		let r = self.r_x + self.q_ux.ad_mul(l) + k.ad_mul(&self.r_u) + k_ad_q_uu * l;
		QuadraticStateCost { q, r }
	}

	/// Converts the expansion of a cost `c` with the given value into the expansion of
	/// `exp(a c)` about the same point.
	pub fn exponentiate(&self, value: T, a: T) -> Self {
		let scale = a * (a * value).exp();
		QuadraticCost {
			q_xx: (self.q_xx + self.r_x * self.r_x.transpose() * a) * scale,
			q_ux: (self.q_ux + self.r_u * self.r_x.transpose() * a) * scale,
			q_uu: (self.q_uu + self.r_u * self.r_u.transpose() * a) * scale,
			r_x: self.r_x * scale,
			r_u: self.r_u * scale,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Add for QuadraticCost<T, N, M> {
	type Output = QuadraticCost<T, N, M>;

	fn add(self, rhs: Self) -> Self::Output {
		QuadraticCost {
			q_xx: self.q_xx + rhs.q_xx,
			q_ux: self.q_ux + rhs.q_ux,
			q_uu: self.q_uu + rhs.q_uu,
			r_x: self.r_x + rhs.r_x,
			r_u: self.r_u + rhs.r_u,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> AddAssign for QuadraticCost<T, N, M> {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

#[cfg(test)]
mod tests {
	use crate::autodiff::{Jet, Scalar};
	use crate::proptest::*;
	use more_asserts::*;
	use proptest::prelude::*;

	const EPSILON: f64 = 1e-9;

	proptest! {
		#[test]
		fn backstep(dynamics in linear_dynamics::<3, 2>(),
								cost in quadratic_state_cost::<3>(),
								xa in vector::<3>(), ua in vector::<2>(),
								xb in vector::<3>(), ub in vector::<2>()) {
			let backstep_cost = cost.backstep(&dynamics);
			let xa_prime = dynamics.step(&xa, &ua);
			let xb_prime = dynamics.step(&xb, &ub);

			let offset_a = backstep_cost.compute(&xa, &ua) - cost.compute(&xa_prime);
			let offset_b = backstep_cost.compute(&xb, &ub) - cost.compute(&xb_prime);
			assert_lt!((offset_a - offset_b).abs(), EPSILON);
		}

		#[test]
		fn substitute(cost in quadratic_cost::<3, 2>(), policy in linear_policy::<3, 2>(),
									xa in vector::<3>(), xb in vector::<3>()) {
			let state_cost = cost.substitute(&policy);
			let ua = policy.apply(&xa);
			let ub = policy.apply(&xb);

			let offset_a = cost.compute(&xa, &ua) - state_cost.compute(&xa);
			let offset_b = cost.compute(&xb, &ub) - state_cost.compute(&xb);
			assert_lt!((offset_a - offset_b).abs(), 1e-8);
		}

		#[test]
		fn exponentiate_matches_exp_of_jet(cost in quadratic_cost::<3, 2>(),
										x in vector::<3>(), u in vector::<2>()) {
			const A: f64 = 0.1;
			let (jx, ju) = Jet::<f64, 3, 2>::variables(&x, &u);
			let q = cost.q_xx.map(Jet::<f64, 3, 2>::from);
			let r = cost.r_x.map(Jet::<f64, 3, 2>::from);
			let c = (q * jx).dot(&jx) * Jet::constant(0.5) + r.dot(&jx)
				+ ju.dot(&ju) * Jet::constant(0.5);

			let (value, expansion) = c.into_quadratic();
			let (_, expected) = (c * Jet::constant(A)).exp().into_quadratic();
			let actual = expansion.exponentiate(value, A);

			let scale = 1.0 + expected.q_xx.amax();
			assert_lt!((actual.q_xx - expected.q_xx).amax(), EPSILON * scale);
			assert_lt!((actual.q_ux - expected.q_ux).amax(), EPSILON * scale);
			assert_lt!((actual.q_uu - expected.q_uu).amax(), EPSILON * scale);
			assert_lt!((actual.r_x - expected.r_x).amax(), EPSILON * scale);
			assert_lt!((actual.r_u - expected.r_u).amax(), EPSILON * scale);
		}
	}
}
