use crate::autodiff::{Jet, Real, Scalar};
use crate::prelude::*;
use crate::QuadraticCost;

/// A running cost over the joint state and the joint control of all players.
pub trait Cost<T: Real, const N: usize, const M: usize> {
	fn evaluate<U: Scalar + From<T>>(&self, t: T, x: &Vector<U, N>, u: &Vector<U, M>) -> U;

	/// Second order Taylor expansion of the cost about `(x, u)`, in deviation coordinates.
	fn quadraticize(&self, t: T, x: &Vector<T, N>, u: &Vector<T, M>) -> QuadraticCost<T, N, M> {
		let (jx, ju) = Jet::variables(x, u);
		let (_, q) = self.evaluate(t, &jx, &ju).into_quadratic();
		q
	}

	/// Cost of the interval `[t0, t1]`, scored at the state `x` that the control `u` leads to.
	fn evaluate_offset(&self, _t0: T, t1: T, x: &Vector<T, N>, u: &Vector<T, M>) -> T {
		self.evaluate(t1, x, u)
	}
}
