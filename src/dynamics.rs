use crate::autodiff::{Dual, Real, Scalar};
use crate::linear::LinearDynamics;
use crate::prelude::*;

/// Continuous-time dynamics of the joint state of all players, `ẋ = f(t, x, u)`.
///
/// `u` is the joint control: the players' controls stacked in player order, with the sizes
/// reported by [`Dynamics::control_dims`]. Systems made of several players' subsystems compose
/// by stacking their states and controls and writing each Jacobian into its own block.
pub trait Dynamics<T: Real, const N: usize, const M: usize> {
	/// Control dimension of each player, in player order. These sum to `M`.
	fn control_dims(&self) -> Vec<usize> {
		vec![M]
	}

	/// Computes the time derivative of the state.
	fn evaluate<U: Scalar + From<T>>(
		&self,
		t: T,
		x: &Vector<U, N>,
		u: &Vector<U, M>,
	) -> Vector<U, N>;

	/// Adds the discrete-time Jacobians of one step of length `dt` into `linear`.
	///
	/// Callers start from [`LinearDynamics::identity`]; the default adds `dt ∂f/∂x` and
	/// `dt ∂f/∂u`, which matches the forward Euler step of [`Dynamics::integrate`].
	fn linearize(
		&self,
		t: T,
		dt: T,
		x: &Vector<T, N>,
		u: &Vector<T, M>,
		linear: &mut LinearDynamics<T, N, M>,
	) {
		let dx = Vector::<Dual<T, N, M>, N>::from_fn(|i, _| Dual::state(x[i], i));
		let du = Vector::<Dual<T, N, M>, M>::from_fn(|i, _| Dual::control(u[i], i));
		let x_dot = self.evaluate(t, &dx, &du);

		for i in 0..N {
			let gradient_x = x_dot[i].gradient_x();
			let gradient_u = x_dot[i].gradient_u();
			for j in 0..N {
				linear.a[(i, j)] += gradient_x[j] * dt;
			}
			for j in 0..M {
				linear.b[(i, j)] += gradient_u[j] * dt;
			}
		}
	}

	/// Integrates the dynamics over one step of length `dt`.
	fn integrate(&self, t: T, dt: T, x: &Vector<T, N>, u: &Vector<T, M>) -> Vector<T, N> {
		x + self.evaluate(t, x, u) * dt
	}

	/// Distance between two states. Defaults to the squared Euclidean distance.
	fn distance_between(&self, x0: &Vector<T, N>, x1: &Vector<T, N>) -> T {
		(x0 - x1).norm_squared()
	}
}
