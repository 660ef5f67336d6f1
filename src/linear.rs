use crate::prelude::*;
use nalgebra::RealField;

/// Discrete-time dynamics in deviation coordinates, `x' = A x + B u`.
///
/// The columns of `B` are blocked by player, following the joint control layout.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LinearDynamics<T: RealField, const N: usize, const M: usize> {
	pub a: Matrix<T, N, N>,
	pub b: Matrix<T, N, M>,
}

impl<T: RealField + Copy, const N: usize, const M: usize> LinearDynamics<T, N, M> {
	/// The dynamics that keep the state fixed and ignore the control. Linearizations accumulate
	/// into this.
	pub fn identity() -> Self {
		LinearDynamics {
			a: Matrix::identity(),
			b: Matrix::zeros(),
		}
	}

	pub fn step(&self, x: &Vector<T, N>, u: &Vector<T, M>) -> Vector<T, N> {
		self.a * x + self.b * u
	}
}

/// A joint affine feedback policy, `u = K x + l`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LinearPolicy<T: RealField, const N: usize, const M: usize> {
	pub k: Matrix<T, M, N>,
	pub l: Vector<T, M>,
}

impl<T: RealField + Copy, const N: usize, const M: usize> LinearPolicy<T, N, M> {
	pub fn apply(&self, x: &Vector<T, N>) -> Vector<T, M> {
		self.k * x + self.l
	}
}
