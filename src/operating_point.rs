use std::ops::Range;

use crate::prelude::*;
use nalgebra::{Const, Dyn, MatrixView, RealField, U1};

/// A candidate trajectory: the joint state and joint control at every time step.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPoint<T: RealField, const N: usize, const M: usize> {
	pub xs: Vec<Vector<T, N>>,
	/// Joint controls; each player's control is its slice of the [`crate::ControlLayout`].
	pub us: Vec<Vector<T, M>>,
	/// Time of the first step.
	pub t0: T,
}

impl<T: RealField + Copy, const N: usize, const M: usize> OperatingPoint<T, N, M> {
	/// An all-zero trajectory.
	pub fn zeros(num_time_steps: usize, t0: T) -> Self {
		OperatingPoint {
			xs: vec![Vector::zeros(); num_time_steps],
			us: vec![Vector::zeros(); num_time_steps],
			t0,
		}
	}

	pub fn num_time_steps(&self) -> usize {
		self.xs.len()
	}

	/// The control of the player owning `range` at step `k`.
	pub fn control(
		&self,
		k: usize,
		range: Range<usize>,
	) -> MatrixView<'_, T, Dyn, U1, U1, Const<M>> {
		self.us[k].rows(range.start, range.len())
	}

	/// Largest absolute difference of any state or control coordinate at any step.
	pub fn max_difference(&self, other: &Self) -> T {
		let states = self.xs.iter().zip(&other.xs).map(|(a, b)| (a - b).amax());
		let controls = self.us.iter().zip(&other.us).map(|(a, b)| (a - b).amax());
		states
			.chain(controls)
			.fold(T::zero(), |max, d| if d > max { d } else { max })
	}
}
