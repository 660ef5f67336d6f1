use std::ops::Range;

use crate::error::{Error, Result};
use crate::prelude::*;
use nalgebra::{Const, DVector, Dyn, OMatrix, RealField, Storage, U1};

/// A time-varying affine feedback law for one player, relative to an operating point.
///
/// At step `k` the player applies `u = u_ref − P_k (x − x_ref) − α_k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy<T: RealField, const N: usize> {
	pub ps: Vec<OMatrix<T, Dyn, Const<N>>>,
	pub alphas: Vec<DVector<T>>,
	controls: Range<usize>,
}

impl<T: RealField + Copy, const N: usize> Strategy<T, N> {
	/// The strategy that replays the reference control, for the player owning `controls`.
	pub fn zeros(num_time_steps: usize, controls: Range<usize>) -> Self {
		let dim = controls.len();
		Strategy {
			ps: vec![OMatrix::zeros_generic(Dyn(dim), Const::<N>); num_time_steps],
			alphas: vec![DVector::zeros(dim); num_time_steps],
			controls,
		}
	}

	pub fn num_time_steps(&self) -> usize {
		self.ps.len()
	}

	/// Slice of the joint control this strategy drives.
	pub fn controls(&self) -> Range<usize> {
		self.controls.clone()
	}

	/// Computes the control at step `k`, given the deviation from the reference state and the
	/// player's reference control.
	pub fn control<S>(
		&self,
		k: usize,
		dx: &Vector<T, N>,
		u_ref: &nalgebra::Matrix<T, Dyn, U1, S>,
	) -> DVector<T>
	where
		S: Storage<T, Dyn, U1>,
	{
		let mut u = u_ref.clone_owned();
		u -= &self.ps[k] * dx;
		u -= &self.alphas[k];
		u
	}

	/// Writes this player's control at step `k` into its slice of the joint control `u`.
	pub fn apply<const M: usize>(
		&self,
		k: usize,
		dx: &Vector<T, N>,
		u_ref: &Vector<T, M>,
		u: &mut Vector<T, M>,
	) {
		let Range { start, end } = self.controls;
		let control = self.control(k, dx, &u_ref.rows(start, end - start));
		u.rows_mut(start, end - start).copy_from(&control);
	}

	pub fn scale_feedforward(&mut self, factor: T) {
		for alpha in &mut self.alphas {
			*alpha *= factor;
		}
	}

	/// Checks that there is a gain and feedforward term of the right size for every step.
	pub(crate) fn check_shape(
		&self,
		player: PlayerIndex,
		num_time_steps: usize,
		controls: Range<usize>,
	) -> Result<()> {
		let malformed = |what: String| Err(Error::StrategyShape { player, what });
		if self.controls != controls {
			return malformed(format!(
				"drives controls {:?}, expected {:?}",
				self.controls, controls
			));
		}
		if self.ps.len() != num_time_steps || self.alphas.len() != num_time_steps {
			return malformed(format!(
				"{} gains and {} feedforward terms for {} time steps",
				self.ps.len(),
				self.alphas.len(),
				num_time_steps
			));
		}
		let dim = controls.len();
		if self.ps.iter().any(|p| p.nrows() != dim) || self.alphas.iter().any(|a| a.len() != dim) {
			return malformed(format!("gain or feedforward term not of control dimension {}", dim));
		}
		Ok(())
	}
}
