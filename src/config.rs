use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
	/// Length of one time step (s).
	pub time_step: f64,
	/// Length of the horizon (s). The number of time steps is `time_horizon / time_step`.
	pub time_horizon: f64,
	/// Maximum number of outer iterations.
	pub max_iterations: usize,
	/// Largest per-coordinate change between consecutive operating points that counts as
	/// converged.
	pub convergence_tolerance: f64,
	/// Factor the feedforward terms of each new set of strategies are scaled by.
	pub damping: f64,
	/// Initial diagonal regularization of a singular coupled control system. Zero disables
	/// regularization, and singular systems fail the solve.
	pub regularization: f64,
	/// Largest condition number a coupled control system may have before it counts as singular.
	pub max_condition_number: f64,
}

impl Default for SolverConfig {
	fn default() -> Self {
		Self {
			time_step: 0.1,
			time_horizon: 2.0,
			max_iterations: 50,
			convergence_tolerance: 0.1,
			damping: 0.05,
			regularization: 0.0,
			max_condition_number: 1e12,
		}
	}
}

impl SolverConfig {
	/// Checks that every field is in range.
	pub fn validate(&self) -> Result<()> {
		let invalid = |what: &str| {
			Err(Error::InvalidConfig {
				what: what.to_string(),
			})
		};
		if !(self.time_step > 0.0) {
			return invalid("time step must be positive");
		}
		if !(self.time_horizon > 0.0) {
			return invalid("time horizon must be positive");
		}
		if self.max_iterations == 0 {
			return invalid("max iterations must be positive");
		}
		if !(self.convergence_tolerance >= 0.0) {
			return invalid("convergence tolerance must be non-negative");
		}
		if !(self.damping > 0.0 && self.damping <= 1.0) {
			return invalid("damping must be in (0, 1]");
		}
		if !(self.regularization >= 0.0) {
			return invalid("regularization must be non-negative");
		}
		if !(self.max_condition_number >= 1.0) {
			return invalid("max condition number must be at least 1");
		}
		if self.num_time_steps() == 0 {
			return invalid("time horizon is shorter than one time step");
		}
		Ok(())
	}

	/// Number of time steps in the horizon.
	pub fn num_time_steps(&self) -> usize {
		let steps = (self.time_horizon / self.time_step).round();
		if steps.is_finite() && steps > 0.0 {
			steps as usize
		} else {
			0
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_valid() {
		let config = SolverConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.num_time_steps(), 20);
	}

	#[test]
	fn zero_length_horizon_is_rejected() {
		let config = SolverConfig {
			time_horizon: 0.01,
			..Default::default()
		};
		assert_eq!(config.num_time_steps(), 0);
		assert!(matches!(config.validate(), Err(Error::InvalidConfig { .. })));
	}

	#[test]
	fn out_of_range_fields_are_rejected() {
		for config in [
			SolverConfig { time_step: 0.0, ..Default::default() },
			SolverConfig { time_horizon: -1.0, ..Default::default() },
			SolverConfig { max_iterations: 0, ..Default::default() },
			SolverConfig { convergence_tolerance: -0.1, ..Default::default() },
			SolverConfig { damping: 0.0, ..Default::default() },
			SolverConfig { damping: 1.5, ..Default::default() },
			SolverConfig { regularization: f64::NAN, ..Default::default() },
			SolverConfig { max_condition_number: 0.5, ..Default::default() },
		] {
			assert!(config.validate().is_err());
		}
	}

	#[test]
	fn deserializes_with_defaults() {
		let config: SolverConfig =
			serde_json::from_str(r#"{ "time_step": 0.05, "damping": 1.0 }"#).unwrap();
		assert_eq!(config.time_step, 0.05);
		assert_eq!(config.damping, 1.0);
		assert_eq!(config.num_time_steps(), 40);
		assert_eq!(config.max_iterations, 50);
		assert_eq!(config.max_condition_number, 1e12);
	}
}
