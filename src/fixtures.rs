//! Small games with known solutions, shared by the unit tests.

use crate::autodiff::Scalar;
use crate::prelude::*;
use crate::{Cost, Dynamics, GameCosts, LinearDynamics, SolverConfig};

/// A point mass on a line, state `(p, v)`, pushed by a single player.
pub struct PointMass;

impl Dynamics<f64, 2, 1> for PointMass {
	fn evaluate<U: Scalar + From<f64>>(
		&self,
		_t: f64,
		x: &Vector<U, 2>,
		u: &Vector<U, 1>,
	) -> Vector<U, 2> {
		nalgebra::vector![x[1], u[0]]
	}
}

/// Two point masses on a line, state `(p0, v0, p1, v1)`, each pushed by its own player.
pub struct PointMasses;

impl Dynamics<f64, 4, 2> for PointMasses {
	fn control_dims(&self) -> Vec<usize> {
		vec![1, 1]
	}

	fn evaluate<U: Scalar + From<f64>>(
		&self,
		_t: f64,
		x: &Vector<U, 4>,
		u: &Vector<U, 2>,
	) -> Vector<U, 4> {
		nalgebra::vector![x[1], u[0], x[3], u[1]]
	}
}

/// Two unicycles, state `(px, py, θ, v)` each, each steered by its own player through its turn
/// rate and acceleration.
pub struct Unicycles;

impl Dynamics<f64, 8, 4> for Unicycles {
	fn control_dims(&self) -> Vec<usize> {
		vec![2, 2]
	}

	fn evaluate<U: Scalar + From<f64>>(
		&self,
		_t: f64,
		x: &Vector<U, 8>,
		u: &Vector<U, 4>,
	) -> Vector<U, 8> {
		let (s0, c0) = x[2].sin_cos();
		let (s1, c1) = x[6].sin_cos();
		nalgebra::vector![
			x[3] * c0,
			x[3] * s0,
			u[0],
			u[1],
			x[7] * c1,
			x[7] * s1,
			u[2],
			u[3]
		]
	}
}

#[derive(Debug, Clone)]
pub enum UnicycleTerm {
	/// Squared distance of a unicycle from its goal.
	Goal {
		unicycle: usize,
		goal: [f64; 2],
		weight: f64,
	},
	/// Squared turn rate and acceleration of a unicycle.
	Effort { unicycle: usize, weight: f64 },
	/// Gaussian bump in the distance between the unicycles.
	Proximity { weight: f64 },
}

impl Cost<f64, 8, 4> for UnicycleTerm {
	fn evaluate<U: Scalar + From<f64>>(&self, _t: f64, x: &Vector<U, 8>, u: &Vector<U, 4>) -> U {
		match *self {
			UnicycleTerm::Goal {
				unicycle,
				goal,
				weight,
			} => {
				let dx = x[4 * unicycle] - U::from(goal[0]);
				let dy = x[4 * unicycle + 1] - U::from(goal[1]);
				U::from(weight) * (dx * dx + dy * dy)
			}
			UnicycleTerm::Effort { unicycle, weight } => {
				let (w, a) = (u[2 * unicycle], u[2 * unicycle + 1]);
				U::from(weight) * (w * w + a * a)
			}
			UnicycleTerm::Proximity { weight } => {
				let dx = x[0] - x[4];
				let dy = x[1] - x[5];
				U::from(weight) * (-(dx * dx + dy * dy)).exp()
			}
		}
	}
}

/// `½ (x − x̄)ᵀ Q (x − x̄) + ½ uᵀ R u`.
#[derive(Debug, Clone)]
pub struct QuadraticTerm<const N: usize, const M: usize> {
	pub q: Matrix<f64, N, N>,
	pub r: Matrix<f64, M, M>,
	pub target: Vector<f64, N>,
}

impl<const N: usize, const M: usize> Cost<f64, N, M> for QuadraticTerm<N, M> {
	fn evaluate<U: Scalar + From<f64>>(&self, _t: f64, x: &Vector<U, N>, u: &Vector<U, M>) -> U {
		let q = self.q.map(U::from);
		let r = self.r.map(U::from);
		let dx = x - self.target.map(U::from);
		let half = U::constant(0.5);
		(q * &dx).dot(&dx) * half + (r * u).dot(u) * half
	}
}

pub fn config() -> SolverConfig {
	SolverConfig {
		time_step: 0.1,
		time_horizon: 1.0,
		max_iterations: 50,
		convergence_tolerance: 1e-6,
		damping: 1.0,
		regularization: 0.0,
		max_condition_number: 1e12,
	}
}

/// Steers a point mass to the origin.
pub fn single_player_game() -> (PointMass, GameCosts<f64, QuadraticTerm<2, 1>>) {
	let mut costs = GameCosts::new();
	let term = costs.add_term(QuadraticTerm {
		q: nalgebra::matrix![1.0, 0.0; 0.0, 0.1],
		r: nalgebra::matrix![0.5],
		target: Vector::zeros(),
	});
	let player = costs.add_player("driver");
	costs.add_player_term(player, term);
	(PointMass, costs)
}

/// Two point masses heading for opposite goals while both paying to stay close together.
pub fn two_player_game() -> (PointMasses, GameCosts<f64, QuadraticTerm<4, 2>>) {
	let mut costs = GameCosts::new();
	let goal0 = costs.add_term(QuadraticTerm {
		q: Matrix::from_diagonal(&nalgebra::vector![1.0, 0.1, 0.0, 0.0]),
		r: nalgebra::matrix![1.0, 0.0; 0.0, 0.0],
		target: nalgebra::vector![1.0, 0.0, 0.0, 0.0],
	});
	let goal1 = costs.add_term(QuadraticTerm {
		q: Matrix::from_diagonal(&nalgebra::vector![0.0, 0.0, 1.0, 0.1]),
		r: nalgebra::matrix![0.0, 0.0; 0.0, 2.0],
		target: nalgebra::vector![0.0, 0.0, -1.0, 0.0],
	});
	let proximity = costs.add_term(QuadraticTerm {
		q: nalgebra::matrix![
			0.5, 0.0, -0.5, 0.0;
			0.0, 0.0, 0.0, 0.0;
			-0.5, 0.0, 0.5, 0.0;
			0.0, 0.0, 0.0, 0.0
		],
		r: Matrix::zeros(),
		target: Vector::zeros(),
	});

	let p0 = costs.add_player("left");
	costs.add_player_term(p0, goal0);
	costs.add_player_term(p0, proximity);
	let p1 = costs.add_player("right");
	costs.add_player_term(p1, goal1);
	costs.add_player_term(p1, proximity);
	(PointMasses, costs)
}

/// Two unicycles swapping sides of a corridor, each minding its own goal and effort and both
/// keeping their distance.
pub fn unicycle_game() -> (Unicycles, GameCosts<f64, UnicycleTerm>) {
	let mut costs = GameCosts::new();
	let proximity = costs.add_term(UnicycleTerm::Proximity { weight: 0.5 });
	for (unicycle, goal) in [[1.5, 0.5], [0.0, -0.5]].into_iter().enumerate() {
		let player = costs.add_player(format!("unicycle {}", unicycle));
		let goal = costs.add_term(UnicycleTerm::Goal {
			unicycle,
			goal,
			weight: 0.5,
		});
		let effort = costs.add_term(UnicycleTerm::Effort {
			unicycle,
			weight: 1.0,
		});
		costs.add_player_term(player, goal);
		costs.add_player_term(player, effort);
		costs.add_player_term(player, proximity);
	}
	(Unicycles, costs)
}

/// Starting state of [`unicycle_game`], facing each other at walking speed.
pub fn unicycle_start() -> Vector<f64, 8> {
	nalgebra::vector![0.0, 0.0, 0.0, 0.5, 1.5, 0.0, std::f64::consts::PI, 0.5]
}

/// Gains of finite horizon LQR with no terminal cost, `u_k = −K_k x_k`.
pub fn lqr_gains<const N: usize, const M: usize>(
	dynamics: &LinearDynamics<f64, N, M>,
	q: &Matrix<f64, N, N>,
	r: &Matrix<f64, M, M>,
	num_time_steps: usize,
) -> Vec<Matrix<f64, M, N>> {
	let LinearDynamics { a, b } = dynamics;
	let mut p = Matrix::<f64, N, N>::zeros();
	let mut gains = Vec::new();
	for _ in 0..num_time_steps {
		let k = (r + b.transpose() * p * b).try_inverse().unwrap() * b.transpose() * p * a;
		p = q + a.transpose() * p * a - a.transpose() * p * b * k;
		gains.push(k);
	}
	gains.reverse();
	gains
}
