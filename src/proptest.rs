use std::ops::RangeInclusive;

use crate::{prelude::*, LinearDynamics, LinearPolicy, QuadraticCost, QuadraticStateCost};
use nalgebra::Const;
use proptest::strategy::Strategy;

/// Row count of the factors that random positive definite costs are built from.
const FACTOR_ROWS: usize = 4;

fn scalar() -> RangeInclusive<f64> {
	-2.0..=2.0
}

pub fn matrix<const N: usize, const M: usize>() -> impl Strategy<Value = Matrix<f64, N, M>> {
	nalgebra::proptest::matrix(scalar(), Const::<N>, Const::<M>)
}

pub fn vector<const N: usize>() -> impl Strategy<Value = Vector<f64, N>> {
	matrix::<N, 1>()
}

fn spd_matrix<const N: usize>() -> impl Strategy<Value = Matrix<f64, N, N>> {
	matrix::<N, N>().prop_map(|a| a.ad_mul(&a) + Matrix::<f64, N, N>::identity())
}

pub fn linear_dynamics<const N: usize, const M: usize>(
) -> impl Strategy<Value = LinearDynamics<f64, N, M>> {
	let a = matrix::<N, N>();
	let b = matrix::<N, M>();

	(a, b).prop_map(|(a, b)| LinearDynamics { a, b })
}

/// Dynamics `x' = (I + dt A) x + dt B u`, as produced by linearizing a continuous-time system
/// over a short step.
pub fn stable_linear_dynamics<const N: usize, const M: usize>(
) -> impl Strategy<Value = LinearDynamics<f64, N, M>> {
	const DT: f64 = 0.1;
	linear_dynamics::<N, M>().prop_map(|LinearDynamics { a, b }| LinearDynamics {
		a: Matrix::<f64, N, N>::identity() + a * DT,
		b: b * DT,
	})
}

pub fn linear_policy<const N: usize, const M: usize>(
) -> impl Strategy<Value = LinearPolicy<f64, N, M>> {
	let k = matrix::<M, N>();
	let l = vector::<M>();

	(k, l).prop_map(|(k, l)| LinearPolicy { k, l })
}

pub fn quadratic_state_cost<const N: usize>() -> impl Strategy<Value = QuadraticStateCost<f64, N>> {
	let q = spd_matrix::<N>();
	let r = vector::<N>();

	(q, r).prop_map(|(q, r)| QuadraticStateCost { q, r })
}

/// A quadratic cost that is jointly positive definite in the state and the control.
pub fn quadratic_cost<const N: usize, const M: usize>(
) -> impl Strategy<Value = QuadraticCost<f64, N, M>> {
	let f_x = matrix::<FACTOR_ROWS, N>();
	let f_u = matrix::<FACTOR_ROWS, M>();
	let r_x = vector::<N>();
	let r_u = vector::<M>();

	(f_x, f_u, r_x, r_u).prop_map(|(f_x, f_u, r_x, r_u)| QuadraticCost {
		q_xx: f_x.ad_mul(&f_x) + Matrix::<f64, N, N>::identity(),
		q_ux: f_u.ad_mul(&f_x),
		q_uu: f_u.ad_mul(&f_u) + Matrix::<f64, M, M>::identity(),
		r_x,
		r_u,
	})
}
