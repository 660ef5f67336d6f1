use std::{
	cmp::Ordering,
	fmt::{self, Display},
	ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use super::{impl_scalar_via_chain, Unary, UnaryFn};
use crate::prelude::*;
use crate::QuadraticCost;
use nalgebra::RealField;
use num_traits::{One, Zero};

/// A number carrying its gradient and Hessian with respect to a state of dimension `N` and a
/// control of dimension `M`.
///
/// The Hessian is kept in the blocks a [`QuadraticCost`] is made of, so evaluating a cost on
/// jets directly yields its quadratic approximation.
#[derive(Debug, Clone, Copy)]
pub struct Jet<T: RealField + Copy, const N: usize, const M: usize> {
	value: T,
	gradient_x: Vector<T, N>,
	gradient_u: Vector<T, M>,
	hessian_xx: Matrix<T, N, N>,
	hessian_ux: Matrix<T, M, N>,
	hessian_uu: Matrix<T, M, M>,
}

impl<T: RealField + Copy, const N: usize, const M: usize> Jet<T, N, M> {
	/// The `i`th state coordinate as an independent variable.
	pub fn state(value: T, i: usize) -> Self {
		let mut jet = Self::from(value);
		jet.gradient_x[i] = T::one();
		jet
	}

	/// The `i`th control coordinate as an independent variable.
	pub fn control(value: T, i: usize) -> Self {
		let mut jet = Self::from(value);
		jet.gradient_u[i] = T::one();
		jet
	}

	/// Lifts a whole state and control into independent variables.
	pub fn variables(x: &Vector<T, N>, u: &Vector<T, M>) -> (Vector<Self, N>, Vector<Self, M>) {
		(
			Vector::from_fn(|i, _| Jet::state(x[i], i)),
			Vector::from_fn(|i, _| Jet::control(u[i], i)),
		)
	}

	pub fn value(&self) -> &T {
		&self.value
	}

	pub fn gradient_x(&self) -> &Vector<T, N> {
		&self.gradient_x
	}

	pub fn gradient_u(&self) -> &Vector<T, M> {
		&self.gradient_u
	}

	pub fn hessian_xx(&self) -> &Matrix<T, N, N> {
		&self.hessian_xx
	}

	pub fn hessian_ux(&self) -> &Matrix<T, M, N> {
		&self.hessian_ux
	}

	pub fn hessian_uu(&self) -> &Matrix<T, M, M> {
		&self.hessian_uu
	}

	/// Splits into the value and the second order Taylor expansion about the point of evaluation.
	pub fn into_quadratic(self) -> (T, QuadraticCost<T, N, M>) {
		(
			self.value,
			QuadraticCost {
				q_xx: self.hessian_xx,
				q_ux: self.hessian_ux,
				q_uu: self.hessian_uu,
				r_x: self.gradient_x,
				r_u: self.gradient_u,
			},
		)
	}

	fn chain(self, f: UnaryFn) -> Self {
		let Unary { f, df, ddf } = Unary::of(self.value, f);
		let gx = &self.gradient_x;
		let gu = &self.gradient_u;
		Jet {
			value: f,
			hessian_xx: self.hessian_xx * df + gx * gx.transpose() * ddf,
			hessian_ux: self.hessian_ux * df + gu * gx.transpose() * ddf,
			hessian_uu: self.hessian_uu * df + gu * gu.transpose() * ddf,
			gradient_x: gx * df,
			gradient_u: gu * df,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> From<T> for Jet<T, N, M> {
	fn from(value: T) -> Self {
		Jet {
			value,
			gradient_x: Vector::zeros(),
			gradient_u: Vector::zeros(),
			hessian_xx: Matrix::zeros(),
			hessian_ux: Matrix::zeros(),
			hessian_uu: Matrix::zeros(),
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> PartialEq for Jet<T, N, M> {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> PartialOrd for Jet<T, N, M> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.value.partial_cmp(&other.value)
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Add for Jet<T, N, M> {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		Jet {
			value: self.value + rhs.value,
			gradient_x: self.gradient_x + rhs.gradient_x,
			gradient_u: self.gradient_u + rhs.gradient_u,
			hessian_xx: self.hessian_xx + rhs.hessian_xx,
			hessian_ux: self.hessian_ux + rhs.hessian_ux,
			hessian_uu: self.hessian_uu + rhs.hessian_uu,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> AddAssign for Jet<T, N, M> {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Sub for Jet<T, N, M> {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		self + -rhs
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> SubAssign for Jet<T, N, M> {
	fn sub_assign(&mut self, rhs: Self) {
		*self = *self - rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Mul for Jet<T, N, M> {
	type Output = Self;

	fn mul(self, rhs: Self) -> Self::Output {
		let (a, b) = (self.value, rhs.value);
		let (ax, au) = (&self.gradient_x, &self.gradient_u);
		let (bx, bu) = (&rhs.gradient_x, &rhs.gradient_u);
		Jet {
			value: a * b,
			gradient_x: ax * b + bx * a,
			gradient_u: au * b + bu * a,
			hessian_xx: self.hessian_xx * b
				+ rhs.hessian_xx * a
				+ ax * bx.transpose()
				+ bx * ax.transpose(),
			hessian_ux: self.hessian_ux * b
				+ rhs.hessian_ux * a
				+ au * bx.transpose()
				+ bu * ax.transpose(),
			hessian_uu: self.hessian_uu * b
				+ rhs.hessian_uu * a
				+ au * bu.transpose()
				+ bu * au.transpose(),
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> MulAssign for Jet<T, N, M> {
	fn mul_assign(&mut self, rhs: Self) {
		*self = *self * rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Div for Jet<T, N, M> {
	type Output = Self;

	fn div(self, rhs: Self) -> Self::Output {
		self * rhs.chain(UnaryFn::Recip)
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> DivAssign for Jet<T, N, M> {
	fn div_assign(&mut self, rhs: Self) {
		*self = *self / rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Neg for Jet<T, N, M> {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Jet {
			value: -self.value,
			gradient_x: -self.gradient_x,
			gradient_u: -self.gradient_u,
			hessian_xx: -self.hessian_xx,
			hessian_ux: -self.hessian_ux,
			hessian_uu: -self.hessian_uu,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Zero for Jet<T, N, M> {
	fn zero() -> Self {
		T::zero().into()
	}

	fn is_zero(&self) -> bool {
		self.value.is_zero()
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> One for Jet<T, N, M> {
	fn one() -> Self {
		T::one().into()
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Display for Jet<T, N, M> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.value)
	}
}

impl_scalar_via_chain!(Jet);

#[cfg(test)]
mod tests {
	use super::*;
	use crate::autodiff::Scalar;

	#[test]
	fn product_of_state_and_control() {
		let (x, u) =
			Jet::<f64, 2, 1>::variables(&nalgebra::vector![2.0, 5.0], &nalgebra::vector![3.0]);
		let (value, q) = (x[0] * u[0] + x[1] * x[1]).into_quadratic();
		assert_eq!(value, 31.0);
		assert_eq!(q.r_x, nalgebra::vector![3.0, 10.0]);
		assert_eq!(q.r_u, nalgebra::vector![2.0]);
		assert_eq!(q.q_xx, nalgebra::matrix![0.0, 0.0; 0.0, 2.0]);
		assert_eq!(q.q_ux, nalgebra::matrix![1.0, 0.0]);
		assert_eq!(q.q_uu, nalgebra::matrix![0.0]);
	}

	#[test]
	fn exp_of_square() {
		let x = Jet::<f64, 1, 1>::state(0.0, 0);
		let y = (x * x).exp();
		assert_eq!(*y.value(), 1.0);
		assert_eq!(y.gradient_x()[0], 0.0);
		assert_eq!(y.hessian_xx()[(0, 0)], 2.0);
	}
}
