use std::{
	cmp::Ordering,
	fmt::{self, Display},
	ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use super::{impl_scalar_via_chain, Unary, UnaryFn};
use crate::prelude::*;
use nalgebra::RealField;
use num_traits::{One, Zero};

/// A number carrying its gradient with respect to a state of dimension `N` and a control of
/// dimension `M`.
#[derive(Debug, Clone, Copy)]
pub struct Dual<T: RealField + Copy, const N: usize, const M: usize> {
	value: T,
	gradient_x: Vector<T, N>,
	gradient_u: Vector<T, M>,
}

impl<T: RealField + Copy, const N: usize, const M: usize> Dual<T, N, M> {
	/// The `i`th state coordinate as an independent variable.
	pub fn state(value: T, i: usize) -> Self {
		let mut dual = Self::from(value);
		dual.gradient_x[i] = T::one();
		dual
	}

	/// The `i`th control coordinate as an independent variable.
	pub fn control(value: T, i: usize) -> Self {
		let mut dual = Self::from(value);
		dual.gradient_u[i] = T::one();
		dual
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

	pub fn into_parts(self) -> (T, Vector<T, N>, Vector<T, M>) {
		(self.value, self.gradient_x, self.gradient_u)
	}

	fn chain(self, f: UnaryFn) -> Self {
		let Unary { f, df, .. } = Unary::of(self.value, f);
		Dual {
			value: f,
			gradient_x: self.gradient_x * df,
			gradient_u: self.gradient_u * df,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> From<T> for Dual<T, N, M> {
	fn from(value: T) -> Self {
		Dual {
			value,
			gradient_x: Vector::zeros(),
			gradient_u: Vector::zeros(),
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> PartialEq for Dual<T, N, M> {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> PartialOrd for Dual<T, N, M> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.value.partial_cmp(&other.value)
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Add for Dual<T, N, M> {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		Dual {
			value: self.value + rhs.value,
			gradient_x: self.gradient_x + rhs.gradient_x,
			gradient_u: self.gradient_u + rhs.gradient_u,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> AddAssign for Dual<T, N, M> {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Sub for Dual<T, N, M> {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		Dual {
			value: self.value - rhs.value,
			gradient_x: self.gradient_x - rhs.gradient_x,
			gradient_u: self.gradient_u - rhs.gradient_u,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> SubAssign for Dual<T, N, M> {
	fn sub_assign(&mut self, rhs: Self) {
		*self = *self - rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Mul for Dual<T, N, M> {
	type Output = Self;

	fn mul(self, rhs: Self) -> Self::Output {
		Dual {
			value: self.value * rhs.value,
			gradient_x: self.gradient_x * rhs.value + rhs.gradient_x * self.value,
			gradient_u: self.gradient_u * rhs.value + rhs.gradient_u * self.value,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> MulAssign for Dual<T, N, M> {
	fn mul_assign(&mut self, rhs: Self) {
		*self = *self * rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Div for Dual<T, N, M> {
	type Output = Self;

	fn div(self, rhs: Self) -> Self::Output {
		self * rhs.chain(UnaryFn::Recip)
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> DivAssign for Dual<T, N, M> {
	fn div_assign(&mut self, rhs: Self) {
		*self = *self / rhs;
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Neg for Dual<T, N, M> {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Dual {
			value: -self.value,
			gradient_x: -self.gradient_x,
			gradient_u: -self.gradient_u,
		}
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Zero for Dual<T, N, M> {
	fn zero() -> Self {
		T::zero().into()
	}

	fn is_zero(&self) -> bool {
		self.value.is_zero()
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> One for Dual<T, N, M> {
	fn one() -> Self {
		T::one().into()
	}
}

impl<T: RealField + Copy, const N: usize, const M: usize> Display for Dual<T, N, M> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.value)
	}
}

impl_scalar_via_chain!(Dual);
