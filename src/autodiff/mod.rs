mod dual;
mod jet;

pub use dual::Dual;
pub use jet::Jet;

use nalgebra::RealField;
use num_traits::{One, Zero};
use simba::scalar::{ClosedAdd, ClosedDiv, ClosedMul, ClosedNeg, ClosedSub};

/// Numbers that dynamics and cost formulas are written against.
///
/// Formulas generic over `Scalar` can be evaluated on plain floats, or on [`Dual`] and [`Jet`]
/// numbers to obtain their first and second derivatives with respect to the state and control.
pub trait Scalar:
	nalgebra::Scalar
	+ Copy
	+ PartialOrd
	+ Zero
	+ One
	+ ClosedAdd
	+ ClosedSub
	+ ClosedMul
	+ ClosedDiv
	+ ClosedNeg
{
	/// Lifts a literal into this number type.
	fn constant(value: f64) -> Self;

	fn sin(self) -> Self;
	fn cos(self) -> Self;
	fn tan(self) -> Self;
	fn atan(self) -> Self;
	fn tanh(self) -> Self;
	fn exp(self) -> Self;
	fn ln(self) -> Self;
	fn sqrt(self) -> Self;
	fn abs(self) -> Self;
	fn powi(self, n: i32) -> Self;

	fn sin_cos(self) -> (Self, Self) {
		(self.sin(), self.cos())
	}

	fn max(self, other: Self) -> Self {
		if self < other {
			other
		} else {
			self
		}
	}

	fn min(self, other: Self) -> Self {
		if other < self {
			other
		} else {
			self
		}
	}
}

/// Plain real numbers the solver runs on.
pub trait Real: Scalar + RealField {}
impl<T> Real for T where T: Scalar + RealField {}

macro_rules! impl_primitive_scalar {
	($t:ty) => {
		impl Scalar for $t {
			fn constant(value: f64) -> Self {
				value as $t
			}

			fn sin(self) -> Self {
				<$t>::sin(self)
			}

			fn cos(self) -> Self {
				<$t>::cos(self)
			}

			fn tan(self) -> Self {
				<$t>::tan(self)
			}

			fn atan(self) -> Self {
				<$t>::atan(self)
			}

			fn tanh(self) -> Self {
				<$t>::tanh(self)
			}

			fn exp(self) -> Self {
				<$t>::exp(self)
			}

			fn ln(self) -> Self {
				<$t>::ln(self)
			}

			fn sqrt(self) -> Self {
				<$t>::sqrt(self)
			}

			fn abs(self) -> Self {
				<$t>::abs(self)
			}

			fn powi(self, n: i32) -> Self {
				<$t>::powi(self, n)
			}

			fn sin_cos(self) -> (Self, Self) {
				<$t>::sin_cos(self)
			}

			fn max(self, other: Self) -> Self {
				<$t>::max(self, other)
			}

			fn min(self, other: Self) -> Self {
				<$t>::min(self, other)
			}
		}
	};
}

impl_primitive_scalar!(f32);
impl_primitive_scalar!(f64);

/// Value and first two derivatives of a unary function at a point.
pub(crate) struct Unary<T> {
	pub f: T,
	pub df: T,
	pub ddf: T,
}

impl<T: RealField + Copy> Unary<T> {
	pub fn of(v: T, name: UnaryFn) -> Self {
		let one = T::one();
		let two = one + one;
		match name {
			UnaryFn::Sin => {
				let (s, c) = v.sin_cos();
				Unary { f: s, df: c, ddf: -s }
			}
			UnaryFn::Cos => {
				let (s, c) = v.sin_cos();
				Unary { f: c, df: -s, ddf: -c }
			}
			UnaryFn::Tan => {
				let t = v.tan();
				let sec2 = one + t * t;
				Unary { f: t, df: sec2, ddf: two * t * sec2 }
			}
			UnaryFn::Atan => {
				let d = one / (one + v * v);
				Unary { f: v.atan(), df: d, ddf: -two * v * d * d }
			}
			UnaryFn::Tanh => {
				let t = v.tanh();
				let sech2 = one - t * t;
				Unary { f: t, df: sech2, ddf: -two * t * sech2 }
			}
			UnaryFn::Exp => {
				let e = v.exp();
				Unary { f: e, df: e, ddf: e }
			}
			UnaryFn::Ln => {
				let r = one / v;
				Unary { f: v.ln(), df: r, ddf: -r * r }
			}
			UnaryFn::Sqrt => {
				let s = v.sqrt();
				let df = one / (two * s);
				Unary { f: s, df, ddf: -df / (two * v) }
			}
			UnaryFn::Abs => {
				let sign = if v < T::zero() { -one } else { one };
				Unary { f: v.abs(), df: sign, ddf: T::zero() }
			}
			UnaryFn::Recip => {
				let r = one / v;
				Unary { f: r, df: -r * r, ddf: two * r * r * r }
			}
			UnaryFn::Powi(n) => match n {
				0 => Unary { f: one, df: T::zero(), ddf: T::zero() },
				1 => Unary { f: v, df: one, ddf: T::zero() },
				_ => {
					let nf = T::from_subset(&(n as f64));
					Unary {
						f: v.powi(n),
						df: nf * v.powi(n - 1),
						ddf: nf * (nf - one) * v.powi(n - 2),
					}
				}
			},
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryFn {
	Sin,
	Cos,
	Tan,
	Atan,
	Tanh,
	Exp,
	Ln,
	Sqrt,
	Abs,
	Recip,
	Powi(i32),
}

/// Implements the [`Scalar`] transcendental functions for a differentiating number type in
/// terms of a `chain(self, UnaryFn) -> Self` method.
macro_rules! impl_scalar_via_chain {
	($ty:ident) => {
		impl<T: nalgebra::RealField + Copy, const N: usize, const M: usize> $crate::autodiff::Scalar
			for $ty<T, N, M>
		{
			fn constant(value: f64) -> Self {
				T::from_subset(&value).into()
			}

			fn sin(self) -> Self {
				self.chain(UnaryFn::Sin)
			}

			fn cos(self) -> Self {
				self.chain(UnaryFn::Cos)
			}

			fn tan(self) -> Self {
				self.chain(UnaryFn::Tan)
			}

			fn atan(self) -> Self {
				self.chain(UnaryFn::Atan)
			}

			fn tanh(self) -> Self {
				self.chain(UnaryFn::Tanh)
			}

			fn exp(self) -> Self {
				self.chain(UnaryFn::Exp)
			}

			fn ln(self) -> Self {
				self.chain(UnaryFn::Ln)
			}

			fn sqrt(self) -> Self {
				self.chain(UnaryFn::Sqrt)
			}

			fn abs(self) -> Self {
				self.chain(UnaryFn::Abs)
			}

			fn powi(self, n: i32) -> Self {
				self.chain(UnaryFn::Powi(n))
			}
		}
	};
}

pub(crate) use impl_scalar_via_chain;
