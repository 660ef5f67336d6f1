use crate::autodiff::Real;
use crate::cost::Cost;
use crate::prelude::*;
use crate::QuadraticCost;

/// Handle to a cost term stored in a [`GameCosts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermId(usize);

/// The terms one player pays for, and how they are combined.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCost<T> {
	pub name: String,
	terms: Vec<TermId>,
	/// When set to `a`, the player minimizes `exp(a c)` rather than `c`.
	exponential_constant: Option<T>,
}

impl<T: Copy> PlayerCost<T> {
	pub fn terms(&self) -> &[TermId] {
		&self.terms
	}

	pub fn exponential_constant(&self) -> Option<T> {
		self.exponential_constant
	}
}

/// Cost terms for every player of a game.
///
/// Each term is stored once and referenced by handle, so a term that several players pay for
/// (a collision penalty, say) is a single object. Changing it through [`GameCosts::term_mut`]
/// changes every player's cost.
#[derive(Debug, Clone)]
pub struct GameCosts<T, C> {
	terms: Vec<C>,
	players: Vec<PlayerCost<T>>,
}

impl<T, C> Default for GameCosts<T, C> {
	fn default() -> Self {
		GameCosts {
			terms: Vec::new(),
			players: Vec::new(),
		}
	}
}

impl<T: Real, C> GameCosts<T, C> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_term(&mut self, term: C) -> TermId {
		self.terms.push(term);
		TermId(self.terms.len() - 1)
	}

	pub fn term(&self, id: TermId) -> &C {
		&self.terms[id.0]
	}

	pub fn term_mut(&mut self, id: TermId) -> &mut C {
		&mut self.terms[id.0]
	}

	/// Adds a player with no cost terms. Players are indexed in the order they are added.
	pub fn add_player(&mut self, name: impl Into<String>) -> PlayerIndex {
		self.players.push(PlayerCost {
			name: name.into(),
			terms: Vec::new(),
			exponential_constant: None,
		});
		self.players.len() - 1
	}

	pub fn add_player_term(&mut self, player: PlayerIndex, id: TermId) {
		self.players[player].terms.push(id);
	}

	pub fn set_exponential_constant(&mut self, player: PlayerIndex, a: Option<T>) {
		self.players[player].exponential_constant = a;
	}

	pub fn exponential_constant(&self, player: PlayerIndex) -> Option<T> {
		self.players[player].exponential_constant
	}

	pub fn player(&self, player: PlayerIndex) -> &PlayerCost<T> {
		&self.players[player]
	}

	pub fn num_players(&self) -> usize {
		self.players.len()
	}

	fn player_terms(&self, player: PlayerIndex) -> impl Iterator<Item = &C> + '_ {
		self.players[player].terms.iter().map(|id| &self.terms[id.0])
	}

	/// Sum of the player's terms at `(x, u)`.
	pub fn evaluate<const N: usize, const M: usize>(
		&self,
		player: PlayerIndex,
		t: T,
		x: &Vector<T, N>,
		u: &Vector<T, M>,
	) -> T
	where
		C: Cost<T, N, M>,
	{
		self.player_terms(player)
			.fold(T::zero(), |total, term| total + term.evaluate(t, x, u))
	}

	/// Sum of the player's terms over `[t0, t1]`, scored at the state `x` reached at `t1`.
	pub fn evaluate_offset<const N: usize, const M: usize>(
		&self,
		player: PlayerIndex,
		t0: T,
		t1: T,
		x: &Vector<T, N>,
		u: &Vector<T, M>,
	) -> T
	where
		C: Cost<T, N, M>,
	{
		self.player_terms(player)
			.fold(T::zero(), |total, term| total + term.evaluate_offset(t0, t1, x, u))
	}

	/// Quadraticizes the player's cost about `(x, u)`. For an exponentiated player this is the
	/// quadraticization of `exp(a c)`.
	pub fn quadraticize<const N: usize, const M: usize>(
		&self,
		player: PlayerIndex,
		t: T,
		x: &Vector<T, N>,
		u: &Vector<T, M>,
	) -> QuadraticCost<T, N, M>
	where
		C: Cost<T, N, M>,
	{
		let mut quadratic = QuadraticCost::zeros();
		for term in self.player_terms(player) {
			quadratic += term.quadraticize(t, x, u);
		}
		match self.exponential_constant(player) {
			Some(a) => quadratic.exponentiate(self.evaluate(player, t, x, u), a),
			None => quadratic,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::autodiff::Scalar;
	use more_asserts::*;

	/// `w (x0² + u0²)`.
	struct Weighted {
		weight: f64,
	}

	impl Cost<f64, 2, 2> for Weighted {
		fn evaluate<U: Scalar + From<f64>>(
			&self,
			_t: f64,
			x: &Vector<U, 2>,
			u: &Vector<U, 2>,
		) -> U {
			U::from(self.weight) * (x[0] * x[0] + u[0] * u[0])
		}
	}

	#[test]
	fn shared_terms_are_seen_by_every_player() {
		let mut costs = GameCosts::new();
		let shared = costs.add_term(Weighted { weight: 1.0 });
		let own = costs.add_term(Weighted { weight: 3.0 });
		let alice = costs.add_player("alice");
		let bob = costs.add_player("bob");
		costs.add_player_term(alice, shared);
		costs.add_player_term(bob, shared);
		costs.add_player_term(bob, own);

		let x = nalgebra::vector![1.0, 0.0];
		let u = nalgebra::vector![2.0, 0.0];
		assert_eq!(costs.num_players(), 2);
		assert_eq!(costs.evaluate(alice, 0.0, &x, &u), 5.0);
		assert_eq!(costs.evaluate(bob, 0.0, &x, &u), 20.0);

		costs.term_mut(shared).weight = 2.0;
		assert_eq!(costs.evaluate(alice, 0.0, &x, &u), 10.0);
		assert_eq!(costs.evaluate(bob, 0.0, &x, &u), 25.0);
		assert_eq!(costs.player(bob).terms(), &[shared, own]);
		assert_eq!(costs.quadraticize(alice, 0.0, &x, &u).q_uu[(0, 0)], 4.0);
	}

	#[test]
	fn exponentiated_player_quadraticizes_exp_of_cost() {
		let mut costs = GameCosts::new();
		let term = costs.add_term(Weighted { weight: 1.0 });
		let player = costs.add_player("cautious");
		costs.add_player_term(player, term);
		costs.set_exponential_constant(player, Some(0.5));
		assert_eq!(costs.exponential_constant(player), Some(0.5));

		// c = 1, ∂c/∂x0 = 2 and ∂²c/∂x0² = 2 at this point.
		let x = nalgebra::vector![1.0, 0.0];
		let u = nalgebra::vector![0.0, 0.0];
		let q = costs.quadraticize(player, 0.0, &x, &u);
		let e = 0.5f64.exp();
		assert_lt!((q.r_x[0] - e).abs(), 1e-12);
		assert_lt!((q.q_xx[(0, 0)] - 2.0 * e).abs(), 1e-12);
		assert_lt!((q.q_uu[(0, 0)] - e).abs(), 1e-12);
		assert_eq!(q.r_u[0], 0.0);
	}

	#[test]
	fn player_without_terms_costs_nothing() {
		let mut costs = GameCosts::<f64, Weighted>::new();
		let player = costs.add_player("idle");
		let x = nalgebra::vector![1.0, 1.0];
		let u = nalgebra::vector![1.0, 1.0];
		assert_eq!(costs.evaluate(player, 0.0, &x, &u), 0.0);
		assert_eq!(costs.evaluate_offset(player, 0.0, 0.1, &x, &u), 0.0);
		assert_eq!(costs.quadraticize(player, 0.0, &x, &u), QuadraticCost::zeros());
	}
}
