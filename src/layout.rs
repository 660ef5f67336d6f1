use std::ops::Range;

use crate::error::{Error, Result};
use crate::prelude::*;

/// Which coordinates of the joint control each player owns.
///
/// Players own disjoint, contiguous slices of the joint control, in player order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLayout {
	ranges: Vec<Range<usize>>,
}

impl ControlLayout {
	/// Lays out players with the given control dimensions over a joint control of dimension `m`.
	pub fn new(dims: &[usize], m: usize) -> Result<Self> {
		if dims.is_empty() || dims.contains(&0) || dims.iter().sum::<usize>() != m {
			return Err(Error::ControlLayout {
				dims: dims.to_vec(),
				m,
			});
		}
		let ranges = dims
			.iter()
			.scan(0, |start, &dim| {
				let range = *start..*start + dim;
				*start += dim;
				Some(range)
			})
			.collect();
		Ok(ControlLayout { ranges })
	}

	pub fn num_players(&self) -> usize {
		self.ranges.len()
	}

	pub fn range(&self, player: PlayerIndex) -> Range<usize> {
		self.ranges[player].clone()
	}

	pub fn dim(&self, player: PlayerIndex) -> usize {
		self.ranges[player].len()
	}

	pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
		self.ranges.iter().cloned()
	}
}
