use serde::{Deserialize, Serialize};

/// Direction of travel through a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
	/// Towards the end of the document.
	Forward,
	/// Towards the start of the document.
	Backward,
}

impl Direction {
	/// Returns the opposite direction.
	#[inline]
	pub fn reversed(self) -> Self {
		match self {
			Self::Forward => Self::Backward,
			Self::Backward => Self::Forward,
		}
	}

	/// Returns true for [`Direction::Forward`].
	#[inline]
	pub fn is_forward(self) -> bool {
		self == Self::Forward
	}
}

impl std::fmt::Display for Direction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Forward => f.write_str("forward"),
			Self::Backward => f.write_str("backward"),
		}
	}
}
