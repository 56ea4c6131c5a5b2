//! Ordering for overlapping chart reloads.

/// Tags requests so that only the newest response is applied.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSequence {
	latest: u64,
}

impl RequestSequence {
	pub fn issue(&mut self) -> u64 {
		self.latest += 1;
		self.latest
	}

	pub fn is_current(&self, tag: u64) -> bool {
		tag == self.latest
	}
}
