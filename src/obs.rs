//! Optional observability helpers for handshake invocations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_handshake.branch` with the
//!   `branch` (initiate/callback) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `oauth2_handshake_total` counter for every
//!   attempt/success/failure, labeled by `branch` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Handshake branches observed by the handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandshakeBranch {
	/// First contact: state issuance + redirect to the provider.
	Initiate,
	/// Redirect-back leg: state validation + token exchange.
	Callback,
}
impl HandshakeBranch {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeBranch::Initiate => "initiate",
			HandshakeBranch::Callback => "callback",
		}
	}
}
impl Display for HandshakeBranch {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandshakeOutcome {
	/// Entry to a handshake branch.
	Attempt,
	/// Terminal success reply (200 or a redirect).
	Success,
	/// Terminal failure reply (400 or 500).
	Failure,
}
impl HandshakeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeOutcome::Attempt => "attempt",
			HandshakeOutcome::Success => "success",
			HandshakeOutcome::Failure => "failure",
		}
	}
}
impl Display for HandshakeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
