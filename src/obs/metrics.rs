// self
use crate::obs::{HandshakeBranch, HandshakeOutcome};

/// Records a handshake outcome via the global metrics recorder (when enabled).
pub fn record_handshake_outcome(branch: HandshakeBranch, outcome: HandshakeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_handshake_total",
			"branch" => branch.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (branch, outcome);
	}
}
