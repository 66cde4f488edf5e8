// self
use crate::{_prelude::*, obs::HandshakeBranch};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedBranch<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedBranch<F> = F;

/// A span builder used by handshake branches.
#[derive(Clone, Debug)]
pub struct HandshakeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl HandshakeSpan {
	/// Creates a new span tagged with the provided branch + stage.
	pub fn new(branch: HandshakeBranch, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_handshake.branch", branch = branch.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (branch, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedBranch<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_passes_the_future_through() {
		let span = HandshakeSpan::new(HandshakeBranch::Callback, "instrument");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
