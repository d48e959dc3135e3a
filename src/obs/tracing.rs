// self
use crate::{_prelude::*, auth::ProviderId};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCallback<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCallback<F> = F;

/// Emits a `tracing` event at the given level; compiles to nothing without the feature.
macro_rules! log_event {
	($level:ident, $($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		::tracing::$level!($($arg)+);
	}};
}
pub(crate) use log_event;

/// A span builder used around callback handling.
#[derive(Clone, Debug)]
pub struct CallbackSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallbackSpan {
	/// Creates a new span tagged with the provider + stage.
	pub fn new(provider: &ProviderId, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_social_broker.callback",
				provider = provider.as_ref(),
				stage
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (provider, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCallback<Fut>
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

	fn provider() -> ProviderId {
		ProviderId::new("vk").expect("Provider fixture should be valid.")
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallbackSpan::new(&provider(), "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
