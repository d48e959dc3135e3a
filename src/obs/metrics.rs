// self
use crate::obs::OutcomeLabel;

/// Records a callback outcome via the global metrics recorder (when enabled).
pub fn record_callback_outcome(outcome: OutcomeLabel) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_social_broker_callback_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
