//! Optional observability for the engine glue.
//!
//! Enable `tracing` for `nextcloud_oauth2.flow` spans carrying `provider`, `flow`, and `stage`
//! fields. Enable `metrics` for the `nextcloud_oauth2_flow_total` counter, labeled by `flow` and
//! `outcome`. Without either feature every call compiles down to nothing.
//!
//! Adapters never log; only calls that reach the provider are observed.

// self
use crate::{_prelude::*, auth::ProviderId};

/// Engine operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Building the authorization redirect.
	Authorize,
	/// Exchanging an authorization code for a token.
	CodeExchange,
	/// Refreshing an access token.
	Refresh,
	/// Fetching the resource owner's profile.
	ResourceOwner,
}
impl FlowKind {
	/// Stable label for span fields and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::CodeExchange => "code_exchange",
			FlowKind::Refresh => "refresh",
			FlowKind::ResourceOwner => "resource_owner",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded per operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// The operation started.
	Attempt,
	/// The operation returned a value.
	Success,
	/// The operation returned an error.
	Failure,
}
impl FlowOutcome {
	/// Stable label for metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}

	/// Terminal outcome of `result`.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
	}
}

/// Passthrough future type when tracing is disabled, instrumented otherwise.
#[cfg(feature = "tracing")]
pub type Observed<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled, instrumented otherwise.
#[cfg(not(feature = "tracing"))]
pub type Observed<F> = F;

/// Span plus outcome counter for one engine operation.
///
/// [`FlowObserver::start`] records the attempt; [`FlowObserver::finish`] records how it ended.
#[derive(Clone, Debug)]
pub struct FlowObserver {
	kind: FlowKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowObserver {
	/// Opens the span and counts an attempt.
	pub fn start(provider: &ProviderId, kind: FlowKind, stage: &'static str) -> Self {
		record_flow_outcome(kind, FlowOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"nextcloud_oauth2.flow",
				provider = %provider,
				flow = kind.as_str(),
				stage
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (provider, stage);

			Self { kind }
		}
	}

	/// Operation being observed.
	pub fn kind(&self) -> FlowKind {
		self.kind
	}

	/// Enters the span for a synchronous section.
	pub fn enter(&self) -> ObserverGuard<'_> {
		#[cfg(feature = "tracing")]
		{
			ObserverGuard { _entered: self.span.enter() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			ObserverGuard { _observer: std::marker::PhantomData }
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Observed<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Notes the HTTP status a provider answered with.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(|| tracing::debug!(status, "Provider responded."));
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Counts the terminal outcome of `result` and logs failures inside the span.
	pub fn finish<T>(&self, result: &Result<T>) {
		#[cfg(feature = "tracing")]
		{
			if let Err(err) = result {
				self.span.in_scope(|| tracing::warn!(error = %err, "Flow failed."));
			}
		}

		record_flow_outcome(self.kind, FlowOutcome::of(result));
	}
}

/// Guard returned by [`FlowObserver::enter`].
pub struct ObserverGuard<'a> {
	#[cfg(feature = "tracing")]
	_entered: tracing::span::Entered<'a>,
	#[cfg(not(feature = "tracing"))]
	_observer: std::marker::PhantomData<&'a FlowObserver>,
}
impl Debug for ObserverGuard<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ObserverGuard(..)")
	}
}

/// Increments `nextcloud_oauth2_flow_total` (when the `metrics` feature is on).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"nextcloud_oauth2_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
