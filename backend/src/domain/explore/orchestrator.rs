//! Debounce and stale-response bookkeeping for spot fetches.
//!
//! The orchestrator owns no timers or tasks. The session loop asks it for the
//! current deadline, reports when the deadline passes, and hands back each
//! completed generation to learn whether the result may be applied.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet period before a fetch is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Monotonic tag attached to each issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value, for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What to do with a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The request is the live one; apply its outcome.
    Apply,
    /// A newer change happened since the request was issued; discard it.
    Superseded,
}

/// Debounced fetch state machine.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use pawscout::domain::explore::{FetchOrchestrator, Resolution};
/// use tokio::time::Instant;
///
/// let mut orchestrator = FetchOrchestrator::new(Duration::from_millis(500));
/// orchestrator.record_change(Instant::now());
/// let generation = orchestrator.fire(true).expect("request issued");
/// assert_eq!(orchestrator.resolve(generation), Resolution::Apply);
/// assert!(!orchestrator.is_loading());
/// ```
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    debounce: Duration,
    deadline: Option<Instant>,
    issued: u64,
    live: Option<Generation>,
    loading: bool,
}

impl FetchOrchestrator {
    /// Idle orchestrator with the given quiet period.
    #[must_use]
    pub const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
            issued: 0,
            live: None,
            loading: false,
        }
    }

    /// Register a viewport or category change at `now`.
    ///
    /// Restarts the debounce window, invalidates the in-flight request, and
    /// raises the loading flag.
    pub fn record_change(&mut self, now: Instant) {
        self.deadline = Some(now + self.debounce);
        self.live = None;
        self.loading = true;
    }

    /// When the pending debounce window closes.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Close the debounce window.
    ///
    /// Issues a fresh generation when `can_issue`; otherwise settles the
    /// loading flag without a request.
    pub fn fire(&mut self, can_issue: bool) -> Option<Generation> {
        self.deadline = None;
        if !can_issue {
            self.loading = false;
            return None;
        }
        self.issued += 1;
        let generation = Generation(self.issued);
        self.live = Some(generation);
        Some(generation)
    }

    /// Classify a completed request.
    pub fn resolve(&mut self, generation: Generation) -> Resolution {
        if self.live != Some(generation) {
            return Resolution::Superseded;
        }
        self.live = None;
        self.loading = false;
        Resolution::Apply
    }

    /// Whether a change is pending or a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Generation whose result would currently be applied.
    #[must_use]
    pub const fn live_generation(&self) -> Option<Generation> {
        self.live
    }
}

impl Default for FetchOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn orchestrator() -> FetchOrchestrator {
        FetchOrchestrator::default()
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn change_restarts_debounce_window(mut orchestrator: FetchOrchestrator) {
        let start = Instant::now();
        orchestrator.record_change(start);
        orchestrator.record_change(start + Duration::from_millis(300));

        assert_eq!(
            orchestrator.deadline(),
            Some(start + Duration::from_millis(800))
        );
        assert!(orchestrator.is_loading());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn generations_increase_monotonically(mut orchestrator: FetchOrchestrator) {
        orchestrator.record_change(Instant::now());
        let first = orchestrator.fire(true).expect("first");
        orchestrator.record_change(Instant::now());
        let second = orchestrator.fire(true).expect("second");
        assert!(second > first);
        assert_eq!(orchestrator.deadline(), None);
    }

    #[rstest]
    #[case::newest_first(true)]
    #[case::oldest_first(false)]
    #[tokio::test(start_paused = true)]
    async fn only_newest_generation_applies(
        mut orchestrator: FetchOrchestrator,
        #[case] newest_first: bool,
    ) {
        orchestrator.record_change(Instant::now());
        let old = orchestrator.fire(true).expect("old");
        orchestrator.record_change(Instant::now());
        let new = orchestrator.fire(true).expect("new");

        let outcomes = if newest_first {
            [(new, orchestrator.resolve(new)), (old, orchestrator.resolve(old))]
        } else {
            [(old, orchestrator.resolve(old)), (new, orchestrator.resolve(new))]
        };

        for (generation, resolution) in outcomes {
            let expected = if generation == new {
                Resolution::Apply
            } else {
                Resolution::Superseded
            };
            assert_eq!(resolution, expected);
        }
        assert!(!orchestrator.is_loading());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn change_invalidates_in_flight_request(mut orchestrator: FetchOrchestrator) {
        orchestrator.record_change(Instant::now());
        let generation = orchestrator.fire(true).expect("issued");
        orchestrator.record_change(Instant::now());

        assert_eq!(orchestrator.resolve(generation), Resolution::Superseded);
        assert!(orchestrator.is_loading());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn firing_without_request_clears_loading(mut orchestrator: FetchOrchestrator) {
        orchestrator.record_change(Instant::now());
        assert_eq!(orchestrator.fire(false), None);
        assert!(!orchestrator.is_loading());
        assert_eq!(orchestrator.live_generation(), None);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn resolving_twice_is_superseded(mut orchestrator: FetchOrchestrator) {
        orchestrator.record_change(Instant::now());
        let generation = orchestrator.fire(true).expect("issued");
        assert_eq!(orchestrator.resolve(generation), Resolution::Apply);
        assert_eq!(orchestrator.resolve(generation), Resolution::Superseded);
    }
}
