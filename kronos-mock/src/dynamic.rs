use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kronos_core::{ForecastTable, GenerateRequest, Predictor};
use kronos_types::KronosError;

use crate::flat_forecast;

/// Instruction for how `generate` should behave.
#[derive(Clone)]
pub enum MockBehavior {
    /// Repeat the last lookback close at every target timestamp.
    Flat,
    /// Return the provided table as-is.
    Return(ForecastTable),
    /// Fail immediately with the provided error.
    Fail(KronosError),
    /// Hang indefinitely (simulate a stalled model).
    Hang,
}

struct InternalState {
    behavior: MockBehavior,
    delay: Option<Duration>,
    requests: Vec<GenerateRequest>,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            behavior: MockBehavior::Flat,
            delay: None,
            requests: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Concurrency {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Decrements the in-flight counter even when the call future is dropped.
struct InFlight<'a>(&'a Concurrency);

impl<'a> InFlight<'a> {
    fn enter(c: &'a Concurrency) -> Self {
        let now = c.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        c.peak.fetch_max(now, Ordering::SeqCst);
        Self(c)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
    concurrency: Arc<Concurrency>,
}

impl DynamicMockController {
    /// Set the behavior of subsequent `generate` calls.
    pub async fn set_behavior(&self, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.behavior = behavior;
    }

    /// Sleep for `delay` inside every `generate` call before responding.
    pub async fn set_delay(&self, delay: Duration) {
        let mut guard = self.state.lock().await;
        guard.delay = Some(delay);
    }

    /// Return a copy of every request received so far.
    pub async fn requests(&self) -> Vec<GenerateRequest> {
        let guard = self.state.lock().await;
        guard.requests.clone()
    }

    /// Number of `generate` calls received so far.
    pub async fn call_count(&self) -> usize {
        let guard = self.state.lock().await;
        guard.requests.len()
    }

    /// Calls currently inside `generate`.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.concurrency.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous `generate` calls observed.
    #[must_use]
    pub fn peak_concurrency(&self) -> usize {
        self.concurrency.peak.load(Ordering::SeqCst)
    }

    /// Reset behavior, delay and the request log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// A predictor that defers all behavior to an external controller.
pub struct DynamicMockPredictor {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
    concurrency: Arc<Concurrency>,
}

impl DynamicMockPredictor {
    /// Create a new dynamic mock predictor and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn Predictor>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let concurrency = Arc::new(Concurrency::default());
        let controller = DynamicMockController {
            state: Arc::clone(&state),
            concurrency: Arc::clone(&concurrency),
        };
        let me = Arc::new(Self {
            name,
            state,
            concurrency,
        });
        (me as Arc<dyn Predictor>, controller)
    }
}

#[async_trait]
impl Predictor for DynamicMockPredictor {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn generate(&self, req: GenerateRequest) -> Result<ForecastTable, KronosError> {
        let _guard = InFlight::enter(&self.concurrency);
        // Snapshot behavior without holding the lock across await points
        let (behavior, delay) = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            (guard.behavior.clone(), guard.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match behavior {
            MockBehavior::Flat => Ok(flat_forecast(&req)),
            MockBehavior::Return(table) => Ok(table),
            MockBehavior::Fail(e) => Err(e),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
