//! Bounded polling of long-running remote operations
//!
//! [`wait_for_condition`] repeatedly evaluates an asynchronous "still in
//! progress?" check until it reports completion, a deadline passes, or the
//! caller cancels. Waiting is done with tokio timers, so any number of polls
//! can run concurrently without holding a thread each.
//!
//! Timeline of one call:
//!
//! ```text
//! enter ── initial_delay ── check ── interval ── check ── interval ── check → done
//!   │                                                                   │
//!   └──────────────────────────── timeout ──────────────────────────────┘
//! ```
//!
//! The timeout budget starts when the function is entered, so the initial
//! delay counts against it.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// Extra budget granted on top of a test's own timeout before giving up on it
pub const TEST_TIMEOUT_MARGIN: Duration = Duration::from_millis(3000);

/// Delay before the first status check of a test run
pub const TEST_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Delay between status checks of a test run
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Timing parameters of a poll loop
///
/// A zero `initial_delay` or `interval` means "do not wait": the loop only
/// yields to the scheduler. A zero `timeout` expires before the first check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Total budget, measured from entering the poll loop
    pub timeout: Duration,
    /// Wait before the first check
    pub initial_delay: Duration,
    /// Wait between a check reporting "in progress" and the next check
    pub interval: Duration,
}

impl PollConfig {
    pub const fn new(timeout: Duration, initial_delay: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            initial_delay,
            interval,
        }
    }

    /// Poll timing used while waiting for a Microcks test run
    ///
    /// # Arguments
    /// * `test_timeout` - The timeout declared in the test request
    pub fn for_test_run(test_timeout: Duration) -> Self {
        Self {
            timeout: TEST_TIMEOUT_MARGIN.saturating_add(test_timeout),
            initial_delay: TEST_INITIAL_DELAY,
            interval: TEST_POLL_INTERVAL,
        }
    }
}

/// Ways a poll loop can end without the condition being met
#[derive(Debug, Error)]
pub enum PollError<E: std::error::Error + 'static> {
    /// The budget elapsed while the check still reported "in progress"
    #[error("condition still unmet after {0:?}")]
    Timeout(Duration),

    /// The caller's cancellation token fired
    #[error("polling cancelled")]
    Cancelled,

    /// The check itself failed; it is not retried
    #[error(transparent)]
    Check(E),
}

impl<E: std::error::Error + 'static> PollError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Waits until `in_progress` reports `false`
///
/// `in_progress` is evaluated once after `config.initial_delay`, then again
/// every `config.interval` for as long as it returns `Ok(true)`. Evaluations
/// never overlap. The first `Ok(false)` ends the wait successfully.
///
/// # Arguments
/// * `config` - Timeout, initial delay and interval
/// * `cancel` - Cancels the wait; pending sleeps are interrupted immediately
/// * `in_progress` - Status check, `true` while the awaited operation is still running
///
/// # Errors
/// * [`PollError::Cancelled`] if `cancel` fires first
/// * [`PollError::Timeout`] if `config.timeout` elapses first; a check in
///   flight at that moment is abandoned
/// * [`PollError::Check`] with the unchanged error of the first failing check
///
/// When several of these are ready at the same instant, cancellation wins
/// over the deadline, which wins over a check result.
///
/// # Example
/// ```
/// # use microcks_client::poll::{wait_for_condition, PollConfig};
/// # use std::time::Duration;
/// # use tokio_util::sync::CancellationToken;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = PollConfig::new(
///     Duration::from_secs(1),
///     Duration::from_millis(10),
///     Duration::from_millis(10),
/// );
/// let mut remaining = 3;
/// let result = wait_for_condition(&config, &CancellationToken::new(), || {
///     remaining -= 1;
///     let still_running = remaining > 0;
///     async move { Ok::<_, std::io::Error>(still_running) }
/// })
/// .await;
/// assert!(result.is_ok());
/// # }
/// ```
pub async fn wait_for_condition<F, Fut, E>(
    config: &PollConfig,
    cancel: &CancellationToken,
    mut in_progress: F,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + 'static,
{
    if config.timeout.is_zero() && !cancel.is_cancelled() {
        return Err(PollError::Timeout(config.timeout));
    }
    let deadline = Instant::now() + config.timeout;

    let poll = async {
        pause(config.initial_delay).await;
        while in_progress().await.map_err(PollError::Check)? {
            pause(config.interval).await;
        }
        Ok::<(), PollError<E>>(())
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PollError::Cancelled),
        _ = time::sleep_until(deadline) => Err(PollError::Timeout(config.timeout)),
        result = poll => result,
    }
}

async fn pause(duration: Duration) {
    if duration.is_zero() {
        tokio::task::yield_now().await;
    } else {
        time::sleep(duration).await;
    }
}
