//! Timer-driven order polling.
//!
//! [`OrderPoller`] holds the logic of a single tick. [`PollerControl`] starts and stops a [`PollingSession`], which
//! owns the timer task and the session's [`SeenOrderSet`].
//!
//! Ticks never overlap: the worker awaits each tick before waiting for the next one, ticks that fall due while one is
//! still in flight are skipped, and every tick of every session runs under one gate owned by [`PollerControl`], so a
//! tick left running by `stop` finishes before the next session's first tick starts. Errors never escape a tick. Each one is logged and the next tick tries again.
use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use log::*;
use serde::Serialize;
use tokio::{
    sync::{oneshot, Mutex},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::{
    relay_api::{dispatch::reconcile_batch, dispatch::SeenOrderSet, errors::PollerError, token_manager::TokenManager},
    token_store::TokenStore,
    traits::MerchantProvider,
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20_000);
pub const DEFAULT_FETCH_LIMIT: u32 = 2;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Tick period used when `start` is not given one.
    pub interval: Duration,
    /// Page size of each feed request.
    pub fetch_limit: u32,
    /// Only orders of this type are printed.
    pub target_order_type_id: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            target_order_type_id: String::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoCredentials,
    TokenStoreUnavailable(String),
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped(SkipReason),
    /// The feed was read. Holds the ids that were sent to the printer (possibly none).
    Dispatched(Vec<String>),
    /// The feed rejected the access token. One refresh was attempted; nothing else happened this tick.
    Unauthorized { refreshed: bool },
    /// Any other feed failure, including timeouts.
    FeedFailed(String),
}

pub struct OrderPoller<S, P> {
    tokens: Arc<TokenManager<S, P>>,
    provider: Arc<P>,
    fetch_limit: u32,
    target_order_type_id: String,
}

impl<S, P> Clone for OrderPoller<S, P> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            provider: Arc::clone(&self.provider),
            fetch_limit: self.fetch_limit,
            target_order_type_id: self.target_order_type_id.clone(),
        }
    }
}

impl<S, P> OrderPoller<S, P>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    pub fn new(tokens: Arc<TokenManager<S, P>>, provider: Arc<P>, config: &PollerConfig) -> Self {
        if config.target_order_type_id.is_empty() {
            warn!("🕰️ No target order type is configured. No orders will be printed.");
        }
        Self {
            tokens,
            provider,
            fetch_limit: config.fetch_limit,
            target_order_type_id: config.target_order_type_id.clone(),
        }
    }

    /// Runs one poll: read credentials, fetch the feed, print whatever is new.
    pub async fn tick(&self, seen: &mut SeenOrderSet) -> TickOutcome {
        let credentials = match self.tokens.credentials() {
            Ok(Some(c)) => c,
            Ok(None) => return TickOutcome::Skipped(SkipReason::NoCredentials),
            Err(e) => return TickOutcome::Skipped(SkipReason::TokenStoreUnavailable(e.to_string())),
        };
        match self.provider.fetch_recent_orders(&credentials, self.fetch_limit).await {
            Ok(orders) => {
                trace!("🕰️ Feed returned {} orders", orders.len());
                let dispatched =
                    reconcile_batch(&orders, &self.target_order_type_id, seen, self.provider.as_ref(), &credentials)
                        .await;
                TickOutcome::Dispatched(dispatched)
            },
            Err(e) if e.is_unauthorized() => {
                warn!("🕰️ 401 Unauthorized. Refreshing token.");
                let refreshed = match self.tokens.refresh_after_rejection(&credentials.access_token).await {
                    Ok(_) => true,
                    Err(e) => {
                        error!("🕰️ Token refresh failed. {e}");
                        false
                    },
                };
                TickOutcome::Unauthorized { refreshed }
            },
            Err(e) => TickOutcome::FeedFailed(e.to_string()),
        }
    }
}

fn log_outcome(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Skipped(SkipReason::NoCredentials) => debug!("🕰️ No credentials yet. Skipping tick."),
        TickOutcome::Skipped(SkipReason::TokenStoreUnavailable(e)) => {
            warn!("🕰️ Could not read tokens. Skipping tick. {e}")
        },
        TickOutcome::Dispatched(ids) if ids.is_empty() => debug!("🕰️ No new orders"),
        TickOutcome::Dispatched(ids) => info!("🕰️ {} new orders sent to the printer: {}", ids.len(), ids.join(", ")),
        TickOutcome::Unauthorized { refreshed } => debug!("🕰️ Tick ended after auth failure. Refreshed: {refreshed}"),
        TickOutcome::FeedFailed(e) => error!("🕰️ Error fetching orders. {e}"),
    }
}

/// A running poll loop. Dropped when polling stops, taking the seen set with it.
struct PollingSession {
    interval: Duration,
    started_at: DateTime<Utc>,
    seen: Arc<Mutex<SeenOrderSet>>,
    // Size of `seen` as of the last completed tick. Readable without waiting on a tick in flight.
    seen_count: Arc<AtomicUsize>,
    shutdown: oneshot::Sender<()>,
    // Detached on stop. An in-flight tick runs to completion.
    _worker: JoinHandle<()>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollerStatus {
    pub running: bool,
    pub interval_ms: Option<u64>,
    pub started_at: Option<DateTime<Utc>>,
    pub seen_orders: usize,
}

/// Starts and stops the poller. At most one session exists at a time.
pub struct PollerControl<S, P> {
    poller: OrderPoller<S, P>,
    default_interval: Duration,
    session: Mutex<Option<PollingSession>>,
    // Held for the duration of every tick, across sessions. A tick left running by `stop` finishes before the next
    // session's first tick begins.
    tick_gate: Arc<Mutex<()>>,
}

impl<S, P> Debug for PollerControl<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PollerControl")
    }
}

impl<S, P> PollerControl<S, P>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    pub fn new(poller: OrderPoller<S, P>, default_interval: Duration) -> Self {
        Self { poller, default_interval, session: Mutex::new(None), tick_gate: Arc::new(Mutex::new(())) }
    }

    /// Starts a new session with an empty seen set. The first tick fires one `interval` from now.
    pub async fn start(&self, interval: Option<Duration>) -> Result<Duration, PollerError> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Err(PollerError::AlreadyRunning);
        }
        let interval = interval.unwrap_or(self.default_interval);
        if interval.is_zero() {
            return Err(PollerError::InvalidInterval);
        }
        let seen = Arc::new(Mutex::new(SeenOrderSet::new()));
        let seen_count = Arc::new(AtomicUsize::new(0));
        let (shutdown, shutdown_rx) = oneshot::channel();
        let worker = start_poll_worker(
            self.poller.clone(),
            interval,
            PollWorkerState {
                seen: Arc::clone(&seen),
                seen_count: Arc::clone(&seen_count),
                tick_gate: Arc::clone(&self.tick_gate),
            },
            shutdown_rx,
        );
        *session =
            Some(PollingSession { interval, started_at: Utc::now(), seen, seen_count, shutdown, _worker: worker });
        info!("🕰️ Polling service started");
        Ok(interval)
    }

    /// Stops the current session. Future ticks are cancelled; a tick that is already running finishes.
    pub async fn stop(&self) -> Result<(), PollerError> {
        let session = self.session.lock().await.take().ok_or(PollerError::NotRunning)?;
        if session.shutdown.send(()).is_err() {
            warn!("🕰️ The poll worker had already exited");
        }
        info!("🕰️ Polling service stopped");
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Never waits for a tick in flight. `seen_orders` reflects the last completed tick.
    pub async fn status(&self) -> PollerStatus {
        let session = self.session.lock().await;
        match session.as_ref() {
            Some(s) => PollerStatus {
                running: true,
                interval_ms: Some(duration_ms(s.interval)),
                started_at: Some(s.started_at),
                seen_orders: s.seen_count.load(Ordering::SeqCst),
            },
            None => PollerStatus { running: false, interval_ms: None, started_at: None, seen_orders: 0 },
        }
    }

    /// The ids printed so far in the current session, or `None` when stopped.
    ///
    /// Waits for a tick in flight, but without holding up `start` or `stop` meanwhile.
    pub async fn seen_orders(&self) -> Option<Vec<String>> {
        let seen = self.session.lock().await.as_ref().map(|s| Arc::clone(&s.seen))?;
        let mut ids = seen.lock().await.ids().map(String::from).collect::<Vec<_>>();
        ids.sort();
        Some(ids)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

struct PollWorkerState {
    seen: Arc<Mutex<SeenOrderSet>>,
    seen_count: Arc<AtomicUsize>,
    tick_gate: Arc<Mutex<()>>,
}

/// Spawns the poll loop. The loop exits when `shutdown` fires or its sender is dropped.
fn start_poll_worker<S, P>(
    poller: OrderPoller<S, P>,
    period: Duration,
    state: PollWorkerState,
    mut shutdown: oneshot::Receiver<()>,
) -> JoinHandle<()>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    tokio::spawn(async move {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("🕰️ Order poller running every {}ms", period.as_millis());
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = timer.tick() => {
                    let _gate = state.tick_gate.lock().await;
                    let mut seen = state.seen.lock().await;
                    let outcome = poller.tick(&mut seen).await;
                    state.seen_count.store(seen.len(), Ordering::SeqCst);
                    log_outcome(&outcome);
                },
            }
        }
        debug!("🕰️ Order poller has shut down");
    })
}
