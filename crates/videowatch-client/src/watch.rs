//! Watch loop driving the status poll cycle.
//!
//! The watcher owns the connection and a renderer and repeats one cycle:
//! connect, request a snapshot, render each reply, wait the poll interval,
//! request again. A disconnect interrupts the cycle and reconnects with:
//! - Exponential backoff with jitter
//! - A capped delay between attempts
//! - An optional consecutive-failure bound that ends the watch

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use videowatch_core::Render;
use videowatch_protocol::decode_snapshot;

use crate::connection::StatusClient;
use crate::error::{ClientError, ClientResult};

/// Notice shown while the connection is down.
pub const CONNECTION_LOST_NOTICE: &str = "Server connection lost... Reconnecting...";

/// Reconnect backoff policy.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Delay before the first reconnect attempt.
    pub initial_delay: Duration,
    /// Upper bound for the backoff delay.
    pub max_delay: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Maximum jitter applied to a delay (as fraction 0.0-1.0).
    pub jitter_fraction: f64,
    /// Consecutive failures before giving up (0 = retry forever).
    pub max_consecutive_failures: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(3000),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter_fraction: 0.1,
            max_consecutive_failures: 0,
        }
    }
}

impl ReconnectPolicy {
    /// Builder: set backoff parameters.
    pub fn with_backoff(mut self, initial: Duration, max: Duration, multiplier: f64) -> Self {
        self.initial_delay = initial;
        self.max_delay = max;
        self.multiplier = multiplier;
        self
    }

    /// Builder: set jitter fraction.
    pub fn with_jitter(mut self, fraction: f64) -> Self {
        self.jitter_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Builder: set the consecutive-failure bound (0 = retry forever).
    pub fn with_max_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max;
        self
    }

    /// Calculates the reconnect delay for the given consecutive failures.
    pub fn delay_for(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return Duration::ZERO;
        }

        let base = self.initial_delay.as_secs_f64();
        let multiplier = self.multiplier.powi(consecutive_failures as i32 - 1);
        let delay = (base * multiplier).min(self.max_delay.as_secs_f64());
        let jitter = rand_jitter(delay * self.jitter_fraction);

        Duration::from_secs_f64((delay + jitter).max(0.0))
    }

    /// Returns true once the failure bound has been reached.
    pub fn is_exhausted(&self, consecutive_failures: u32) -> bool {
        self.max_consecutive_failures != 0 && consecutive_failures >= self.max_consecutive_failures
    }
}

/// Simple pseudo-random jitter generator.
/// Uses the current time to generate a value in [-range, range].
fn rand_jitter(range: f64) -> f64 {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();

    // Map nanos to [-range, range]
    let fraction = (nanos as f64) / (1_000_000_000.0);
    (fraction * 2.0 - 1.0) * range
}

/// Options controlling the watch loop.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Delay between a rendered snapshot and the next status request.
    pub poll_interval: Duration,
    /// Timeout for each connection attempt.
    pub connect_timeout: Duration,
    /// Reconnect backoff policy.
    pub reconnect: ReconnectPolicy,
    /// Stop after the first successfully rendered snapshot.
    pub once: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1500),
            connect_timeout: StatusClient::DEFAULT_CONNECT_TIMEOUT,
            reconnect: ReconnectPolicy::default(),
            once: false,
        }
    }
}

impl WatchOptions {
    /// Builder: set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder: set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder: set the reconnect policy.
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Builder: enable or disable once mode.
    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }
}

/// How one connected session ended.
#[derive(Debug)]
enum SessionEnd {
    /// Once mode got its snapshot.
    Completed,
    /// The server closed the connection or the transport failed.
    Closed,
}

/// Drives the connect/render/reconnect loop until it completes or gives up.
pub struct Watcher<R> {
    client: StatusClient,
    renderer: R,
    options: WatchOptions,
}

impl<R: Render> Watcher<R> {
    /// Creates a watcher from a client, a renderer and options.
    pub fn new(client: StatusClient, renderer: R, options: WatchOptions) -> Self {
        Self {
            client,
            renderer,
            options,
        }
    }

    /// Runs the watch loop.
    ///
    /// Returns `Ok(())` when once mode finishes after its first rendered
    /// snapshot, or [`ClientError::ConnectionLost`] once the reconnect
    /// policy's failure bound is reached. With an unbounded policy this
    /// only returns on once-mode completion.
    pub async fn run(&mut self) -> ClientResult<()> {
        info!(
            endpoint = %self.client.endpoint(),
            poll_interval_ms = self.options.poll_interval.as_millis() as u64,
            "starting watch"
        );

        let mut consecutive_failures: u32 = 0;
        loop {
            if let Err(err) = self.client.connect().await {
                warn!(error = %err, "connection attempt failed");
                consecutive_failures += 1;
                self.await_reconnect(consecutive_failures).await?;
                continue;
            }
            consecutive_failures = 0;

            match self.session().await {
                SessionEnd::Completed => {
                    self.client.disconnect().await;
                    return Ok(());
                }
                SessionEnd::Closed => {
                    consecutive_failures += 1;
                    self.await_reconnect(consecutive_failures).await?;
                }
            }
        }
    }

    /// Shows the disconnect notice and waits out the backoff delay.
    ///
    /// Errors with [`ClientError::ConnectionLost`] once the policy's failure
    /// bound is reached; no notice is shown in that case.
    async fn await_reconnect(&mut self, consecutive_failures: u32) -> ClientResult<()> {
        if self.options.reconnect.is_exhausted(consecutive_failures) {
            return Err(ClientError::ConnectionLost {
                attempts: consecutive_failures,
            });
        }

        self.renderer.connection_lost(CONNECTION_LOST_NOTICE)?;

        let delay = self.options.reconnect.delay_for(consecutive_failures);
        debug!(
            failures = consecutive_failures,
            delay_ms = delay.as_millis() as u64,
            "waiting before reconnect"
        );
        tokio::time::sleep(delay).await;
        Ok(())
    }

    /// Runs one connected session until the connection goes away.
    ///
    /// Races inbound frames against the armed re-request timer. Every
    /// rendered snapshot re-arms the timer; parse and render failures stall
    /// the cycle until the next inbound frame. Dropping the session drops
    /// any pending timer with it.
    async fn session(&mut self) -> SessionEnd {
        let generation = self.client.generation();
        let resend = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(resend);
        // A completed Sleep must not be polled again, so the timer branch is
        // gated on `armed`.
        let mut armed = false;

        loop {
            tokio::select! {
                frame = self.client.next_frame() => match frame {
                    Ok(Some(text)) => {
                        armed = false;
                        if self.handle_message(&text) {
                            if self.options.once {
                                return SessionEnd::Completed;
                            }
                            resend
                                .as_mut()
                                .reset(Instant::now() + self.options.poll_interval);
                            armed = true;
                        }
                    }
                    Ok(None) => return SessionEnd::Closed,
                    Err(err) => {
                        warn!(error = %err, "connection failed");
                        return SessionEnd::Closed;
                    }
                },
                _ = &mut resend, if armed => {
                    armed = false;
                    // A timer armed under an earlier connection must not send
                    // on a later one.
                    if !self.client.is_connected() || self.client.generation() != generation {
                        debug!("dropping stale status request");
                        continue;
                    }
                    if let Err(err) = self.client.request_status().await {
                        warn!(error = %err, "status request failed");
                        return SessionEnd::Closed;
                    }
                }
            }
        }
    }

    /// Parses and renders one inbound message.
    ///
    /// Returns true when a snapshot was rendered. On parse or render failure
    /// nothing is scheduled; the cycle stalls until the next inbound frame.
    fn handle_message(&mut self, text: &str) -> bool {
        let snapshot = match decode_snapshot(text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "undecodable status message");
                return false;
            }
        };

        if let Err(err) = self.renderer.render(&snapshot) {
            warn!(error = %err, "render failed");
            return false;
        }
        debug!("snapshot rendered");
        true
    }
}
