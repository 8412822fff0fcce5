//! Periodic refresh scheduling.
//!
//! A [`Poller`] runs an ordered set of [`RefreshJob`]s once immediately and
//! then on a fixed cadence from a background tokio task. Jobs in a cycle run
//! one after another, and a new cycle never starts before the previous one
//! finished, so at most one request is in flight from a poller at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::fetcher::AuthenticatedFetcher;
use crate::jobs::RefreshJob;
use crate::renderer::Renderer;

/// Run every job once, in order. A failing job does not stop the others.
pub async fn run_cycle(jobs: &[RefreshJob], fetcher: &AuthenticatedFetcher, renderer: &dyn Renderer) {
    debug!(jobs = jobs.len(), "Poll cycle started");
    for job in jobs {
        job.run(fetcher, renderer).await;
    }
    debug!("Poll cycle finished");
}

/// Handle to one active periodic schedule.
///
/// Dropping the handle has the same effect as [`PollHandle::stop`].
#[derive(Debug)]
pub struct PollHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Prevent new cycles from starting. A cycle already running completes.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }

    /// Like [`PollHandle::stop`], but wait for an in-flight cycle to finish.
    pub async fn stop_and_join(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            debug!(error = %e, "Poll task ended abnormally");
        }
    }

    /// Stop and abandon any in-flight cycle at its next suspension point.
    pub fn abort(self) {
        let _ = self.stop_tx.send(true);
        self.task.abort();
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Cancellable periodic scheduler. At most one schedule is active at a time.
pub struct Poller {
    fetcher: Arc<AuthenticatedFetcher>,
    renderer: Arc<dyn Renderer>,
    handle: Option<PollHandle>,
}

impl Poller {
    pub fn new(fetcher: Arc<AuthenticatedFetcher>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            fetcher,
            renderer,
            handle: None,
        }
    }

    /// Run `jobs` once now, then every `interval`.
    ///
    /// Any schedule started earlier is stopped first, and its in-flight
    /// cycle is allowed to finish before the new initial pass begins. Must
    /// be called from within a tokio runtime.
    pub async fn start(&mut self, jobs: Vec<RefreshJob>, interval: Duration) {
        if let Some(handle) = self.handle.take() {
            handle.stop_and_join().await;
            debug!("Previous schedule stopped");
        }

        let jobs: Arc<[RefreshJob]> = jobs.into();
        run_cycle(&jobs, &self.fetcher, self.renderer.as_ref()).await;

        let period = interval.max(Duration::from_millis(1));
        let first_tick = Instant::now() + period;
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let fetcher = self.fetcher.clone();
        let renderer = self.renderer.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        run_cycle(&jobs, &fetcher, renderer.as_ref()).await;
                    }
                }
            }
            debug!("Poll loop exited");
        });

        debug!(interval_ms = period.as_millis() as u64, "Poller started");
        self.handle = Some(PollHandle { stop_tx, task });
    }

    /// Stop scheduling new cycles. No-op when not running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
            debug!("Poller stopped");
        }
    }

    /// Stop and abandon any in-flight cycle. No-op when not running.
    pub fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Poller aborted");
        }
    }

    /// Whether a schedule is currently active.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    use crate::config::ServiceAccount;
    use crate::error::{FetchError, JobError, TransportError};
    use crate::session::{Session, LOGIN_PATH};
    use crate::testing::{Rendered, RecordingRenderer, ScriptedTransport};

    const INTERVAL: Duration = Duration::from_millis(5000);

    fn healthy_transport() -> Arc<ScriptedTransport> {
        let transport = Arc::new(ScriptedTransport::new());
        transport.always_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.always_json(
            "/api/status",
            StatusCode::OK,
            r#"{"current_temperature":30.0,"alerts":0,"data_points":1,"last_update":"t"}"#,
        );
        transport.always_json("/api/history", StatusCode::OK, "[]");
        transport.always_json("/api/alerts", StatusCode::OK, "[]");
        transport
    }

    fn poller(transport: &Arc<ScriptedTransport>) -> (Poller, Arc<RecordingRenderer>) {
        let session = Arc::new(Session::new(
            transport.clone(),
            ServiceAccount::new("fog_node", "pw"),
        ));
        let fetcher = Arc::new(AuthenticatedFetcher::new(transport.clone(), session));
        let renderer = Arc::new(RecordingRenderer::new());
        (Poller::new(fetcher, renderer.clone()), renderer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_runs_initial_pass_in_order() {
        let transport = healthy_transport();
        let (mut poller, renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;

        let rendered = renderer.rendered();
        assert_eq!(rendered.len(), 3);
        assert!(matches!(rendered[0], Rendered::Status(Ok(_))));
        assert!(matches!(rendered[1], Rendered::Series(Ok(_))));
        assert!(matches!(rendered[2], Rendered::Alerts(Ok(_))));
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeats_every_interval() {
        let transport = healthy_transport();
        let (mut poller, _renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;
        assert_eq!(transport.count("/api/status"), 1);

        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        assert_eq!(transport.count("/api/status"), 2);

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(transport.count("/api/status"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_leaves_single_timer() {
        let transport = healthy_transport();
        let (mut poller, _renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;
        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;
        // One initial pass per start
        assert_eq!(transport.count("/api/status"), 2);

        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        assert_eq!(transport.count("/api/status"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_waits_for_inflight_cycle() {
        let transport = healthy_transport();
        transport.delay("/api/history", Duration::from_secs(3));
        let (mut poller, renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;

        // The first scheduled cycle is now waiting on history
        tokio::time::sleep(Duration::from_millis(5500)).await;
        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;

        assert_eq!(transport.max_in_flight(), 1);
        let rendered = renderer.rendered();
        assert_eq!(rendered.len(), 9);
        assert!(matches!(rendered[5], Rendered::Alerts(Ok(_))));
        assert!(matches!(rendered[6], Rendered::Status(Ok(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_cycle_does_not_overlap() {
        let transport = healthy_transport();
        transport.delay("/api/history", Duration::from_secs(8));
        let (mut poller, _renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(transport.count("/api/status") >= 3);
        assert_eq!(transport.max_in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_lets_inflight_cycle_finish() {
        let transport = healthy_transport();
        transport.delay("/api/history", Duration::from_secs(3));
        let (mut poller, renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;
        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(transport.count("/api/status"), 2);

        poller.stop();
        tokio::time::sleep(INTERVAL * 3).await;

        let rendered = renderer.rendered();
        assert_eq!(rendered.len(), 6);
        assert!(matches!(rendered[4], Rendered::Series(Ok(_))));
        assert!(matches!(rendered[5], Rendered::Alerts(Ok(_))));
        assert_eq!(transport.count("/api/status"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_new_cycles() {
        let transport = healthy_transport();
        let (mut poller, _renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;
        poller.stop();
        poller.stop();
        assert!(!poller.is_running());

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(transport.count("/api/status"), 1);
    }

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let transport = healthy_transport();
        let (mut poller, renderer) = poller(&transport);

        poller.stop();
        poller.abort();
        assert!(!poller.is_running());
        assert!(renderer.rendered().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_does_not_abort_cycle() {
        let transport = healthy_transport();
        transport.push_error("/api/history", TransportError::Connect("refused".into()));
        let (mut poller, renderer) = poller(&transport);

        poller.start(RefreshJob::standard_cycle(20, 5), INTERVAL).await;

        let rendered = renderer.rendered();
        assert_eq!(rendered.len(), 3);
        assert!(matches!(rendered[0], Rendered::Status(Ok(_))));
        assert_eq!(
            rendered[1],
            Rendered::Series(Err(JobError::Fetch(FetchError::Transport(
                TransportError::Connect("refused".into())
            ))))
        );
        assert_eq!(rendered[2], Rendered::Alerts(Ok(vec![])));

        // The next cycle is unaffected
        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        assert_eq!(renderer.rendered()[4], Rendered::Series(Ok(vec![])));
    }
}
