//! Refresh pipeline and its triggers
//!
//! `refresh_all` fetches every location for the selected date and updates
//! the dashboard; a failure at one location is logged and shown on that
//! location's panel only. `RefreshLoop` feeds it from two triggers, the
//! periodic timer and date changes, on a single task so that refreshes
//! never overlap.

use std::future::Future;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::Result;
use crate::api::ForecastClient;
use crate::dashboard::Dashboard;
use crate::date_window::local_now;
use crate::models::Location;
use crate::presenter::Presenter;
use crate::report::LocationReport;

/// Outcome counts of one refresh cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Fetch and score one location
pub async fn refresh_location<C: ForecastClient + ?Sized>(
    client: &C,
    location: &Location,
    date: NaiveDate,
    reference_now: NaiveDateTime,
) -> Result<LocationReport> {
    info!(
        "Fetching forecast for {} on {}",
        location.name,
        date.format("%d/%m/%Y")
    );
    let series = client.fetch_hourly(location, date).await?;
    LocationReport::build(location, &series, date, reference_now)
}

/// Refresh every location for the dashboard's selected date.
///
/// Requests are issued in table order and awaited together, so their
/// latencies overlap. Each panel is replaced with its own outcome.
#[instrument(skip_all, fields(date = %dashboard.selected_date()))]
pub async fn refresh_all<C: ForecastClient + ?Sized>(
    client: &C,
    locations: &[Location],
    dashboard: &mut Dashboard,
    reference_now: NaiveDateTime,
) -> RefreshSummary {
    let date = dashboard.selected_date();
    for location in locations {
        if let Some(panel) = dashboard.panel_mut(&location.id) {
            panel.mark_loading(date);
        }
    }

    let outcomes = join_all(locations.iter().map(|location| async move {
        let outcome = refresh_location(client, location, date, reference_now).await;
        (location, outcome)
    }))
    .await;

    let mut summary = RefreshSummary::default();
    for (location, outcome) in outcomes {
        match &outcome {
            Ok(report) => {
                summary.succeeded += 1;
                debug!(
                    "{}: score {} at {}",
                    location.id, report.current.score, report.current.hour_label
                );
            }
            Err(e) => {
                summary.failed += 1;
                error!("Failed to fetch wind data for {}: {}", location.name, e);
            }
        }

        match dashboard.panel_mut(&location.id) {
            Some(panel) => panel.apply(date, outcome),
            None => warn!("No panel registered for location {}", location.id),
        }
    }

    info!(
        "Refresh finished: {} ok, {} failed",
        summary.succeeded, summary.failed
    );
    summary
}

/// Drain queued date changes, keeping only the most recent one
fn latest_date(first: NaiveDate, dates: &mut mpsc::Receiver<NaiveDate>) -> NaiveDate {
    let mut latest = first;
    while let Ok(date) = dates.try_recv() {
        debug!("Coalescing queued date change {} into {}", latest, date);
        latest = date;
    }
    latest
}

/// Owns the dashboard and serializes every refresh
pub struct RefreshLoop<C, P> {
    client: C,
    presenter: P,
    locations: Vec<Location>,
    dashboard: Dashboard,
    timezone: Tz,
    interval: Duration,
}

impl<C, P> RefreshLoop<C, P>
where
    C: ForecastClient,
    P: Presenter,
{
    pub fn new(
        client: C,
        presenter: P,
        locations: Vec<Location>,
        selected_date: NaiveDate,
        timezone: Tz,
        interval: Duration,
    ) -> Self {
        let dashboard = Dashboard::new(&locations, selected_date);
        Self {
            client,
            presenter,
            locations,
            dashboard,
            timezone,
            interval,
        }
    }

    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Refresh all locations once and render the result
    pub async fn refresh_once(&mut self) -> Result<RefreshSummary> {
        let now = local_now(self.timezone);
        let summary = refresh_all(&self.client, &self.locations, &mut self.dashboard, now).await;
        self.presenter.present(&self.dashboard)?;
        Ok(summary)
    }

    /// Keep the selected date from falling behind today after midnight
    fn roll_forward(&mut self) {
        let today = local_now(self.timezone).date();
        if self.dashboard.selected_date() < today {
            info!(
                "Selected date {} has passed, switching to {}",
                self.dashboard.selected_date(),
                today
            );
            self.dashboard.set_selected_date(today);
        }
    }

    /// Run until `shutdown` resolves.
    ///
    /// The first timer tick fires immediately. A refresh always runs to
    /// completion before the next trigger is looked at; missed ticks are
    /// skipped and queued date changes collapse into the latest one. A
    /// closed date channel leaves the timer running.
    pub async fn run(
        mut self,
        mut dates: mpsc::Receiver<NaiveDate>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<Self> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut dates_open = true;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("Shutting down refresh loop");
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Periodic refresh");
                    self.roll_forward();
                }
                received = dates.recv(), if dates_open => match received {
                    Some(date) => {
                        let date = latest_date(date, &mut dates);
                        info!("Selected date changed to {}", date);
                        self.dashboard.set_selected_date(date);
                    }
                    None => {
                        debug!("Date input closed, continuing with periodic refreshes");
                        dates_open = false;
                        continue;
                    }
                },
            }

            if let Err(e) = self.refresh_once().await {
                error!("Failed to render dashboard: {}", e);
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WindcastError;
    use crate::dashboard::PanelState;
    use crate::models::{HourlySample, HourlySeries, default_locations};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Serves a full day for every location except the ones listed as failing
    struct StubClient {
        failing: Vec<&'static str>,
        calls: Mutex<Vec<(String, NaiveDate)>>,
    }

    impl StubClient {
        fn new(failing: Vec<&'static str>) -> Self {
            Self {
                failing,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ForecastClient for StubClient {
        async fn fetch_hourly(&self, location: &Location, date: NaiveDate) -> Result<HourlySeries> {
            self.calls.lock().unwrap().push((location.id.clone(), date));
            if self.failing.contains(&location.id.as_str()) {
                return Err(WindcastError::api("HTTP error: 503 Service Unavailable"));
            }
            let samples = (0..24)
                .map(|h| {
                    HourlySample::new(
                        date.and_hms_opt(h, 0, 0).unwrap(),
                        Some(12.0),
                        Some(location.desired_bearing),
                    )
                })
                .collect();
            Ok(HourlySeries::new(&location.id, date, samples))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPresenter {
        dates: Arc<Mutex<Vec<NaiveDate>>>,
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, dashboard: &Dashboard) -> Result<()> {
            self.dates.lock().unwrap().push(dashboard.selected_date());
            Ok(())
        }
    }

    /// Fails its first render, records every attempt
    #[derive(Clone, Default)]
    struct FlakyPresenter {
        attempts: Arc<Mutex<usize>>,
    }

    impl Presenter for FlakyPresenter {
        fn present(&mut self, _dashboard: &Dashboard) -> Result<()> {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            if *attempts == 1 {
                return Err(WindcastError::Io {
                    source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
                });
            }
            Ok(())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_all_success() {
        let client = StubClient::new(Vec::new());
        let locations = default_locations();
        let mut dashboard = Dashboard::new(&locations, date());

        let summary = refresh_all(&client, &locations, &mut dashboard, now()).await;
        assert_eq!(summary, RefreshSummary { succeeded: 2, failed: 0 });

        for panel in dashboard.panels() {
            match &panel.state {
                PanelState::Ready { current, .. } => {
                    assert_eq!(current.score, 10.0);
                    assert_eq!(current.hour_label, "00:00");
                }
                other => panic!("unexpected state {other:?}"),
            }
            assert_eq!(panel.chart().unwrap().points.len(), 24);
        }
        assert_eq!(client.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_one_failing_location_does_not_block_the_other() {
        let client = StubClient::new(vec!["itacoatiara"]);
        let locations = default_locations();
        let mut dashboard = Dashboard::new(&locations, date());

        let summary = refresh_all(&client, &locations, &mut dashboard, now()).await;
        assert_eq!(summary, RefreshSummary { succeeded: 1, failed: 1 });

        let failed = dashboard.panel("itacoatiara").unwrap();
        assert!(matches!(failed.state, PanelState::Error { .. }));
        assert!(failed.chart().is_none());

        let ok = dashboard.panel("itaipu").unwrap();
        assert!(matches!(ok.state, PanelState::Ready { .. }));
        assert!(ok.chart().is_some());
    }

    #[tokio::test]
    async fn test_chart_replaced_on_each_refresh() {
        let client = StubClient::new(Vec::new());
        let locations = default_locations();
        let mut dashboard = Dashboard::new(&locations, date());

        refresh_all(&client, &locations, &mut dashboard, now()).await;
        refresh_all(&client, &locations, &mut dashboard, now()).await;
        assert_eq!(dashboard.panel("itaipu").unwrap().chart_generation(), 2);
    }

    #[test]
    fn test_latest_date_coalesces() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.try_send(date().succ_opt().unwrap()).unwrap();
        tx.try_send(date().succ_opt().unwrap().succ_opt().unwrap()).unwrap();
        let latest = latest_date(date(), &mut rx);
        assert_eq!(latest, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    #[tokio::test]
    async fn test_run_serializes_tick_and_date_changes() {
        let presenter = RecordingPresenter::default();
        let rendered = presenter.dates.clone();
        let today = local_now(chrono_tz::America::Sao_Paulo).date();
        let later = today.succ_opt().unwrap().succ_opt().unwrap();

        let refresh_loop = RefreshLoop::new(
            StubClient::new(Vec::new()),
            presenter,
            default_locations(),
            today,
            chrono_tz::America::Sao_Paulo,
            Duration::from_secs(3600),
        );

        let (tx, rx) = mpsc::channel(8);
        // Three queued changes collapse into the last one
        tx.send(today.succ_opt().unwrap()).await.unwrap();
        tx.send(today).await.unwrap();
        tx.send(later).await.unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(refresh_loop.run(rx, async move {
            let _ = stop_rx.await;
        }));

        for _ in 0..200 {
            if rendered.lock().unwrap().len() >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        stop_tx.send(()).unwrap();
        let finished = handle.await.unwrap().unwrap();
        drop(tx);

        assert_eq!(*rendered.lock().unwrap(), vec![today, later]);
        assert_eq!(finished.dashboard().selected_date(), later);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_keeps_ticking_through_failures() {
        let presenter = FlakyPresenter::default();
        let attempts = presenter.attempts.clone();
        let interval = Duration::from_secs(900);
        let today = local_now(chrono_tz::America::Sao_Paulo).date();

        let refresh_loop = RefreshLoop::new(
            StubClient::new(vec!["itacoatiara", "itaipu"]),
            presenter,
            default_locations(),
            today,
            chrono_tz::America::Sao_Paulo,
            interval,
        );

        let (_tx, rx) = mpsc::channel(8);
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(refresh_loop.run(rx, async move {
            let _ = stop_rx.await;
        }));

        // Ticks at 0, 900 and 1800 seconds
        tokio::time::sleep(interval * 2 + Duration::from_secs(1)).await;
        stop_tx.send(()).unwrap();
        let finished = handle.await.unwrap().unwrap();

        assert!(*attempts.lock().unwrap() >= 3);
        assert!(finished.client.calls.lock().unwrap().len() >= 6);
        for panel in finished.dashboard().panels() {
            assert!(matches!(panel.state, PanelState::Error { .. }));
            assert!(panel.chart().is_none());
        }
    }
}
