//! Rendering of the dashboard to a terminal or as JSON

use std::fmt::Write as _;
use std::io::Write;

use crate::Result;
use crate::dashboard::{Dashboard, LocationPanel, PanelState};
use crate::report::QualityChart;

const BAR_WIDTH: usize = 20;

/// Output side of the refresh pipeline
pub trait Presenter: Send {
    fn present(&mut self, dashboard: &Dashboard) -> Result<()>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, dashboard: &Dashboard) -> Result<()> {
        (**self).present(dashboard)
    }
}

/// Human-readable summary and ASCII chart per location
#[derive(Debug)]
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Presenter for TextPresenter<W> {
    fn present(&mut self, dashboard: &Dashboard) -> Result<()> {
        self.out.write_all(render_text(dashboard).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Serialized dashboard, one JSON document per refresh
#[derive(Debug)]
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Presenter for JsonPresenter<W> {
    fn present(&mut self, dashboard: &Dashboard) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, dashboard)
            .map_err(|e| crate::WindcastError::Io { source: e.into() })?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Full text rendering of every panel
#[must_use]
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let title = format!(
        "Wind forecast for {}",
        dashboard.selected_date().format("%d/%m/%Y")
    );
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));

    for panel in dashboard.panels() {
        out.push('\n');
        render_panel(&mut out, panel);
    }
    out
}

fn render_panel(out: &mut String, panel: &LocationPanel) {
    let _ = writeln!(out, "[{}] {}", panel.summary_target, panel.name);

    match &panel.state {
        PanelState::Idle => {
            let _ = writeln!(out, "  Waiting for the first refresh...");
        }
        PanelState::Loading { date } => {
            let _ = writeln!(out, "  Fetching forecast for {}...", date.format("%d/%m/%Y"));
        }
        PanelState::Error { message, .. } => {
            let _ = writeln!(out, "  ! {message}");
        }
        PanelState::Ready { current, .. } => {
            let _ = writeln!(out, "  Forecast for {}h", current.hour_label);
            let _ = writeln!(
                out,
                "  Score {:.1}/10 ({})   Wind {}   Speed {} km/h",
                current.score, current.rating, current.cardinal, current.speed_kmh
            );
            let _ = writeln!(
                out,
                "  Current {}° ({})   Ideal {}° ({})",
                current.bearing, current.cardinal, current.desired_bearing, current.desired_cardinal
            );
        }
    }

    if let Some(chart) = panel.chart() {
        let _ = writeln!(out, "[{}] {}", panel.chart_target, chart.title);
        render_chart(out, chart);
    }
}

fn render_chart(out: &mut String, chart: &QualityChart) {
    if chart.points.is_empty() {
        let _ = writeln!(out, "  (no hourly data)");
        return;
    }
    for point in &chart.points {
        let _ = writeln!(
            out,
            "  {} |{}| {:>4.1}  {:<2} {:>3} km/h",
            point.hour_label,
            score_bar(point.score),
            point.score,
            point.cardinal.label(),
            point.speed_kmh
        );
    }
    let _ = writeln!(out, "  Ideal direction: {}°", chart.desired_bearing);
}

/// Fixed-width bar, two cells per score point
fn score_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 10.0) / 10.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
