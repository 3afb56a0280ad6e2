//! TUI application state and event loop.
//!
//! Design: the event loop is the ticker. Every refresh interval it ticks the
//! telemetry feed, which appends to the rolling history. Analysis runs on a
//! background thread so the UI never blocks on the remote call; only one
//! analysis may be in flight at a time.

use std::io;
use std::path::PathBuf;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;

use boardsentinel_core::telemetry::now_millis;
use boardsentinel_core::{
    DiagnosticReport, DiagnosticReporter, HardwareComponent, MIN_ANALYSIS_READINGS,
    TelemetryFeed, TelemetryReading, list_components,
};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Which tab is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Forensics,
    Analysis,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Forensics, View::Analysis];

    pub fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Forensics,
            Self::Forensics => Self::Analysis,
            Self::Analysis => Self::Dashboard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Real-time",
            Self::Forensics => "Forensics",
            Self::Analysis => "AI Insights",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::Forensics => 1,
            Self::Analysis => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// ChartMode
// ---------------------------------------------------------------------------

/// What the dashboard chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMode {
    #[default]
    Vcore,
    Ripple,
    VrmTemp,
    Stability,
}

impl ChartMode {
    pub fn next(self) -> Self {
        match self {
            Self::Vcore => Self::Ripple,
            Self::Ripple => Self::VrmTemp,
            Self::VrmTemp => Self::Stability,
            Self::Stability => Self::Vcore,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vcore => "VCORE",
            Self::Ripple => "RIPPLE",
            Self::VrmTemp => "VRM TEMP",
            Self::Stability => "STABILITY",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Self::Vcore => "V",
            Self::Ripple => "mV",
            Self::VrmTemp => "°C",
            Self::Stability => "%",
        }
    }

    /// Short one-line summary for the chart title bar.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Vcore => "VCore rail variance",
            Self::Ripple => "Residual ripple on the core rail",
            Self::VrmTemp => "VRM phase array temperature",
            Self::Stability => "Composite stability score",
        }
    }

    pub fn value_from(self, r: &TelemetryReading) -> f64 {
        match self {
            Self::Vcore => r.vcore,
            Self::Ripple => r.vcore_ripple,
            Self::VrmTemp => r.vrm_temp,
            Self::Stability => f64::from(r.stability_score),
        }
    }

    /// Y axis bounds for this chart mode.
    pub fn y_bounds(self, min_val: f64, max_val: f64) -> (f64, f64) {
        match self {
            Self::Vcore => (min_val - 0.1, max_val + 0.1),
            Self::Ripple => (0.0, (max_val * 1.2).max(5.0)),
            Self::VrmTemp => ((min_val - 5.0).max(0.0), max_val + 5.0),
            Self::Stability => ((min_val - 5.0).max(0.0), 100.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis state
// ---------------------------------------------------------------------------

/// Latest report plus the in-flight marker, shared with the worker thread.
#[derive(Debug, Default)]
struct AnalysisState {
    report: Option<DiagnosticReport>,
    /// Wall-clock time the report arrived.
    finished_at: Option<u64>,
    /// Error that prevented analysis entirely (not remote failures).
    error: Option<String>,
}

/// Whether a new analysis may start.
pub fn can_analyze(readings: usize, in_flight: bool) -> bool {
    readings >= MIN_ANALYSIS_READINGS && !in_flight
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    feed: TelemetryFeed,
    components: &'static [HardwareComponent],
    reporter: Arc<DiagnosticReporter>,
    runtime: Arc<Runtime>,
    refresh_rate: Duration,
    running: bool,
    paused: bool,
    view: View,
    chart_mode: ChartMode,
    analysis: Arc<Mutex<AnalysisState>>,
    analyzing: Arc<AtomicBool>,
    last_export: Option<PathBuf>,
}

impl App {
    pub fn new(
        feed: TelemetryFeed,
        reporter: DiagnosticReporter,
        runtime: Runtime,
        refresh: Duration,
    ) -> Self {
        Self {
            feed,
            components: list_components(),
            reporter: Arc::new(reporter),
            runtime: Arc::new(runtime),
            refresh_rate: refresh,
            running: true,
            paused: false,
            view: View::default(),
            chart_mode: ChartMode::default(),
            analysis: Arc::new(Mutex::new(AnalysisState::default())),
            analyzing: Arc::new(AtomicBool::new(false)),
            last_export: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal before a panic message is printed.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        if let Some(path) = &self.last_export {
            println!("Last snapshot saved to {}", path.display());
        }

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        self.feed.tick();
        let mut last_tick = Instant::now();

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if last_tick.elapsed() >= self.refresh_rate {
                if !self.paused {
                    self.feed.tick();
                }
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::Char('1') => self.view = View::Dashboard,
            KeyCode::Char('2') => self.view = View::Forensics,
            KeyCode::Char('3') => self.view = View::Analysis,
            KeyCode::Char('a') | KeyCode::Enter => self.kick_analysis(),
            KeyCode::Char('g') => self.chart_mode = self.chart_mode.next(),
            KeyCode::Char('p') => self.paused = !self.paused,
            KeyCode::Char('s') => self.export_snapshot(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                let secs = (self.refresh_rate.as_secs_f64() / 2.0).max(0.1);
                self.refresh_rate = Duration::from_secs_f64(secs);
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                let secs = (self.refresh_rate.as_secs_f64() * 2.0).min(10.0);
                self.refresh_rate = Duration::from_secs_f64(secs);
            }
            _ => {}
        }
    }

    /// Start a background analysis of the current history, unless one is
    /// already running or there are too few readings.
    fn kick_analysis(&mut self) {
        if !can_analyze(self.feed.history().len(), self.is_analyzing()) {
            return;
        }
        let snapshot = self.feed.history().snapshot();
        let reporter = Arc::clone(&self.reporter);
        let runtime = Arc::clone(&self.runtime);
        let shared = Arc::clone(&self.analysis);
        let flag = Arc::clone(&self.analyzing);

        flag.store(true, Ordering::Relaxed);

        thread::spawn(move || {
            let result = runtime.block_on(reporter.analyze(&snapshot));
            if let Ok(mut s) = shared.lock() {
                match result {
                    Ok(report) => {
                        s.report = Some(report);
                        s.error = None;
                    }
                    Err(e) => s.error = Some(e.to_string()),
                }
                s.finished_at = Some(now_millis());
            }
            flag.store(false, Ordering::Relaxed);
        });

        self.view = View::Analysis;
    }

    fn export_snapshot(&mut self) {
        let report = self.report();
        let json = serde_json::json!({
            "version": boardsentinel_core::VERSION,
            "ticks": self.feed.ticks(),
            "history": self.feed.history().snapshot(),
            "components": self.components,
            "report": report,
        });

        let path = PathBuf::from(format!("boardsentinel-snapshot-{}.json", now_millis() / 1000));
        if let Ok(contents) = serde_json::to_string_pretty(&json) {
            if std::fs::write(&path, contents).is_ok() {
                self.last_export = Some(path);
            }
        }
    }

    // --- Accessors used by the renderer ---

    pub fn view(&self) -> View {
        self.view
    }

    pub fn chart_mode(&self) -> ChartMode {
        self.chart_mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn refresh_rate_secs(&self) -> f64 {
        self.refresh_rate.as_secs_f64()
    }

    pub fn ticks(&self) -> u64 {
        self.feed.ticks()
    }

    pub fn latest(&self) -> Option<&TelemetryReading> {
        self.feed.latest()
    }

    pub fn history(
        &self,
    ) -> impl DoubleEndedIterator<Item = &TelemetryReading> + ExactSizeIterator {
        self.feed.history().iter()
    }

    pub fn history_len(&self) -> usize {
        self.feed.history().len()
    }

    pub fn components(&self) -> &[HardwareComponent] {
        self.components
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Relaxed)
    }

    pub fn analysis_ready(&self) -> bool {
        can_analyze(self.history_len(), self.is_analyzing())
    }

    pub fn report(&self) -> Option<DiagnosticReport> {
        self.analysis.lock().ok().and_then(|s| s.report.clone())
    }

    pub fn analysis_error(&self) -> Option<String> {
        self.analysis.lock().ok().and_then(|s| s.error.clone())
    }

    pub fn report_time(&self) -> Option<u64> {
        self.analysis.lock().ok().and_then(|s| s.finished_at)
    }

    pub fn model(&self) -> &str {
        self.reporter.model()
    }

    pub fn generator_name(&self) -> &'static str {
        self.reporter.generator_name()
    }

    pub fn last_export(&self) -> Option<&PathBuf> {
        self.last_export.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
