//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────────────┐
//! │  BoardSentinel   Real-time │ Forensics │ AI Insights  │
//! ├─────────┬─────────┬──────────┬───────────────────────┤
//! │ STABILITY │ RIPPLE │ VRM TEMP │ SYSTEM LOAD           │
//! ├─────────┴─────────┴──────────┼───────────────────────┤
//! │  ╭ VCORE (V)                 │  Thermal gauges       │
//! │  │  ~~~1.218~~~              │  Throttle risk: LOW   │
//! │  ╰─────────────────────────  ├───────────────────────┤
//! ├──────────────────────────────┤  AI diagnostics       │
//! │  [12:00:01] BUS_READ: ...    │                       │
//! ├──────────────────────────────┴───────────────────────┤
//! │  tab: view  a: analyze  g: chart  p: pause  q: quit  │
//! └──────────────────────────────────────────────────────┘

use super::app::{App, View};
use boardsentinel_core::indicators::{
    ThrottleRisk, bus_log_line, clock_time, is_nominal, thermal_gauges, throttle_risk, trends,
};
use boardsentinel_core::{
    ComponentStatus, DiagnosticReport, MIN_ANALYSIS_READINGS, RiskLevel, TelemetryReading,
};
use ratatui::{prelude::*, widgets::*};

/// Number of bus log lines shown on the dashboard.
const BUS_LOG_LINES: usize = 6;

/// Headline cards, left to right.
const STAT_CARDS: [&str; 4] = ["STABILITY", "RIPPLE", "VRM TEMP", "SYSTEM LOAD"];

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(10),   // main
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    match app.view() {
        View::Dashboard => draw_dashboard(f, rows[1], app),
        View::Forensics => draw_forensics(f, rows[1], app),
        View::Analysis => draw_analysis(f, rows[1], app),
    }
    draw_keys(f, rows[2], app);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let spin = if app.is_analyzing() { " ⟳" } else { "" };
    let state = if app.is_paused() { "PAUSED" } else { "LIVE" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(Line::from(vec![
            Span::styled(" BoardSentinel ", Style::default().bold().fg(Color::Blue)),
            Span::styled(
                format!(" #{}  {:.1}s  {state}{spin} ", app.ticks(), app.refresh_rate_secs()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.label())).collect();
    let tabs = Tabs::new(titles)
        .select(app.view().index())
        .highlight_style(Style::default().bold().fg(Color::Yellow))
        .block(block);

    f.render_widget(tabs, area);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8)])
        .split(area);

    draw_stat_cards(f, rows[0], app);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(BUS_LOG_LINES as u16 + 2)])
        .split(cols[0]);

    draw_chart(f, left[0], app);
    draw_bus_log(f, left[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(cols[1]);

    draw_thermals(f, right[0], app);
    draw_ai_panel(f, right[1], app);
}

fn draw_stat_cards(f: &mut Frame, area: Rect, app: &App) {
    draw_stat_cards_for(f, area, app.latest());
}

fn draw_stat_cards_for(f: &mut Frame, area: Rect, latest: Option<&TelemetryReading>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let Some(r) = latest else {
        for (i, title) in STAT_CARDS.iter().enumerate() {
            stat_card(f, cols[i], title, "--".into(), "", Color::DarkGray);
        }
        return;
    };
    let t = trends(r);

    stat_card(
        f,
        cols[0],
        STAT_CARDS[0],
        format!("{}%", r.stability_score),
        t.stability,
        trend_color(t.stability == "stable", Color::Red),
    );
    stat_card(
        f,
        cols[1],
        STAT_CARDS[1],
        format!("{} mV", r.vcore_ripple),
        t.ripple,
        trend_color(t.ripple == "low", Color::Yellow),
    );
    stat_card(
        f,
        cols[2],
        STAT_CARDS[2],
        format!("{} °C", r.vrm_temp),
        t.vrm,
        trend_color(t.vrm == "cool", Color::Yellow),
    );
    stat_card(f, cols[3], STAT_CARDS[3], format!("{}%", r.load), t.load, Color::Blue);
}

fn trend_color(ok: bool, otherwise: Color) -> Color {
    if ok { Color::Green } else { otherwise }
}

fn stat_card(f: &mut Frame, area: Rect, title: &str, value: String, trend: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "));
    let line = Line::from(vec![
        Span::styled(value, Style::default().bold().fg(Color::White)),
        Span::raw("  "),
        Span::styled(trend.to_string(), Style::default().fg(color)),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App) {
    let mode = app.chart_mode();

    if app.history_len() == 0 {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", mode.label()));
        let p = Paragraph::new("Waiting for first bus read...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let values: Vec<f64> = app.history().map(|r| mode.value_from(r)).collect();
    let data: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let latest = values.last().copied().unwrap_or(0.0);
    let min_val = values.iter().copied().fold(f64::MAX, f64::min);
    let max_val = values.iter().copied().fold(f64::MIN, f64::max);
    let (y_min, y_max) = mode.y_bounds(min_val, max_val);

    let datasets = vec![
        Dataset::default()
            .name(format!("{latest}"))
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Blue))
            .data(&data),
    ];

    let x_max = (values.len() as f64).max(10.0);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " {} ({})  {}  [g] ",
            mode.label(),
            mode.y_label(),
            mode.summary()
        )))
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(vec![
            Line::from("0"),
            Line::from(format!("{}", values.len())),
        ]))
        .y_axis(Axis::default().bounds([y_min, y_max]).labels(vec![
            Line::from(format!("{y_min:.2}")),
            Line::from(format!("{y_max:.2}")),
        ]));

    f.render_widget(chart, area);
}

fn draw_bus_log(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .history()
        .rev()
        .take(BUS_LOG_LINES)
        .map(|r| {
            let color = trend_color(is_nominal(r), Color::Yellow);
            Line::from(Span::styled(bus_log_line(r), Style::default().fg(color)))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Terminal Log ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_thermals(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Thermal Distribution ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(r) = app.latest() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(inner);

    for (i, g) in thermal_gauges(r).iter().enumerate() {
        let color = if g.percent >= 80.0 {
            Color::Red
        } else if g.percent >= 60.0 {
            Color::Yellow
        } else {
            Color::Green
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(g.percent / 100.0)
            .label(format!("{}  {}°C", g.label, g.celsius));
        f.render_widget(gauge, rows[i]);
    }

    let risk = throttle_risk(r);
    let color = match risk {
        ThrottleRisk::Low => Color::Green,
        ThrottleRisk::High => Color::Red,
    };
    let line = Line::from(vec![
        Span::raw("Throttling risk: "),
        Span::styled(risk.to_string(), Style::default().bold().fg(color)),
    ]);
    f.render_widget(Paragraph::new(line), rows[3]);
}

fn draw_ai_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" AI Diagnostics ");

    let report = app.report();
    let text = match &report {
        Some(report) => report_lines(report, app, 2),
        None => idle_lines(app),
    };

    let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

// ---------------------------------------------------------------------------
// Forensics
// ---------------------------------------------------------------------------

fn draw_forensics(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .components()
        .iter()
        .map(|c| {
            let color = match c.status {
                ComponentStatus::Optimal => Color::Green,
                ComponentStatus::Warning => Color::Yellow,
                ComponentStatus::Critical => Color::Red,
            };
            Row::new(vec![
                Cell::from(c.id),
                Cell::from(c.name),
                Cell::from(Span::styled(
                    c.status.to_string().to_uppercase(),
                    Style::default().fg(color),
                )),
                Cell::from(c.address),
                Cell::from(c.details),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),  // id
            Constraint::Length(20), // name
            Constraint::Length(9),  // status
            Constraint::Length(6),  // address
            Constraint::Min(20),    // details
        ],
    )
    .header(
        Row::new(vec!["ID", "COMPONENT", "STATUS", "ADDR", "DETAILS"])
            .style(Style::default().bold().fg(Color::Cyan)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Hardware Inventory "),
    );

    f.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

fn draw_analysis(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" AI Insights  {} via {} ", app.model(), app.generator_name());
    let block = Block::default().borders(Borders::ALL).title(title);

    let report = app.report();
    let mut text = match &report {
        Some(report) => report_lines(report, app, usize::MAX),
        None => idle_lines(app),
    };
    if let Some(err) = app.analysis_error() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            format!("Analysis failed: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(path) = app.last_export() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            format!("Snapshot saved to {}", path.display()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

fn report_lines<'a>(report: &'a DiagnosticReport, app: &App, max_recs: usize) -> Vec<Line<'a>> {
    let risk_color = match report.risk_level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    };
    let when = app.report_time().map(clock_time).unwrap_or_default();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Risk: ", Style::default().bold()),
            Span::styled(
                report.risk_level.to_string().to_uppercase(),
                Style::default().bold().fg(risk_color),
            ),
            Span::styled(format!("  {when}"), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(Span::raw(report.summary.as_str())),
        Line::from(""),
    ];
    for rec in report.recommendations.iter().take(max_recs) {
        lines.push(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(Color::Blue)),
            Span::raw(rec.as_str()),
        ]));
    }
    if app.is_analyzing() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Re-analyzing...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn idle_lines(app: &App) -> Vec<Line<'static>> {
    let msg = if app.is_analyzing() {
        "Analyzing telemetry window...".to_string()
    } else if app.history_len() < MIN_ANALYSIS_READINGS {
        format!(
            "Collecting readings ({}/{MIN_ANALYSIS_READINGS})...",
            app.history_len()
        )
    } else {
        "Press 'a' to run a diagnostic analysis".to_string()
    };
    vec![Line::from(Span::styled(
        msg,
        Style::default().fg(Color::DarkGray),
    ))]
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let analyze = if app.analysis_ready() {
        "a: analyze"
    } else {
        "a: (wait)"
    };
    let bar = Paragraph::new(format!(
        " tab/1-3: view   {analyze}   g: chart   p: pause   +/-: rate   s: snapshot   q: quit"
    ))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
