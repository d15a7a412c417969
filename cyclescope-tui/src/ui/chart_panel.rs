//! Panel 1 — Chart: score lines over time, threshold levels, price
//! reference, and the detected oversold/overbought regions.
//!
//! Score lines share one z-score axis; the price series is normalized into
//! the same bounds so cycle structure stays readable next to the scores.
//! Each line takes the gradient color of its latest score.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use cyclescope_core::domain::{
    FUNDAMENTAL_AVERAGE, OVERALL_AVERAGE, TECHNICAL_AVERAGE,
};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    if app.series.is_empty() {
        render_empty(f, area, app.loading);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(5)])
        .split(area);

    render_chart(f, chunks[0], app);
    render_regions(f, chunks[1], app);
}

fn render_empty(f: &mut Frame, area: Rect, loading: bool) {
    let msg = if loading {
        "Computing scores..."
    } else {
        "No data yet. Press 2 to select indicators, r to refresh."
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(msg, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Series keys to draw: visible individual indicators plus whichever
/// average lines are switched on.
fn line_keys(app: &AppState) -> Vec<String> {
    let store = &app.store;
    let mut keys: Vec<String> = store
        .visible()
        .iter()
        .filter(|id| {
            ![FUNDAMENTAL_AVERAGE, TECHNICAL_AVERAGE, OVERALL_AVERAGE].contains(&id.as_str())
        })
        .cloned()
        .collect();
    keys.sort();
    if store.show_fundamental_average() {
        keys.push(FUNDAMENTAL_AVERAGE.to_string());
    }
    if store.show_technical_average() {
        keys.push(TECHNICAL_AVERAGE.to_string());
    }
    if store.show_overall_average() {
        keys.push(OVERALL_AVERAGE.to_string());
    }
    keys
}

fn render_chart(f: &mut Frame, area: Rect, app: &AppState) {
    let thresholds = app.store.thresholds();
    let keys = line_keys(app);

    // Collect (label, color, points) per line; points are (index, score)
    // with missing/NaN samples skipped.
    let mut series: Vec<(String, ratatui::style::Color, Vec<(f64, f64)>)> = Vec::new();
    for key in &keys {
        let points: Vec<(f64, f64)> = app
            .series
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.score(key).map(|s| (i as f64, s)))
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = theme::score_color(points.last().map(|(_, s)| *s).unwrap_or(0.0));
        series.push((label_for(app, key), color, points));
    }

    let mut y_min = thresholds.sdca_in.min(-2.0);
    let mut y_max = thresholds.sdca_out.max(2.0);
    for (_, _, points) in &series {
        for (_, y) in points {
            y_min = y_min.min(*y);
            y_max = y_max.max(*y);
        }
    }
    y_min -= 0.3;
    y_max += 0.3;

    let x_max = app.series.len().saturating_sub(1) as f64;

    // Price normalized into the score bounds, as a muted reference line.
    let price_points = normalized_price(app, y_min, y_max);

    // Threshold levels drawn as flat datasets.
    let in_line = vec![(0.0, thresholds.sdca_in), (x_max, thresholds.sdca_in)];
    let out_line = vec![(0.0, thresholds.sdca_out), (x_max, thresholds.sdca_out)];

    let mut datasets: Vec<Dataset> = Vec::new();
    datasets.push(
        Dataset::default()
            .name("price")
            .marker(symbols::Marker::Dot)
            .style(theme::muted())
            .graph_type(GraphType::Line)
            .data(&price_points),
    );
    datasets.push(
        Dataset::default()
            .name(format!("in {:.1}", thresholds.sdca_in))
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(theme::OVERSOLD))
            .graph_type(GraphType::Line)
            .data(&in_line),
    );
    datasets.push(
        Dataset::default()
            .name(format!("out {:.1}", thresholds.sdca_out))
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(theme::OVERBOUGHT))
            .graph_type(GraphType::Line)
            .data(&out_line),
    );
    for (label, color, points) in &series {
        datasets.push(
            Dataset::default()
                .name(label.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(*color))
                .graph_type(GraphType::Line)
                .data(points),
        );
    }

    let first_date = app.series.first().map(|p| p.date.to_string()).unwrap_or_default();
    let last_date = app.series.last().map(|p| p.date.to_string()).unwrap_or_default();

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first_date, theme::muted()),
                    Span::styled(last_date, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("z-score", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.1}"), theme::muted()),
                    Span::styled("0", theme::muted()),
                    Span::styled(format!("{y_max:.1}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn normalized_price(app: &AppState, y_min: f64, y_max: f64) -> Vec<(f64, f64)> {
    let p_min = app.series.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let p_max = app
        .series
        .iter()
        .map(|p| p.price)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = (p_max - p_min).max(f64::EPSILON);
    app.series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let t = (p.price - p_min) / span;
            (i as f64, y_min + t * (y_max - y_min))
        })
        .collect()
}

fn label_for(app: &AppState, key: &str) -> String {
    match key {
        FUNDAMENTAL_AVERAGE => "Fund Avg".to_string(),
        TECHNICAL_AVERAGE => "Tech Avg".to_string(),
        OVERALL_AVERAGE => "Average".to_string(),
        _ => app
            .descriptor(key)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| key.to_string()),
    }
}

/// Most recent detected regions, newest last, colored by kind.
fn render_regions(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("Regions: ", theme::muted()),
        Span::styled(format!("{}", app.regions.len()), theme::accent()),
        Span::styled(
            "  [,/.]start [</>]end [[/]]in [{/}]out",
            theme::muted(),
        ),
    ]));

    let show = (area.height as usize).saturating_sub(1);
    let start = app.regions.len().saturating_sub(show);
    for region in &app.regions[start..] {
        let color = theme::region_color(region.kind);
        lines.push(Line::from(vec![
            Span::styled("▐ ", Style::default().fg(color)),
            Span::styled(
                format!("{} → {}", region.start, region.end),
                theme::text(),
            ),
            Span::styled(format!("  {:?}", region.kind), Style::default().fg(color)),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
