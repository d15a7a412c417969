//! Panel 2 — Indicators: selection and visibility per indicator, grouped
//! by category, plus the three average-line switches.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use cyclescope_core::domain::IndicatorCategory;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    let selected_count = app.store.selected().len();
    lines.push(Line::from(vec![
        Span::styled("Selected: ", theme::muted()),
        Span::styled(
            format!("{selected_count}/{}", app.descriptors.len()),
            theme::accent(),
        ),
        Span::styled(
            "  [Space]select [v]isible [a]ll [d]eselect",
            theme::muted(),
        ),
    ]));
    lines.push(average_flags_line(app));
    lines.push(Line::from(""));

    if app.descriptors.is_empty() {
        lines.push(Line::from(Span::styled(
            "Waiting for indicator descriptors...",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let mut last_category: Option<IndicatorCategory> = None;
    for (i, descriptor) in app.descriptors.iter().enumerate() {
        if last_category != Some(descriptor.category) {
            last_category = Some(descriptor.category);
            let header = match descriptor.category {
                IndicatorCategory::Fundamental => "Fundamental",
                IndicatorCategory::Technical => "Technical",
            };
            lines.push(Line::from(Span::styled(header, theme::accent_bold())));
        }

        let is_cursor = i == app.indicators.cursor;
        let is_selected = app.store.is_selected(&descriptor.id);
        let is_visible = app.store.is_visible(&descriptor.id);

        let check = if is_selected { "[x]" } else { "[ ]" };
        let dot = if is_visible { " ●" } else { " ○" };

        let name_style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else if is_selected {
            theme::accent()
        } else {
            theme::muted()
        };
        let dot_style = if is_visible {
            theme::accent()
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(check),
            Span::raw(" "),
            Span::styled(descriptor.name.as_str(), name_style),
            Span::styled(dot, dot_style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn average_flags_line(app: &AppState) -> Line<'static> {
    let flag = |on: bool, label: &str| {
        let mark = if on { "✓" } else { "✗" };
        let style = if on { theme::accent() } else { theme::muted() };
        Span::styled(format!("[{mark}] {label}  "), style)
    };
    Line::from(vec![
        Span::styled("Averages: ", theme::muted()),
        flag(app.store.show_fundamental_average(), "[f]undamental"),
        flag(app.store.show_technical_average(), "[t]echnical"),
        flag(app.store.show_overall_average(), "[o]verall"),
    ])
}
