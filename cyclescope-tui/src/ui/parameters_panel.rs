//! Panel 3 — Parameters: per-indicator parameter values for the selected
//! indicators, with sparse overrides marked against descriptor defaults.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = app.parameter_rows();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Parameters: ", theme::muted()),
        Span::styled(format!("{}", rows.len()), theme::accent()),
        Span::styled("  [j/k]move [h/l]adjust (applies after a pause)", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No selected indicators expose parameters.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let mut last_indicator: Option<&str> = None;
    for (i, (indicator_id, param_name)) in rows.iter().enumerate() {
        let Some(descriptor) = app.descriptor(indicator_id) else {
            continue;
        };
        if last_indicator != Some(indicator_id.as_str()) {
            last_indicator = Some(indicator_id.as_str());
            lines.push(Line::from(Span::styled(
                descriptor.name.clone(),
                theme::accent_bold(),
            )));
        }

        let default = descriptor.default_parameters.get(param_name).copied();
        let value = app
            .store
            .parameter_value(descriptor, param_name)
            .or(default)
            .unwrap_or(0.0);
        let overridden = app
            .store
            .overrides()
            .get(indicator_id)
            .is_some_and(|m| m.contains_key(param_name));

        let is_cursor = i == app.parameters.cursor;
        let value_style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else if overridden {
            theme::warning()
        } else {
            theme::text()
        };

        let mut spans = vec![
            Span::styled(format!("  {param_name:<16}"), theme::muted()),
            Span::styled(format!("{value:>10.2}"), value_style),
        ];
        if overridden {
            if let Some(d) = default {
                spans.push(Span::styled(format!("  (default {d:.2})"), theme::muted()));
            }
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), area);
}
