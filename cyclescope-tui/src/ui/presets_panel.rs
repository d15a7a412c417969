//! Panel 5 — Presets: the named-preset store on disk.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Presets: ", theme::muted()),
        Span::styled(format!("{}", app.presets.entries.len()), theme::accent()),
        Span::styled("  [Enter]load [s]ave [x]delete", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if app.presets.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No presets saved. Press s to save the current configuration.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    for (i, name) in app.presets.names().iter().enumerate() {
        let style = if i == app.presets.cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled((*name).to_string(), style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
