//! Panel 4 — ROC table: rate-of-change rows in display order, score cells
//! colored by the gradient.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use cyclescope_core::table::RowCategory;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("ROC window: ", theme::muted()),
        Span::styled(format!("{} days", app.store.roc_days()), theme::accent()),
        Span::styled("  [+/-]window [j/k]scroll", theme::muted()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<24}", "Indicator"), theme::muted()),
        Span::styled(format!("{:>8}", "Score"), theme::muted()),
        Span::styled(format!("{:>9}", "Δ"), theme::muted()),
        Span::styled(format!("{:>9}", "Δ%"), theme::muted()),
    ]));

    if app.rows.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No computed rows yet.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let visible_height = (area.height as usize).saturating_sub(lines.len());
    let start = app.table.scroll.min(app.rows.len().saturating_sub(1));
    let end = (start + visible_height).min(app.rows.len());

    let mut last_category: Option<RowCategory> = None;
    for (i, row) in app.rows[start..end].iter().enumerate() {
        let absolute = start + i;
        if last_category != Some(row.category) {
            last_category = Some(row.category);
            let header = match row.category {
                RowCategory::Fundamental => "Fundamental",
                RowCategory::Technical => "Technical",
                RowCategory::Average => "Averages",
            };
            lines.push(Line::from(Span::styled(header, theme::accent_bold())));
        }

        let score_style = Style::default().fg(theme::score_color(row.current_score));
        let delta_style = if row.delta < 0.0 {
            theme::negative()
        } else {
            theme::accent()
        };
        let label_style = if absolute == app.table.scroll {
            theme::text().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", truncate(&row.label, 24)), label_style),
            Span::styled(format!("{:>8.2}", row.current_score), score_style),
            Span::styled(format!("{:>+9.3}", row.delta), delta_style),
            Span::styled(format!("{:>+8.1}%", row.delta_percent), delta_style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
