//! Panel 6 — Help: keyboard shortcuts and documentation.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-6", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "r", "Force refresh (bypass service cache)");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Chart");
    key(&mut lines, ", / .", "Shift range start back / forward 90 days");
    key(&mut lines, "< / >", "Shift range end back / forward 90 days");
    key(&mut lines, "[ / ]", "Lower / raise the oversold (in) threshold");
    key(&mut lines, "{ / }", "Lower / raise the overbought (out) threshold");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Indicators");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "Space", "Toggle indicator selection (recomputes)");
    key(&mut lines, "v", "Toggle line visibility (no recompute)");
    key(&mut lines, "a", "Select all, show only the average line");
    key(&mut lines, "d", "Deselect all");
    key(&mut lines, "f / t / o", "Toggle fundamental / technical / overall average lines");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Parameters");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "h / l", "Adjust value (recompute fires after a pause)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 — ROC Table");
    key(&mut lines, "j / k", "Scroll rows");
    key(&mut lines, "+ / -", "Widen / narrow the ROC window by 5 days");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 5 — Presets");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "Enter", "Load the selected preset");
    key(&mut lines, "s", "Save the current configuration as a preset");
    key(&mut lines, "x", "Delete the selected preset");
    lines.push(Line::from(""));

    section(&mut lines, "Notes");
    key(&mut lines, "Scores", "Z-scores, cyan at -2 through magenta at +2");
    key(&mut lines, "Regions", "Contiguous spans where the average breaches a threshold");
    key(&mut lines, "Presets", "Loading a preset always resets lines to the average only");

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
