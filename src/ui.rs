use ratatui::{prelude::*, widgets::*};

use crate::app::state::ParamField;
use crate::metrics::StatusCategory;

/// Border style for a panel: yellow while editing, cyan when focused
pub fn border_style(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders the parameter rows of the current endpoint
pub fn render_param_list<'a>(
    params: &'a [ParamField],
    selected: Option<usize>,
    is_focused: bool,
    is_editing: bool,
) -> List<'a> {
    let items: Vec<ListItem> = params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if Some(i) == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default()
            };
            let marker = if p.required { "*" } else { " " };
            let value = if p.value.is_empty() {
                Span::styled("<empty>", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(p.value.as_str())
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:6} ", p.location.as_str()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{}{}: ", p.name, marker), style),
                value,
                Span::styled(
                    format!("  ({})", p.param_type.as_str()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(is_focused, is_editing))
            .title(" Params (e:edit R:reset, * required) "),
    )
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Simple JSON syntax highlighting
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut spans = Vec::new();
        let mut current = String::new();
        let mut in_string = false;

        for (i, c) in line.char_indices() {
            match c {
                '"' => {
                    if in_string {
                        current.push(c);
                        // A key is a string directly followed by ':'
                        let is_key = line[i + 1..].trim_start().starts_with(':');
                        let color = if is_key { Color::Cyan } else { Color::Green };
                        spans.push(Span::styled(std::mem::take(&mut current), Style::default().fg(color)));
                        in_string = false;
                    } else {
                        if !current.is_empty() {
                            spans.push(literal_span(std::mem::take(&mut current)));
                        }
                        in_string = true;
                        current.push(c);
                    }
                }
                ':' | ',' if !in_string => {
                    if !current.is_empty() {
                        spans.push(literal_span(std::mem::take(&mut current)));
                    }
                    spans.push(Span::styled(c.to_string(), Style::default().fg(Color::White)));
                }
                '{' | '}' | '[' | ']' if !in_string => {
                    if !current.is_empty() {
                        spans.push(literal_span(std::mem::take(&mut current)));
                    }
                    spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
                }
                _ => current.push(c),
            }
        }

        if !current.is_empty() {
            spans.push(literal_span(current));
        }

        lines.push(Line::from(spans));
    }

    lines
}

fn literal_span(text: String) -> Span<'static> {
    let trimmed = text.trim();
    if matches!(trimmed, "true" | "false" | "null") {
        Span::styled(text, Style::default().fg(Color::Magenta))
    } else if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
        Span::styled(text, Style::default().fg(Color::Yellow))
    } else {
        Span::raw(text)
    }
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match crate::metrics::status_category(code) {
        StatusCategory::Success => Color::Green,
        StatusCategory::Redirect => Color::Cyan,
        StatusCategory::ClientError => Color::Red,
        StatusCategory::ServerError => Color::Magenta,
        StatusCategory::Unknown => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        _ => Color::White,
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_json_colors_keys_and_literals() {
        let lines = highlight_json("{\n  \"ok\": true,\n  \"count\": 12\n}");
        assert_eq!(lines.len(), 4);

        let key = &lines[1].spans[1];
        assert_eq!(key.content, "\"ok\"");
        assert_eq!(key.style.fg, Some(Color::Cyan));

        let flag = lines[1].spans.iter().find(|s| s.content.trim() == "true").unwrap();
        assert_eq!(flag.style.fg, Some(Color::Magenta));
        let count = lines[2].spans.iter().find(|s| s.content.trim() == "12").unwrap();
        assert_eq!(count.style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_status_color_by_class() {
        assert_eq!(status_color(204), Color::Green);
        assert_eq!(status_color(429), Color::Red);
        assert_eq!(status_color(503), Color::Magenta);
        assert_eq!(status_color(0), Color::Yellow);
    }
}
