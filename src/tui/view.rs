use crate::models::chat::{ Message, Role };
use crate::render;
use crate::tui::state::ChatState;

use ratatui::Frame;
use ratatui::layout::{ Constraint, Direction, Layout, Position, Rect };
use ratatui::style::{ Color, Modifier, Style };
use ratatui::text::{ Line, Span };
use ratatui::widgets::{ Block, Borders, Paragraph, Wrap };

pub fn render(f: &mut Frame, state: &ChatState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3), // message list
            Constraint::Length(3), // composer
            Constraint::Length(1), // example chips / hints
        ])
        .split(f.area());

    render_messages(f, chunks[0], state);
    render_composer(f, chunks[1], state);
    render_footer(f, chunks[2], state);
}

fn role_header(msg: &Message, assistant_name: &str) -> Line<'static> {
    let (label, color) = match msg.role {
        Role::User => ("You".to_string(), Color::Green),
        Role::Assistant => (assistant_name.to_string(), Color::Cyan),
        Role::SystemError => ("System Error".to_string(), Color::Red),
    };
    Line::from(vec![
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", msg.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Flatten one message into its display lines. Assistant answer text is
/// the only text that goes through the markdown-lite transform; user and
/// error text is rendered literally.
fn message_lines(msg: &Message, assistant_name: &str) -> Vec<Line<'static>> {
    let mut lines = vec![role_header(msg, assistant_name)];
    if msg.loading {
        lines.push(Line::styled("· · ·", Style::default().fg(Color::DarkGray)));
    } else {
        match msg.role {
            Role::Assistant => lines.extend(render::markdown_lite(&msg.text)),
            Role::User | Role::SystemError => lines.extend(render::plain_lines(&msg.text)),
        }
        if let Some(forecast) = &msg.forecast {
            lines.push(Line::raw(""));
            lines.extend(render::forecast_lines(forecast));
        }
        if !msg.sources.is_empty() {
            lines.push(Line::raw(""));
            lines.extend(render::source_lines(&msg.sources));
        }
    }
    lines.push(Line::raw(""));
    lines
}

fn render_messages(f: &mut Frame, area: Rect, state: &ChatState) {
    let mut lines: Vec<Line> = Vec::new();
    for msg in state.messages() {
        lines.extend(message_lines(msg, &state.assistant_name));
    }

    let inner_height = area.height.saturating_sub(2);
    let total = lines.len() as u16;
    let bottom = total.saturating_sub(inner_height);
    let scroll = bottom.saturating_sub(state.scroll_from_bottom().min(bottom));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Chat "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(widget, area);
}

fn render_composer(f: &mut Frame, area: Rect, state: &ChatState) {
    let (title, border) = if state.is_sending() {
        (" Waiting for response... ", Color::DarkGray)
    } else {
        (" Message (Enter to send, Esc to quit) ", Color::Yellow)
    };

    let text = if state.is_sending() {
        Line::styled(state.input().to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Line::raw(state.input().to_string())
    };

    let widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title)
    );
    f.render_widget(widget, area);

    if !state.is_sending() {
        let x = composer_cursor_x(area, state.input());
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Cursor column after the composer text. Counts chars, not bytes, and
/// clamps inside the composer block.
fn composer_cursor_x(area: Rect, input: &str) -> u16 {
    let width = input.chars().count().min(u16::MAX as usize) as u16;
    area.x
        .saturating_add(1)
        .saturating_add(width)
        .min(area.right().saturating_sub(2))
}

fn render_footer(f: &mut Frame, area: Rect, state: &ChatState) {
    f.render_widget(Paragraph::new(footer_line(state)), area);
}

fn footer_line(state: &ChatState) -> Line<'static> {
    match state.example_queries() {
        Some(queries) => {
            let mut spans = vec![Span::styled(
                format!("Press 1-{} to ask: ", queries.len()),
                Style::default().fg(Color::DarkGray),
            )];
            for (idx, query) in queries.iter().enumerate() {
                spans.push(Span::styled(
                    format!("[{}] ", idx + 1),
                    Style::default().fg(Color::Yellow),
                ));
                spans.push(Span::styled(
                    format!("{}  ", query),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        None => Line::styled(
            "Up/Down scroll · PgUp/PgDn page",
            Style::default().fg(Color::DarkGray),
        ),
    }
}
