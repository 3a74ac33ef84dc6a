use crate::models::chat::{ Forecast, Source };

use chrono::{ DateTime, Local };
use ratatui::style::{ Modifier, Style };
use ratatui::text::{ Line, Span };

/// Wall-clock timestamp shown in message headers, 2-digit hour/minute.
pub fn format_time(time: DateTime<Local>) -> String {
    time.format("%I:%M %p").to_string()
}

pub fn now_time() -> String {
    format_time(Local::now())
}

/// Literal rendering. User and error text always goes through here, so
/// nothing a user types can ever be interpreted as markup.
pub fn plain_lines(text: &str) -> Vec<Line<'static>> {
    text.split('\n').map(|l| Line::raw(l.to_string())).collect()
}

/// Markdown-lite transform for assistant answer text: `**bold**` pairs
/// become bold spans, newlines become new lines, everything else is
/// literal. An opener without a closer stays literal.
pub fn markdown_lite(text: &str) -> Vec<Line<'static>> {
    text.split('\n').map(bold_line).collect()
}

fn bold_line(line: &str) -> Line<'static> {
    let parts: Vec<&str> = line.split("**").collect();
    let mut spans = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 1 && i == parts.len() - 1 {
            // trailing unmatched marker
            spans.push(Span::raw(format!("**{}", part)));
        } else if i % 2 == 1 {
            if !part.is_empty() {
                spans.push(Span::styled(
                    part.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
        } else if !part.is_empty() {
            spans.push(Span::raw(part.to_string()));
        }
    }
    Line::from(spans)
}

pub fn forecast_lines(forecast: &Forecast) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Forecast Details:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(format!("Total Predicted: {}kg", forecast.total_predicted_kg)),
        Line::raw(format!(
            "Confidence Interval (95%): {}kg - {}kg",
            forecast.lower_bound_total, forecast.upper_bound_total
        )),
        Line::raw(format!("Recommendation: {}", forecast.recommendation)),
    ]
}

pub fn source_lines(sources: &[Source]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Data Sources:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for (idx, source) in sources.iter().enumerate() {
        lines.push(Line::raw(source_line(idx, source)));
    }
    lines
}

/// `[1] M1 - 2024-01-01 (Score: 87.3%)`, 1-based, score as a percentage
/// with one decimal.
pub fn source_line(idx: usize, source: &Source) -> String {
    format!(
        "[{}] {} - {} (Score: {:.1}%)",
        idx + 1,
        source.machine_id.as_deref().unwrap_or("N/A"),
        source.date.as_deref().unwrap_or("N/A"),
        source.score * 100.0
    )
}
