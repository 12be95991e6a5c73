use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen, HEADER_ROWS, INPUT_ROWS};
use crate::level::{LevelSession, LevelSummary};
use crate::motion::Point;

const HORIZONTAL_MARGIN: u16 = 2;

impl<R: Rng> Widget for &App<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen() {
            Screen::Countdown { remaining } => {
                let chunks = split(area);
                self.render_header(chunks[0], buf);
                let secs = remaining.as_secs_f32().ceil() as u32;
                let title = if self.campaign().is_final_level() {
                    format!("Level {} (final)", self.campaign().level())
                } else {
                    format!("Level {}", self.campaign().level())
                };
                centered(
                    vec![
                        Line::styled(title, bold().fg(Color::Cyan)),
                        Line::from(""),
                        Line::styled(format!("starting in {secs}"), bold()),
                    ],
                    chunks[1],
                    buf,
                );
                self.render_input(chunks[2], buf);
            }
            Screen::Playing => {
                let chunks = split(area);
                self.render_header(chunks[0], buf);
                if let Some(level) = self.level() {
                    render_words(self, level, chunks[1], buf);
                }
                if self.is_paused() {
                    centered(
                        vec![Line::styled(
                            "PAUSED - focus the window to continue",
                            bold().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
                        )],
                        chunks[1],
                        buf,
                    );
                }
                self.render_input(chunks[2], buf);
            }
            Screen::LevelResult => {
                let mut lines = vec![Line::styled("Level cleared!", bold().fg(Color::Green))];
                lines.extend(self.summary_lines());
                lines.push(Line::from(""));
                lines.push(legend("(enter) next level / (n)ew run / (q)uit"));
                centered(lines, area, buf);
            }
            Screen::Defeat => {
                let mut lines = vec![Line::styled("Defeated", bold().fg(Color::Red))];
                lines.extend(self.summary_lines());
                lines.push(Line::from(""));
                lines.push(legend("(enter) retry / (n)ew run / (q)uit"));
                centered(lines, area, buf);
            }
            Screen::Complete => {
                let totals = self.campaign().totals();
                let mut lines = vec![Line::styled(
                    "Campaign complete!",
                    bold().fg(Color::Magenta),
                )];
                lines.extend(self.summary_lines());
                lines.push(Line::from(""));
                lines.push(Line::styled(
                    format!(
                        "{} points over {} levels   {} hits / {} misses",
                        totals.points,
                        totals.levels_cleared,
                        totals.hit_names.len(),
                        totals.missed_names.len()
                    ),
                    bold(),
                ));
                lines.push(Line::from(""));
                lines.push(legend("(enter) play again / (q)uit"));
                centered(lines, area, buf);
            }
            Screen::Error(message) => {
                centered(
                    vec![
                        Line::styled("Cannot start this level", bold().fg(Color::Red)),
                        Line::from(message.as_str()),
                        Line::from(""),
                        legend("(n)ew run / (q)uit"),
                    ],
                    area,
                    buf,
                );
            }
        }
    }
}

impl<R: Rng> App<R> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let Some(level) = self.level() else {
            return;
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let status = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Level {}/{}", level.level(), self.campaign().max_level()),
                bold().fg(Color::Cyan),
            ),
            Span::raw("   "),
            Span::styled(
                format!("{}/{} words left", level.words_left(), level.total_words()),
                bold(),
            ),
            Span::raw("   "),
            Span::styled(
                format!("{} pts", self.campaign().totals().points + level.points()),
                bold().fg(Color::Yellow),
            ),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        status.render(chunks[0], buf);

        let ratio = level.health_percent() / 100.0;
        let colour = if ratio > 0.5 {
            Color::Green
        } else if ratio > 0.25 {
            Color::Yellow
        } else {
            Color::Red
        };
        Gauge::default()
            .block(Block::default().borders(Borders::BOTTOM))
            .gauge_style(Style::default().fg(colour))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{}/{} hp", level.health().max(0), level.max_health()))
            .render(chunks[1], buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let input = self.level().map(LevelSession::input).unwrap_or_default();
        Paragraph::new(Line::from(vec![
            Span::styled("> ", dim()),
            Span::styled(input.to_string(), bold()),
            Span::styled("_", dim().add_modifier(Modifier::SLOW_BLINK)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" enter/esc clears, esc quits ", dim())),
        )
        .render(area, buf);
    }

    fn summary_lines(&self) -> Vec<Line<'static>> {
        let Some(summary) = self.last_summary() else {
            return Vec::new();
        };
        let totals = match self.best_points() {
            Some(best) => format!(
                "total {} points   best level {} points",
                self.campaign().totals().points,
                best
            ),
            None => format!("total {} points", self.campaign().totals().points),
        };
        vec![
            Line::from(""),
            Line::styled(summary_stats(summary), bold()),
            Line::styled(
                totals,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]
    }
}

fn summary_stats(summary: &LevelSummary) -> String {
    format!(
        "level {}   {} pts   {} hit / {} missed   {}% acc   {}/{} hp",
        summary.level,
        summary.points,
        summary.hit_names.len(),
        summary.missed_names.len(),
        summary.accuracy(),
        summary.health.max(0),
        summary.max_health
    )
}

fn render_words<R: Rng>(app: &App<R>, level: &LevelSession, area: Rect, buf: &mut Buffer) {
    for slot in level.slots() {
        if level.is_resolved(slot.index) {
            continue;
        }
        let Some(at) = app.motion().position(slot.index) else {
            continue;
        };
        let Some((prefix, suffix)) = level.display_parts(slot.index) else {
            continue;
        };
        let width = (prefix.width() + suffix.width()) as u16;
        let Some((x, y)) = cell_for(at, width, area) else {
            continue;
        };

        let suffix_style = if slot.is_diagonal() {
            bold().fg(Color::Magenta)
        } else {
            bold()
        };
        let line = Line::from(vec![
            Span::styled(prefix.to_string(), bold().fg(Color::Green)),
            Span::styled(suffix.to_string(), suffix_style),
        ]);
        buf.set_line(x, y, &line, area.right().saturating_sub(x));
    }
}

/// Top-left cell for a word centred on `at`, or `None` when off screen.
fn cell_for(at: Point, width: u16, area: Rect) -> Option<(u16, u16)> {
    if at.y < 0.0 || at.y >= f32::from(area.height) {
        return None;
    }
    let left = (at.x - f32::from(width) / 2.0).round();
    let max_left = f32::from(area.width.saturating_sub(width));
    let left = left.clamp(0.0, max_left) as u16;
    Some((area.x + left, area.y + at.y as u16))
}

fn split(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(0),
            Constraint::Length(INPUT_ROWS),
        ])
        .split(area)
}

fn centered(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let top = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect::new(area.x, top, area.width, height.min(area.height));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(rect, buf);
}

fn legend(text: &'static str) -> Line<'static> {
    Line::styled(text, Style::default().add_modifier(Modifier::ITALIC))
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}
