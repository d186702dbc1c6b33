use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use citedr::session::LevelResult;
use citedr::store::{Recorded, SaveStatus};

use crate::ui::theme::Theme;

pub struct LevelComplete<'a> {
    pub title: &'a str,
    pub result: &'a LevelResult,
    pub recorded: Option<&'a Recorded>,
    /// Title of the level that can be started next, if any.
    pub next_level: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for LevelComplete<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let dim = Style::default().fg(colors.text_dim());

        let block = Block::bordered()
            .title(" Level Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.title,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let result = self.result;
        let acc_color = if result.is_perfect() {
            colors.success()
        } else if result.accuracy() >= 50.0 {
            colors.warning()
        } else {
            colors.error()
        };
        let summary = vec![
            Line::from(vec![
                Span::styled("  Points:   ", label),
                Span::styled(
                    format!("{}", result.points),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" / {}", result.max_points), dim),
            ]),
            Line::from(vec![
                Span::styled("  Correct:  ", label),
                Span::styled(
                    format!("{}/{}", result.correct_count(), result.question_count()),
                    Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  ({:.0}%)", result.accuracy()), dim),
            ]),
        ];
        Paragraph::new(summary).render(layout[1], buf);

        let mut notes: Vec<Line> = Vec::new();
        if let Some(recorded) = self.recorded {
            let outcome = &recorded.outcome;
            if outcome.rank_changed() {
                notes.push(Line::from(vec![
                    Span::styled("  Promoted to ", label),
                    Span::styled(
                        outcome.rank.as_str(),
                        Style::default()
                            .fg(colors.success())
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
            }
            if outcome.unlocked.is_some() {
                notes.push(Line::from(Span::styled(
                    "  New level unlocked",
                    Style::default().fg(colors.success()),
                )));
            } else if !outcome.first_completion {
                notes.push(Line::from(Span::styled(
                    "  Replay: points added to your total",
                    dim,
                )));
            }
            if let SaveStatus::Failed(reason) = &recorded.saved {
                notes.push(Line::from(Span::styled(
                    format!("  Progress not saved: {reason}"),
                    Style::default().fg(colors.warning()),
                )));
            }
            notes.push(Line::from(""));
        }
        for outcome in &result.outcomes {
            let (mark, color) = if outcome.correct {
                ("+", colors.success())
            } else {
                ("x", colors.error())
            };
            notes.push(Line::from(vec![
                Span::styled(format!("  {mark} "), Style::default().fg(color)),
                Span::styled(outcome.question_id.as_str(), label),
                Span::styled(format!("  {} pts", outcome.awarded), dim),
            ]));
        }
        Paragraph::new(notes).render(layout[2], buf);

        let mut help = Vec::new();
        if let Some(next) = self.next_level {
            help.push(Span::styled(
                format!("  [Enter] Next: {next}  "),
                Style::default().fg(colors.accent()),
            ));
        }
        help.push(Span::styled(
            "  [r] Replay  [Esc] Levels",
            Style::default().fg(colors.accent()),
        ));
        Paragraph::new(Line::from(help)).render(layout[3], buf);
    }
}
