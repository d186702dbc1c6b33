use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct Welcome<'a> {
    pub rank: &'a str,
    pub score: u64,
    pub theme: &'a Theme,
}

impl<'a> Welcome<'a> {
    pub fn new(rank: &'a str, score: u64, theme: &'a Theme) -> Self {
        Self { rank, score, theme }
    }
}

impl Widget for Welcome<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let dim = Style::default().fg(colors.text_dim());
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "citedr",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "A citation drill for the terminal",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Work through the levels in order. Each level mixes multiple-choice rules,",
                dim,
            )),
            Line::from(Span::styled(
                "citation assembly, and case-file corrections. Finishing a level unlocks",
                dim,
            )),
            Line::from(Span::styled(
                "the next one, and every point you earn counts toward your rank.",
                dim,
            )),
            Line::from(""),
        ];

        if self.score > 0 {
            lines.push(Line::from(vec![
                Span::styled("Welcome back, ", Style::default().fg(colors.fg())),
                Span::styled(
                    self.rank,
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" ({} pts)", self.score), dim),
            ]));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "[Enter] Begin   [q] Quit",
            Style::default().fg(colors.accent()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
