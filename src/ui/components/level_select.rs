use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use citedr::engine::LevelEntry;

use crate::ui::theme::Theme;

/// Level picker. Locked rows are shown but cannot be entered.
pub struct LevelSelect<'a> {
    pub entries: &'a [LevelEntry<'a>],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> LevelSelect<'a> {
    pub fn new(entries: &'a [LevelEntry<'a>], selected: usize, theme: &'a Theme) -> Self {
        Self {
            entries,
            selected,
            theme,
        }
    }
}

impl Widget for LevelSelect<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Levels ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.entries
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(inner);

        for (i, entry) in self.entries.iter().enumerate() {
            let Some(row) = rows.get(i) else {
                break;
            };
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let (badge, badge_color) = if entry.locked {
                ("locked", colors.locked())
            } else if entry.completed {
                ("done", colors.success())
            } else if entry.current {
                ("current", colors.accent())
            } else {
                ("open", colors.fg())
            };

            let title_color = if entry.locked {
                colors.locked()
            } else if is_selected {
                colors.accent()
            } else {
                colors.fg()
            };
            let title_style = Style::default().fg(title_color).add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!(" {indicator} {}. {}", entry.index + 1, entry.level.title),
                        title_style,
                    ),
                    Span::styled(format!("  [{badge}]"), Style::default().fg(badge_color)),
                ]),
                Line::from(Span::styled(
                    format!("      {}", entry.level.description),
                    Style::default().fg(if entry.locked {
                        colors.locked()
                    } else {
                        colors.text_dim()
                    }),
                )),
            ];

            let style = if is_selected {
                Style::default().bg(colors.highlight_bg())
            } else if entry.current && !entry.locked {
                Style::default().bg(colors.accent_dim())
            } else {
                Style::default()
            };
            Paragraph::new(lines).style(style).render(*row, buf);
        }
    }
}
