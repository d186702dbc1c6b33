use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use citedr::content::CaseFile;

use crate::ui::theme::Theme;

/// Source facts for a simulation question.
pub struct CaseFilePanel<'a> {
    pub case_file: &'a CaseFile,
    pub theme: &'a Theme,
}

impl<'a> CaseFilePanel<'a> {
    pub fn new(case_file: &'a CaseFile, theme: &'a Theme) -> Self {
        Self { case_file, theme }
    }
}

impl Widget for CaseFilePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.text_dim());
        let value = Style::default().fg(colors.fg());

        let block = Block::bordered()
            .title(" Case File ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let cf = self.case_file;
        let mut lines = vec![
            Line::from(Span::styled(
                cf.title.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![Span::styled("Court:   ", label), Span::styled(cf.court.as_str(), value)]),
            Line::from(vec![Span::styled("Decided: ", label), Span::styled(cf.date.as_str(), value)]),
            Line::from(vec![Span::styled("Source:  ", label), Span::styled(cf.source.as_str(), value)]),
        ];
        if let Some(history) = &cf.history {
            lines.push(Line::from(vec![
                Span::styled("History: ", label),
                Span::styled(history.as_str(), value),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(cf.facts.as_str(), value)));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
