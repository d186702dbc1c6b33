use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use citedr::content::{ChoiceQuestion, QuestionKind};
use citedr::session::{
    BuildResponse, ChoiceResponse, LevelSession, Response, SimulationResponse, Verdict,
};

use crate::ui::theme::{Theme, ThemeColors};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildFocus {
    #[default]
    Pool,
    Built,
}

/// Where the learner is pointing inside the current question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuestionCursor {
    /// Option, segment, or editable token index depending on the kind.
    pub item: usize,
    pub focus: BuildFocus,
    /// Row inside an open token selector.
    pub option: usize,
}

pub struct QuestionView<'a> {
    pub session: &'a LevelSession,
    pub cursor: QuestionCursor,
    pub theme: &'a Theme,
}

impl<'a> QuestionView<'a> {
    pub fn new(session: &'a LevelSession, cursor: QuestionCursor, theme: &'a Theme) -> Self {
        Self {
            session,
            cursor,
            theme,
        }
    }
}

fn cursor_style(colors: &ThemeColors, active: bool) -> Style {
    if active {
        Style::default()
            .fg(colors.highlight_fg())
            .bg(colors.highlight_bg())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.fg())
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (Some(question), Some(response)) = (self.session.question(), self.session.response())
        else {
            return;
        };
        let verdict = self.session.verdict();

        let index = self.session.current_index().unwrap_or(0);
        let block = Block::bordered()
            .title(format!(
                " Question {}/{} | {} ",
                index + 1,
                self.session.question_count(),
                question.kind.label()
            ))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let verdict_height = if verdict.is_some() { 7 } else { 0 };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(4),
                Constraint::Length(verdict_height),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            question.prompt.as_str(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true })
        .render(layout[0], buf);

        let answered = verdict.is_some();
        let body = match (&question.kind, response) {
            (QuestionKind::MultipleChoice(choice), Response::Choice(resp)) => {
                choice_lines(choice, resp, self.cursor, answered, colors)
            }
            (QuestionKind::BuildCitation(_), Response::Build(resp)) => {
                build_lines(resp, self.cursor, answered, colors)
            }
            (QuestionKind::Simulation(_), Response::Simulation(resp)) => {
                simulation_lines(resp, self.cursor, answered, colors)
            }
            _ => Vec::new(),
        };
        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);

        if let Some(verdict) = verdict {
            VerdictPanel {
                verdict,
                theme: self.theme,
            }
            .render(layout[2], buf);
        }
    }
}

fn choice_lines(
    choice: &ChoiceQuestion,
    resp: &ChoiceResponse,
    cursor: QuestionCursor,
    answered: bool,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    choice
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let chosen = resp.selected == Some(i);
            let marker = if chosen { "(*)" } else { "( )" };
            let style = if answered {
                if i == choice.correct_option {
                    Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
                } else if chosen {
                    Style::default().fg(colors.error())
                } else {
                    Style::default().fg(colors.text_dim())
                }
            } else {
                cursor_style(colors, i == cursor.item)
            };
            Line::from(Span::styled(format!(" {marker} {option}"), style))
        })
        .collect()
}

fn build_lines(
    resp: &BuildResponse,
    cursor: QuestionCursor,
    answered: bool,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    let heading = |text: &str, focused: bool| {
        Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(if focused && !answered {
                    colors.accent()
                } else {
                    colors.text_dim()
                })
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![heading(" Your citation", cursor.focus == BuildFocus::Built)];
    if resp.built().is_empty() {
        lines.push(Line::from(Span::styled(
            "   (nothing placed yet)",
            Style::default().fg(colors.text_dim()),
        )));
    } else {
        let mut spans = vec![Span::raw("   ")];
        for (i, text) in resp.built().iter().enumerate() {
            let active = !answered && cursor.focus == BuildFocus::Built && i == cursor.item;
            spans.push(Span::styled(text.clone(), cursor_style(colors, active)));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(heading(" Segments", cursor.focus == BuildFocus::Pool));
    let mut spans = vec![Span::raw("   ")];
    for (i, segment) in resp.available().iter().enumerate() {
        let active = !answered && cursor.focus == BuildFocus::Pool && i == cursor.item;
        let style = if answered {
            Style::default().fg(colors.text_dim())
        } else {
            cursor_style(colors, active)
        };
        spans.push(Span::styled(format!("[{}]", segment.text), style));
        spans.push(Span::raw(" "));
    }
    lines.push(Line::from(spans));
    lines
}

fn simulation_lines(
    resp: &SimulationResponse,
    cursor: QuestionCursor,
    answered: bool,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    let open = resp.open_token();
    let mut editable_index = 0;
    let mut spans = vec![Span::raw(" ")];

    for token in resp.tokens().iter().filter(|t| !t.is_removed()) {
        let style = if token.locked {
            Style::default().fg(colors.locked())
        } else {
            let active = !answered && editable_index == cursor.item;
            editable_index += 1;
            if answered {
                if token.is_correct() {
                    Style::default().fg(colors.success())
                } else {
                    Style::default().fg(colors.error()).add_modifier(Modifier::CROSSED_OUT)
                }
            } else if active {
                cursor_style(colors, true)
            } else {
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::UNDERLINED)
            }
        };
        spans.push(Span::styled(token.display.clone(), style));
        spans.push(Span::raw(" "));
    }

    let mut lines = vec![Line::from(spans), Line::from("")];

    if let Some(token) = open.and_then(|id| resp.token(id)) {
        lines.push(Line::from(Span::styled(
            format!(" Replace \"{}\" with:", token.display),
            Style::default().fg(colors.accent()),
        )));
        for (i, option) in token.options.iter().enumerate() {
            let marker = if *option == token.display { "*" } else { " " };
            lines.push(Line::from(Span::styled(
                format!("   {marker} {option}"),
                cursor_style(colors, i == cursor.option),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(" Reads as: ", Style::default().fg(colors.text_dim())),
        Span::styled(resp.rendered_text(), Style::default().fg(colors.fg())),
    ]));
    lines
}

struct VerdictPanel<'a> {
    verdict: &'a Verdict,
    theme: &'a Theme,
}

impl Widget for VerdictPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (title, color) = if self.verdict.correct {
            (" Correct ", colors.success())
        } else {
            (" Incorrect ", colors.error())
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(color));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from(Span::styled(
            format!("+{} points", self.verdict.awarded),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(Span::styled(
            self.verdict.explanation.as_str(),
            Style::default().fg(colors.fg()),
        )));
        if let Some(rule) = &self.verdict.rule_reference {
            lines.push(Line::from(Span::styled(
                format!("See {rule}"),
                Style::default().fg(colors.text_dim()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
