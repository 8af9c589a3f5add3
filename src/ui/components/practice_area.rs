use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::practice::TurnView;
use crate::ui::theme::Theme;

/// The current card: prompt, hint-masked answer slots, the learner's
/// input line, and (after submission) the feedback banner.
pub struct PracticeArea<'a> {
    view: &'a TurnView,
    input: &'a str,
    theme: &'a Theme,
}

impl<'a> PracticeArea<'a> {
    pub fn new(view: &'a TurnView, input: &'a str, theme: &'a Theme) -> Self {
        Self { view, input, theme }
    }

    fn answer_slots(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let mut spans = Vec::with_capacity(self.view.answer_chars.len() * 2);
        for slot in &self.view.answer_chars {
            match slot {
                Some(ch) => spans.push(Span::styled(
                    ch.to_string(),
                    Style::default()
                        .fg(colors.hint())
                        .add_modifier(Modifier::BOLD),
                )),
                None => spans.push(Span::styled("_", Style::default().fg(colors.blank()))),
            }
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl Widget for PracticeArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.view;

        let title = if view.attempts > 0 {
            format!(" retry #{} ", view.attempts)
        } else {
            format!(" mastery {} ", view.mastery_level)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // prompt
                Constraint::Length(1), // note
                Constraint::Length(2), // answer slots
                Constraint::Length(2), // input
                Constraint::Min(2),    // feedback
            ])
            .split(inner);

        let prompt = Paragraph::new(Line::from(Span::styled(
            view.prompt.clone(),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        prompt.render(layout[0], buf);

        if let Some(note) = &view.note {
            Paragraph::new(Line::from(Span::styled(
                note.clone(),
                Style::default().fg(colors.dim()),
            )))
            .alignment(Alignment::Center)
            .render(layout[1], buf);
        }

        Paragraph::new(self.answer_slots())
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        let input_line = if view.feedback.is_none() {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(colors.accent())),
                Span::styled(self.input.to_string(), Style::default().fg(colors.fg())),
                Span::styled("▏", Style::default().fg(colors.accent())),
            ])
        } else {
            Line::from(Span::styled(
                format!("> {}", self.input),
                Style::default().fg(colors.dim()),
            ))
        };
        Paragraph::new(input_line)
            .alignment(Alignment::Center)
            .render(layout[3], buf);

        if let Some(feedback) = &view.feedback {
            let (color, mut text) = if feedback.correct {
                (colors.success(), feedback.message.clone())
            } else {
                (colors.error(), feedback.message.clone())
            };
            if let Some(answer) = &feedback.revealed_answer {
                text = format!("{text}  answer: {answer}");
            }
            let lines = vec![
                Line::from(Span::styled(
                    text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "enter: next  esc: exit",
                    Style::default().fg(colors.dim()),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(layout[4], buf);
        } else if view.paused {
            Paragraph::new(Line::from(Span::styled(
                "paused (ctrl+p to resume)",
                Style::default().fg(colors.warning()),
            )))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn paused_view() -> TurnView {
        TurnView {
            prompt: "cat".to_string(),
            note: None,
            answer_chars: vec![Some('c'), None, None, Some('t')],
            hint_mask: BTreeSet::from([0, 3]),
            mastery_level: 0,
            attempts: 0,
            timer_display: "0:20".to_string(),
            timer_fraction: 1.0,
            paused: true,
            score: 0,
            total: 1,
            progress: 0.0,
            feedback: None,
        }
    }

    fn rendered_text(view: &TurnView) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        PracticeArea::new(view, "", &theme).render(area, &mut buf);

        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_paused_notice_names_the_binding() {
        let text = rendered_text(&paused_view());
        assert!(text.contains("ctrl+p to resume"));
    }
}
