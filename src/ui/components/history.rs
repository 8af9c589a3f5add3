use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::summary::SessionRecord;
use crate::store::schema::ProfileData;
use crate::ui::theme::Theme;

const MAX_VISIBLE: usize = 20;

/// Recent sessions, newest first.
pub struct HistoryView<'a> {
    sessions: &'a [SessionRecord],
    profile: &'a ProfileData,
    theme: &'a Theme,
}

impl<'a> HistoryView<'a> {
    pub fn new(sessions: &'a [SessionRecord], profile: &'a ProfileData, theme: &'a Theme) -> Self {
        Self {
            sessions,
            profile,
            theme,
        }
    }
}

impl Widget for HistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" history ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "{} sessions · streak {} · best {}",
                    self.profile.total_sessions, self.profile.streak_days, self.profile.best_streak
                ),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if self.sessions.is_empty() {
            lines.push(Line::from(Span::styled(
                "no sessions yet",
                Style::default().fg(colors.dim()),
            )));
        }

        for record in self.sessions.iter().rev().take(MAX_VISIBLE) {
            let when = record.timestamp.format("%Y-%m-%d %H:%M");
            lines.push(Line::from(vec![
                Span::styled(format!("{when}  "), Style::default().fg(colors.dim())),
                Span::styled(
                    format!("{:<16}", record.deck),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:<8}", record.mode),
                    Style::default().fg(colors.dim()),
                ),
                Span::styled(
                    format!("{}/{}", record.score, record.total),
                    Style::default().fg(if record.score == record.total {
                        colors.success()
                    } else {
                        colors.warning()
                    }),
                ),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "esc back",
            Style::default().fg(colors.dim()),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
