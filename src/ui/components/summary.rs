use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::summary::SessionRecord;
use crate::store::schema::ProfileData;
use crate::ui::theme::Theme;

/// Post-session results: score, accuracy, what was missed, streak.
pub struct SummaryView<'a> {
    record: &'a SessionRecord,
    profile: &'a ProfileData,
    theme: &'a Theme,
}

impl<'a> SummaryView<'a> {
    pub fn new(record: &'a SessionRecord, profile: &'a ProfileData, theme: &'a Theme) -> Self {
        Self {
            record,
            profile,
            theme,
        }
    }
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let record = self.record;

        let block = Block::bordered()
            .title(" session complete ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} · {}", record.deck, record.mode),
                Style::default().fg(colors.dim()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("score {}/{}", record.score, record.total),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "{} submissions · {:.0}% accuracy · {:.0}s",
                    record.submissions,
                    record.accuracy(),
                    record.duration_secs
                ),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        if record.missed.is_empty() {
            lines.push(Line::from(Span::styled(
                "perfect run",
                Style::default().fg(colors.success()),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("missed: {}", record.missed.join(", ")),
                Style::default().fg(colors.warning()),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "streak {} day{} · best {}",
                self.profile.streak_days,
                if self.profile.streak_days == 1 { "" } else { "s" },
                self.profile.best_streak
            ),
            Style::default().fg(colors.dim()),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "r: again  m: menu  q: quit",
            Style::default().fg(colors.dim()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
