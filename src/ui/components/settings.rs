use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::Config;
use crate::ui::theme::Theme;

pub const SETTINGS_COUNT: usize = 4;

/// Settings list: left/right cycle the selected value, up/down move
/// between rows.
pub struct SettingsView<'a> {
    config: &'a Config,
    decks: &'a [String],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> SettingsView<'a> {
    pub fn new(config: &'a Config, decks: &'a [String], selected: usize, theme: &'a Theme) -> Self {
        Self {
            config,
            decks,
            selected,
            theme,
        }
    }
}

impl Widget for SettingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" settings ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let deck_count = self.decks.len();
        let rows = [
            ("deck", format!("{} ({deck_count} available)", self.config.deck)),
            ("timer", format!("{}s per card", self.config.timer_secs)),
            ("theme", self.config.theme.clone()),
            (
                "scheduling",
                if self.config.srs_enabled {
                    "on (due cards first)".to_string()
                } else {
                    "off".to_string()
                },
            ),
        ];

        let mut lines = vec![Line::from("")];
        for (i, (label, value)) in rows.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(
                format!(" {indicator} {label:<12} {value}"),
                style,
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "   ↑/↓ select · ←/→ change · esc back",
            Style::default().fg(colors.dim()),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
