use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥80 cols: card, timer gauge, progress bar
    Narrow, // <80 cols: card and a one-line status footer
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 80 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_gauges(&self, height: u16) -> bool {
        height >= 16 && *self == LayoutTier::Wide
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub gauges: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        if tier.show_gauges(area.height) {
            let vertical = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(8),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ])
                .split(area);
            Self {
                header: vertical[0],
                main: vertical[1],
                gauges: Some(vertical[2]),
                footer: vertical[3],
                tier,
            }
        } else {
            let vertical = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(6),
                    Constraint::Length(1),
                ])
                .split(area);
            Self {
                header: vertical[0],
                main: vertical[1],
                gauges: None,
                footer: vertical[2],
                tier,
            }
        }
    }
}
