mod app;
mod config;
mod engine;
mod event;
mod provider;
mod session;
mod store;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{ActivityMode, App, AppScreen};
use event::{AppEvent, EventHandler};
use session::practice::SessionStatus;
use ui::components::history::HistoryView;
use ui::components::practice_area::PracticeArea;
use ui::components::progress_bar::ProgressBar;
use ui::components::settings::{SETTINGS_COUNT, SettingsView};
use ui::components::summary::SummaryView;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(
    name = "vocadr",
    version,
    about = "Terminal vocabulary practice with adaptive hints"
)]
struct Cli {
    #[arg(short, long, help = "Deck name")]
    deck: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Seconds per card")]
    timer: Option<u64>,

    #[arg(long, help = "Seed for deterministic card order")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new(cli.seed);

    if let Some(deck) = cli.deck {
        app.config.deck = deck;
        let decks = app.decks.clone();
        app.config.normalize_deck(&decks);
    }
    if let Some(timer) = cli.timer {
        app.config.timer_secs = timer.clamp(5, 120);
    }
    if let Some(theme_name) = cli.theme {
        if let Some(theme) = ui::theme::Theme::load(&theme_name) {
            let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
            app.theme = theme;
            app.menu.theme = theme;
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, events),
            AppEvent::Tick => {
                // The countdown advances by measured wall time, so a slow
                // or coalesced tick cannot stretch the turn
                let elapsed = last_tick.elapsed();
                last_tick = Instant::now();
                app.tick(elapsed);
            }
            AppEvent::Resize(_, _) => {}
            AppEvent::ItemsFetched { generation, result } => {
                app.handle_items_fetched(generation, result);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key, events),
        AppScreen::Practice => handle_practice_key(app, key, events),
        AppScreen::Summary => handle_summary_key(app, key, events),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_session(ActivityMode::Review, events.sender()),
        KeyCode::Char('2') => app.start_session(ActivityMode::Quiz, events.sender()),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.start_session(ActivityMode::Review, events.sender()),
            1 => app.start_session(ActivityMode::Quiz, events.sender()),
            2 => app.go_to_history(),
            3 => app.go_to_settings(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    let status = app.session.as_ref().map(|s| s.status());

    match status {
        Some(SessionStatus::Errored) => match key.code {
            KeyCode::Char('r') => app.retry_load(events.sender()),
            KeyCode::Esc | KeyCode::Char('q') => app.exit_session(),
            _ => {}
        },
        Some(SessionStatus::ShowingFeedback) => match key.code {
            KeyCode::Enter => app.advance_session(),
            KeyCode::Esc => app.exit_session(),
            _ => {}
        },
        Some(SessionStatus::AwaitingAnswer) => match key.code {
            KeyCode::Esc => app.exit_session(),
            KeyCode::Enter => app.submit_input(),
            KeyCode::Tab => app.skip_current(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(session) = app.session.as_mut() {
                    session.toggle_pause();
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.input.push(ch)
            }
            _ => {}
        },
        _ => {
            // Loading
            if key.code == KeyCode::Esc {
                app.exit_session();
            }
        }
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match key.code {
        KeyCode::Char('r') => app.start_session(app.mode, events.sender()),
        KeyCode::Char('m') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('h') => app.go_to_history(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => {
            if app.settings_selected > 0 {
                app.settings_selected -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected < SETTINGS_COUNT - 1 {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Summary => render_summary(frame, app),
        AppScreen::History => render_history(frame, app),
        AppScreen::Settings => render_settings_screen(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let streak_text = if app.profile.streak_days > 0 {
        format!(" | {} day streak", app.profile.streak_days)
    } else {
        String::new()
    };
    let header_info = format!(
        " {} | {} sessions | {} correct{}",
        app.config.deck, app.profile.total_sessions, app.profile.total_correct, streak_text,
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " vocadr ",
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(header_info, Style::default().fg(colors.dim())),
    ]));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer_text = match &app.status_note {
        Some(note) => format!(" {note} "),
        None => " [1-2] Start  [h] History  [c] Settings  [q] Quit ".to_string(),
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(session) = app.session.as_ref() else {
        return;
    };

    match session.status() {
        SessionStatus::Loading => {
            let centered = ui::layout::centered_rect(40, 20, area);
            let text = Paragraph::new(Line::from(Span::styled(
                format!("loading {}...", session.deck()),
                Style::default().fg(colors.dim()),
            )))
            .centered();
            frame.render_widget(text, centered);
            return;
        }
        SessionStatus::Errored => {
            render_error(frame, app, session.error().unwrap_or("unknown error"));
            return;
        }
        _ => {}
    }

    let Some(view) = session.view() else {
        return;
    };

    let app_layout = AppLayout::new(area);

    let mode_name = match app.mode {
        ActivityMode::Review => "Deck Review",
        ActivityMode::Quiz => "Timed Quiz",
    };
    let header_text = format!(
        " {mode_name} | {deck} | {score}/{total} ",
        deck = session.deck(),
        score = view.score,
        total = view.total,
    );
    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(colors.bg())
            .bg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(header, app_layout.header);

    let practice = PracticeArea::new(&view, &app.input, app.theme);
    frame.render_widget(practice, app_layout.main);

    if let Some(gauges_area) = app_layout.gauges {
        let gauge_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(gauges_area);

        let timer = ProgressBar::new("Time", view.timer_fraction, app.theme)
            .with_text(&view.timer_display);
        frame.render_widget(timer, gauge_layout[0]);

        let progress = ProgressBar::new("Progress", view.progress, app.theme);
        frame.render_widget(progress, gauge_layout[1]);
    }

    let footer_text = if app_layout.gauges.is_some() {
        " [Enter] Submit  [Tab] Skip  [Ctrl+p] Pause  [Esc] Exit ".to_string()
    } else {
        format!(" {}  [Enter] Submit  [Esc] Exit ", view.timer_display)
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, app_layout.footer);
}

fn render_error(frame: &mut ratatui::Frame, app: &App, message: &str) {
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(60, 30, frame.area());

    let block = Block::bordered()
        .title(" cannot start session ")
        .border_style(Style::default().fg(colors.error()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    frame.render_widget(block, centered);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(colors.error()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[r] Retry  [Esc] Back",
            Style::default().fg(colors.dim()),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).centered(), inner);
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    if let Some(ref record) = app.last_record {
        let centered = ui::layout::centered_rect(60, 70, frame.area());
        let summary = SummaryView::new(record, &app.profile, app.theme);
        frame.render_widget(summary, centered);
    }
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let history = HistoryView::new(&app.history, &app.profile, app.theme);
    frame.render_widget(history, frame.area());
}

fn render_settings_screen(frame: &mut ratatui::Frame, app: &App) {
    let centered = ui::layout::centered_rect(60, 80, frame.area());
    let settings = SettingsView::new(&app.config, &app.decks, app.settings_selected, app.theme);
    frame.render_widget(settings, centered);
}
