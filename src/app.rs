use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::queue::QueuePolicy;
use crate::event::AppEvent;
use crate::provider::analytics::{AnalyticsSink, FileAnalytics, NoopAnalytics, PracticeEvent};
use crate::provider::deck::DeckProvider;
use crate::provider::srs::{LocalScheduler, SchedulingSink};
use crate::provider::{ItemProvider, PracticeItem, ProviderError};
use crate::session::practice::{PracticeSession, SessionStatus, TurnOutcome};
use crate::session::summary::SessionRecord;
use crate::store::data_store::DataStore;
use crate::store::kv_store::FileKvStore;
use crate::store::schema::{HistoryData, ProfileData};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Practice,
    Summary,
    History,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityMode {
    /// Flashcard deck: missed cards requeue until cleared, due cards first.
    Review,
    /// Timed quiz: one pass, score only.
    Quiz,
}

impl ActivityMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityMode::Review => "review",
            ActivityMode::Quiz => "quiz",
        }
    }

    pub fn policy(self) -> QueuePolicy {
        match self {
            ActivityMode::Review => QueuePolicy::Requeue,
            ActivityMode::Quiz => QueuePolicy::SinglePass,
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub mode: ActivityMode,
    pub session: Option<PracticeSession<FileKvStore>>,
    pub input: String,
    pub last_record: Option<SessionRecord>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub decks: Vec<String>,
    pub profile: ProfileData,
    pub history: Vec<SessionRecord>,
    pub store: Option<DataStore>,
    pub status_note: Option<String>,
    pub should_quit: bool,
    pub settings_selected: usize,
    generation: u64,
    rng: SmallRng,
    analytics: Box<dyn AnalyticsSink>,
}

impl App {
    pub fn new(seed: Option<u64>) -> Self {
        let mut config = Config::load().unwrap_or_default();
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let store = DataStore::new().ok();
        let (profile, history) = if let Some(ref s) = store {
            (s.load_profile(), s.load_history().sessions)
        } else {
            (ProfileData::default(), Vec::new())
        };

        let decks = DeckProvider::available_decks();
        config.normalize_deck(&decks);

        let analytics: Box<dyn AnalyticsSink> = match (&store, config.analytics_enabled) {
            (Some(s), true) => Box::new(FileAnalytics::new(s.events_path())),
            _ => Box::new(NoopAnalytics),
        };

        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            screen: AppScreen::Menu,
            mode: ActivityMode::Review,
            session: None,
            input: String::new(),
            last_record: None,
            menu,
            theme,
            config,
            decks,
            profile,
            history,
            store,
            status_note: None,
            should_quit: false,
            settings_selected: 0,
            generation: 0,
            rng,
            analytics,
        }
    }

    fn mastery_path(&self) -> PathBuf {
        match &self.store {
            Some(store) => store.mastery_path(),
            None => PathBuf::from("mastery.json"),
        }
    }

    fn scheduler_path(&self) -> PathBuf {
        match &self.store {
            Some(store) => store.scheduler_path(),
            None => PathBuf::from("srs.json"),
        }
    }

    /// Begin a session: allocate a new generation, enter `Loading`, and
    /// fetch items on a background thread. The result comes back through
    /// the event channel tagged with this generation; anything older is
    /// dropped on arrival.
    pub fn start_session(&mut self, mode: ActivityMode, tx: Sender<AppEvent>) {
        self.generation += 1;
        let generation = self.generation;
        self.mode = mode;
        self.input.clear();
        self.status_note = None;

        let mastery_kv = match FileKvStore::open(self.mastery_path()) {
            Ok(kv) => kv,
            Err(err) => {
                self.status_note = Some(format!("cannot open data dir: {err}"));
                return;
            }
        };

        self.session = Some(PracticeSession::loading(
            generation,
            &self.config.deck,
            mode.policy(),
            self.config.turn_duration(),
            mastery_kv,
        ));
        self.screen = AppScreen::Practice;

        let deck = self.config.deck.clone();
        let remote = self.config.remote_base_url.clone();
        thread::spawn(move || {
            let result = fetch_items(remote.as_deref(), &deck);
            let _ = tx.send(AppEvent::ItemsFetched { generation, result });
        });
    }

    pub fn handle_items_fetched(
        &mut self,
        generation: u64,
        result: Result<Vec<PracticeItem>, ProviderError>,
    ) {
        let due_ids = match &result {
            Ok(items) if self.mode == ActivityMode::Review && self.config.srs_enabled => {
                self.due_ids(items)
            }
            _ => HashSet::new(),
        };

        let shuffle = self.config.shuffle;
        let Some(session) = self.session.as_mut() else {
            // Session exited while the fetch was in flight
            return;
        };
        session.items_loaded(generation, result, &due_ids, &mut self.rng, shuffle);
    }

    fn due_ids(&self, items: &[PracticeItem]) -> HashSet<String> {
        let Ok(kv) = FileKvStore::open(self.scheduler_path()) else {
            return HashSet::new();
        };
        let scheduler = LocalScheduler::new(kv);
        scheduler
            .due_among(&self.config.deck, items.iter().map(|i| i.id.as_str()))
            .into_iter()
            .collect()
    }

    pub fn tick(&mut self, elapsed: Duration) {
        let outcome = self.session.as_mut().and_then(|s| s.tick(elapsed));
        if let Some(outcome) = outcome {
            self.after_outcome(outcome);
        }
    }

    pub fn submit_input(&mut self) {
        let text = self.input.clone();
        let outcome = self.session.as_mut().and_then(|s| s.submit_answer(&text));
        if let Some(outcome) = outcome {
            self.after_outcome(outcome);
        }
    }

    pub fn skip_current(&mut self) {
        let outcome = self.session.as_mut().and_then(|s| s.skip());
        if let Some(outcome) = outcome {
            self.after_outcome(outcome);
        }
    }

    /// Post-turn bookkeeping outside the state machine: analytics and the
    /// scheduling sink. Both are best-effort and never affect the session.
    /// Every outcome that carries a rating is forwarded, whichever mode
    /// produced it (a quiz miss reschedules the item just like a review
    /// miss would).
    fn after_outcome(&mut self, outcome: TurnOutcome) {
        self.analytics.record(PracticeEvent::turn(
            self.generation,
            &outcome.item_id,
            outcome.kind,
            outcome.correct,
        ));

        if self.config.srs_enabled {
            let deck = match &self.session {
                Some(session) => session.deck().to_string(),
                None => self.config.deck.clone(),
            };
            if let Ok(kv) = FileKvStore::open(self.scheduler_path()) {
                forward_rating(&mut LocalScheduler::new(kv), &deck, &outcome);
            }
        }
    }

    pub fn advance_session(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.advance();
        self.input.clear();
        if session.status() == SessionStatus::Completed {
            self.finalize_session();
        }
    }

    fn finalize_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let record = session.to_record(self.mode.as_str());
        self.analytics
            .record(PracticeEvent::session_completed(session.generation()));

        self.update_profile(&record);
        self.history.push(record.clone());
        if self.history.len() > 500 {
            self.history.remove(0);
        }
        self.save_data();

        self.last_record = Some(record);
        self.screen = AppScreen::Summary;
    }

    fn update_profile(&mut self, record: &SessionRecord) {
        self.profile.total_sessions += 1;
        self.profile.total_correct += record.score as u32;

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        if self.profile.last_practice_date.as_deref() != Some(&today) {
            if let Some(ref last) = self.profile.last_practice_date {
                let yesterday = (chrono::Utc::now() - chrono::Duration::days(1))
                    .format("%Y-%m-%d")
                    .to_string();
                if last == &yesterday {
                    self.profile.streak_days += 1;
                } else {
                    self.profile.streak_days = 1;
                }
            } else {
                self.profile.streak_days = 1;
            }
            self.profile.best_streak = self.profile.best_streak.max(self.profile.streak_days);
            self.profile.last_practice_date = Some(today);
        }
    }

    fn save_data(&self) {
        if let Some(ref store) = self.store {
            let _ = store.save_profile(&self.profile);
            let history = HistoryData {
                sessions: self.history.clone(),
                ..HistoryData::default()
            };
            let _ = store.save_history(&history);
        }
    }

    /// Leaving a session mid-flight: the countdown stops and the session
    /// is dropped, so no expiry and no further mastery writes can happen
    /// on its behalf. An in-flight fetch for it dies by generation check.
    pub fn exit_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.exit();
        }
        self.input.clear();
        self.screen = AppScreen::Menu;
    }

    pub fn retry_load(&mut self, tx: Sender<AppEvent>) {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.status() == SessionStatus::Errored)
        {
            self.start_session(self.mode, tx);
        }
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_history(&mut self) {
        self.screen = AppScreen::History;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        let _ = self.config.save();
        self.screen = AppScreen::Menu;
    }

    pub fn settings_cycle_forward(&mut self) {
        match self.settings_selected {
            0 => {
                if self.decks.is_empty() {
                    return;
                }
                if let Some(idx) = self.decks.iter().position(|d| *d == self.config.deck) {
                    let next = (idx + 1) % self.decks.len();
                    self.config.deck = self.decks[next].clone();
                } else if let Some(first) = self.decks.first() {
                    self.config.deck = first.clone();
                }
            }
            1 => {
                self.config.timer_secs = (self.config.timer_secs + 5).min(120);
            }
            2 => {
                let themes = Theme::available_themes();
                if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
                    let next = (idx + 1) % themes.len();
                    self.config.theme = themes[next].clone();
                } else if let Some(first) = themes.first() {
                    self.config.theme = first.clone();
                }
                self.reload_theme();
            }
            3 => {
                self.config.srs_enabled = !self.config.srs_enabled;
            }
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        match self.settings_selected {
            0 => {
                if let Some(idx) = self.decks.iter().position(|d| *d == self.config.deck) {
                    let next = if idx == 0 { self.decks.len() - 1 } else { idx - 1 };
                    self.config.deck = self.decks[next].clone();
                }
            }
            1 => {
                self.config.timer_secs = self.config.timer_secs.saturating_sub(5).max(5);
            }
            2 => {
                let themes = Theme::available_themes();
                if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
                    let next = if idx == 0 { themes.len() - 1 } else { idx - 1 };
                    self.config.theme = themes[next].clone();
                }
                self.reload_theme();
            }
            3 => {
                self.config.srs_enabled = !self.config.srs_enabled;
            }
            _ => {}
        }
    }

    fn reload_theme(&mut self) {
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }
}

fn forward_rating(sink: &mut impl SchedulingSink, deck: &str, outcome: &TurnOutcome) {
    if let Some(rating) = outcome.rating {
        sink.submit_rating(deck, &outcome.item_id, rating);
    }
}

fn fetch_items(
    remote_base_url: Option<&str>,
    deck: &str,
) -> Result<Vec<PracticeItem>, ProviderError> {
    #[cfg(feature = "network")]
    if let Some(base_url) = remote_base_url {
        return crate::provider::remote::RemoteProvider::new(base_url).fetch_items(deck);
    }
    #[cfg(not(feature = "network"))]
    let _ = remote_base_url;

    DeckProvider::new().fetch_items(deck)
}
