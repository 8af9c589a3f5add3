use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;

use crate::engine::hints;
use crate::engine::mastery::MasteryStore;
use crate::engine::normalize;
use crate::engine::queue::{QueuePolicy, SessionQueue};
use crate::engine::timer::CountdownTimer;
use crate::provider::analytics::InteractionKind;
use crate::provider::{PracticeItem, ProviderError};
use crate::session::summary::SessionRecord;
use crate::store::kv_store::KvStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Active,
    AwaitingAnswer,
    ShowingFeedback,
    Completed,
    Errored,
}

#[derive(Clone, Debug)]
pub struct Feedback {
    pub correct: bool,
    pub message: String,
    pub revealed_answer: Option<String>,
}

/// What the session reports back after each scored submission, for the
/// scheduling and analytics sinks. `rating` is present only when the item
/// left the queue for good.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub item_id: String,
    pub correct: bool,
    pub kind: InteractionKind,
    pub rating: Option<u8>,
}

/// What the head item looked like when it was resolved. The queue moves on
/// immediately (pop or rotate), so the feedback screen renders from this
/// snapshot rather than from the new head.
#[derive(Clone, Debug)]
struct ResolvedTurn {
    prompt: String,
    note: Option<String>,
    answer_chars: Vec<Option<char>>,
    hint_mask: BTreeSet<usize>,
    mastery_level: u32,
    attempts: u32,
}

/// Everything the presentation layer needs for the current turn.
#[derive(Clone, Debug)]
pub struct TurnView {
    pub prompt: String,
    pub note: Option<String>,
    pub answer_chars: Vec<Option<char>>,
    pub hint_mask: BTreeSet<usize>,
    pub mastery_level: u32,
    pub attempts: u32,
    pub timer_display: String,
    pub timer_fraction: f64,
    pub paused: bool,
    pub score: usize,
    pub total: usize,
    pub progress: f64,
    pub feedback: Option<Feedback>,
}

/// One practice session: queue, countdown, mastery and hints wired into a
/// single state machine. All transitions happen through the methods here;
/// entering `AwaitingAnswer` is the only place hints are recomputed and
/// the timer re-armed, so a re-render mid-turn is always stable.
pub struct PracticeSession<S: KvStore> {
    status: SessionStatus,
    generation: u64,
    deck: String,
    policy: QueuePolicy,
    turn_duration: Duration,
    queue: SessionQueue,
    mastery: MasteryStore<S>,
    timer: CountdownTimer,
    hint_mask: BTreeSet<usize>,
    mastery_level: u32,
    score: usize,
    submissions: usize,
    feedback: Option<Feedback>,
    resolved: Option<ResolvedTurn>,
    error: Option<String>,
    missed: Vec<String>,
    started_at: Option<Instant>,
}

impl<S: KvStore> PracticeSession<S> {
    /// A session starts in `Loading`, waiting for its item fetch to land.
    pub fn loading(
        generation: u64,
        deck: &str,
        policy: QueuePolicy,
        turn_duration: Duration,
        store: S,
    ) -> Self {
        Self {
            status: SessionStatus::Loading,
            generation,
            deck: deck.to_string(),
            policy,
            turn_duration,
            queue: SessionQueue::new(Vec::new(), policy),
            mastery: MasteryStore::new(store),
            timer: CountdownTimer::new(),
            hint_mask: BTreeSet::new(),
            mastery_level: 0,
            score: 0,
            submissions: 0,
            feedback: None,
            resolved: None,
            error: None,
            missed: Vec::new(),
            started_at: None,
        }
    }

    /// Deliver the item fetch result. Results tagged with a different
    /// generation belong to a superseded session and are discarded, as is
    /// anything arriving after the session left `Loading`.
    pub fn items_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<PracticeItem>, ProviderError>,
        due_ids: &HashSet<String>,
        rng: &mut SmallRng,
        shuffle: bool,
    ) {
        if generation != self.generation || self.status != SessionStatus::Loading {
            return;
        }
        match result {
            Err(err) => {
                self.status = SessionStatus::Errored;
                self.error = Some(err.to_string());
            }
            Ok(items) if items.is_empty() => {
                self.status = SessionStatus::Errored;
                self.error = Some(ProviderError::Empty(self.deck.clone()).to_string());
            }
            Ok(items) => {
                let mut queue = if shuffle {
                    SessionQueue::shuffled(items, self.policy, rng)
                } else {
                    SessionQueue::new(items, self.policy)
                };
                if self.policy == QueuePolicy::Requeue {
                    queue.prioritize_due(due_ids);
                }
                self.queue = queue;
                self.status = SessionStatus::Active;
                self.started_at = Some(Instant::now());
                self.begin_turn();
            }
        }
    }

    /// Present the head item: recompute the hint mask from the current
    /// mastery level and arm the countdown.
    fn begin_turn(&mut self) {
        let Some(entry) = self.queue.current() else {
            self.timer.stop();
            self.status = SessionStatus::Completed;
            return;
        };
        self.mastery_level = self.mastery.level(&entry.item.answer);
        self.hint_mask = hints::compute_hints(&entry.item.answer, self.mastery_level);
        self.feedback = None;
        self.resolved = None;
        self.timer.reset(self.turn_duration);
        self.status = SessionStatus::AwaitingAnswer;
    }

    pub fn submit_answer(&mut self, text: &str) -> Option<TurnOutcome> {
        if self.status != SessionStatus::AwaitingAnswer {
            return None;
        }
        let target = &self.queue.current()?.item.answer;
        let correct = normalize::answers_match(text, target);
        let message = if correct { "Correct!" } else { "Not quite." };
        self.resolve(correct, InteractionKind::Answered, message)
    }

    /// Advance the countdown; expiry is an automatic incorrect submission,
    /// never a silent skip.
    pub fn tick(&mut self, elapsed: Duration) -> Option<TurnOutcome> {
        if self.status != SessionStatus::AwaitingAnswer {
            return None;
        }
        if self.timer.tick(elapsed) {
            return self.resolve(false, InteractionKind::TimedOut, "Time's up!");
        }
        None
    }

    /// Skipping counts as an incorrect submission: mastery resets and the
    /// item requeues under the requeue policy.
    pub fn skip(&mut self) -> Option<TurnOutcome> {
        if self.status != SessionStatus::AwaitingAnswer {
            return None;
        }
        self.resolve(false, InteractionKind::Skipped, "Skipped.")
    }

    fn resolve(
        &mut self,
        correct: bool,
        kind: InteractionKind,
        message: &str,
    ) -> Option<TurnOutcome> {
        let entry = self.queue.current()?;
        let item_id = entry.item.id.clone();
        let answer = entry.item.answer.clone();
        let prompt = entry.item.prompt.clone();
        let attempts = entry.attempts;

        // Captured before the queue moves on, so the feedback screen keeps
        // describing the card that was answered
        self.resolved = Some(ResolvedTurn {
            prompt: prompt.clone(),
            note: entry.item.note.clone(),
            answer_chars: hints::masked_chars(&answer, &self.hint_mask),
            hint_mask: self.hint_mask.clone(),
            mastery_level: self.mastery_level,
            attempts,
        });

        self.submissions += 1;
        self.timer.stop();

        let rating = if correct {
            self.score += 1;
            self.mastery.record_correct(&answer);
            self.queue.mark_correct();
            Some(match attempts {
                0 => 4,
                1 => 3,
                _ => 2,
            })
        } else {
            self.mastery.record_incorrect(&answer);
            if !self.missed.contains(&prompt) {
                self.missed.push(prompt);
            }
            self.queue.mark_incorrect();
            // Under requeue the item comes back, so no final rating yet
            (self.policy == QueuePolicy::SinglePass).then_some(1)
        };

        self.feedback = Some(Feedback {
            correct,
            message: message.to_string(),
            revealed_answer: (!correct).then_some(answer),
        });
        self.status = SessionStatus::ShowingFeedback;

        Some(TurnOutcome {
            item_id,
            correct,
            kind,
            rating,
        })
    }

    /// Leave feedback for the next turn, or complete the session when the
    /// queue has drained.
    pub fn advance(&mut self) {
        if self.status == SessionStatus::ShowingFeedback {
            self.begin_turn();
        }
    }

    /// Abandoning a session: the countdown stops so no further expiry can
    /// fire. The caller drops the session afterwards; nothing else is
    /// written on its behalf.
    pub fn exit(&mut self) {
        self.timer.stop();
    }

    pub fn toggle_pause(&mut self) {
        if self.status != SessionStatus::AwaitingAnswer {
            return;
        }
        if self.timer.is_paused() {
            self.timer.resume();
        } else {
            self.timer.pause();
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn deck(&self) -> &str {
        &self.deck
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.queue.total()
    }

    pub fn submissions(&self) -> usize {
        self.submissions
    }

    pub fn progress(&self) -> f64 {
        self.queue.progress()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> Option<TurnView> {
        match self.status {
            SessionStatus::AwaitingAnswer => {
                let entry = self.queue.current()?;
                Some(self.turn_view(
                    entry.item.prompt.clone(),
                    entry.item.note.clone(),
                    hints::masked_chars(&entry.item.answer, &self.hint_mask),
                    self.hint_mask.clone(),
                    self.mastery_level,
                    entry.attempts,
                ))
            }
            // The queue has already moved on; render the resolved card,
            // which also keeps the final turn's feedback on screen when the
            // queue is empty
            SessionStatus::ShowingFeedback => {
                let resolved = self.resolved.as_ref()?;
                Some(self.turn_view(
                    resolved.prompt.clone(),
                    resolved.note.clone(),
                    resolved.answer_chars.clone(),
                    resolved.hint_mask.clone(),
                    resolved.mastery_level,
                    resolved.attempts,
                ))
            }
            _ => None,
        }
    }

    fn turn_view(
        &self,
        prompt: String,
        note: Option<String>,
        answer_chars: Vec<Option<char>>,
        hint_mask: BTreeSet<usize>,
        mastery_level: u32,
        attempts: u32,
    ) -> TurnView {
        TurnView {
            prompt,
            note,
            answer_chars,
            hint_mask,
            mastery_level,
            attempts,
            timer_display: self.timer.display(),
            timer_fraction: self.timer.fraction_remaining(),
            paused: self.timer.is_paused(),
            score: self.score,
            total: self.queue.total(),
            progress: self.queue.progress(),
            feedback: self.feedback.clone(),
        }
    }

    /// Feedback view survives into `Completed` (the final turn's result is
    /// rendered on the summary screen).
    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn to_record(&self, mode: &str) -> SessionRecord {
        SessionRecord {
            deck: self.deck.clone(),
            mode: mode.to_string(),
            score: self.score,
            total: self.queue.total(),
            submissions: self.submissions,
            duration_secs: self
                .started_at
                .map(|t| t.elapsed().as_secs_f64())
                .unwrap_or(0.0),
            timestamp: chrono::Utc::now(),
            missed: self.missed.clone(),
        }
    }
}
