use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;
use web_time::Instant;

use crate::*;

type Listener = Box<dyn FnMut(&GameSnapshot)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Single owner of the game state that presentation adapters drive.
///
/// Commands are serialized through `&mut self`. Every mutation is pushed to the
/// subscribed listeners as a fresh [`GameSnapshot`], and the pending resolution
/// is tracked as a deadline on the monotonic clock that the adapter fires with
/// [`Controller::poll`].
pub struct Controller {
    game: GameState,
    deadline: Option<(ResolutionTicket, Instant)>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u32,
}

impl Controller {
    pub fn new(game: GameState) -> Self {
        Self {
            game,
            deadline: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameSnapshot) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome> {
        self.flip_at(index, Instant::now())
    }

    pub fn flip_at(&mut self, index: CardIndex, now: Instant) -> Result<FlipOutcome> {
        let outcome = self.game.flip(index)?;
        if let Some(scheduled) = outcome.scheduled() {
            self.deadline = Some((scheduled.ticket, now + scheduled.delay));
        }
        if outcome.has_update() {
            self.notify();
        }
        Ok(outcome)
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.start(Some(difficulty.config()));
    }

    pub fn request_new_game(&mut self) {
        self.start(None);
    }

    fn start(&mut self, config: Option<GameConfig>) {
        self.deadline = None;
        self.game.new_game(config);
        self.notify();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline.map(|(_, at)| at)
    }

    pub fn time_until_resolution(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|(_, at)| at.saturating_duration_since(now))
    }

    pub fn poll(&mut self) -> ResolveOutcome {
        self.poll_at(Instant::now())
    }

    /// Fires the pending resolution once `now` has reached its deadline.
    pub fn poll_at(&mut self, now: Instant) -> ResolveOutcome {
        let Some((ticket, at)) = self.deadline else {
            return ResolveOutcome::NoChange;
        };
        if now < at {
            return ResolveOutcome::NoChange;
        }

        self.deadline = None;
        let outcome = self.game.resolve(ticket);
        if outcome.has_update() {
            self.notify();
        }
        outcome
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.game.snapshot();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("game", &self.game)
            .field("deadline", &self.deadline)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
