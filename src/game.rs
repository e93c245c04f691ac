//! Core game state and logic

use crate::bag::Bag;
use crate::board::Board;
use crate::gravity::{FallTimer, Tick, fall_interval};
use crate::piece::Piece;
use crate::score::Score;
use crate::settings::{Settings, SpeedSettings};
use crate::store::TopScoreStore;
use crate::tetromino::{Orientation, TetrominoType};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// A new piece could not be placed; only a restart continues
    GameOver,
}

/// Input commands the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    HardDrop,
    Restart,
    ToggleHelp,
    Quit,
}

/// The main game struct
pub struct Game<S: TopScoreStore> {
    /// The game board, with the falling piece painted into it
    pub board: Board,
    /// Current falling piece
    current_piece: Option<Piece>,
    /// Piece bag randomizer
    bag: Bag,
    /// Score tracking
    pub score: Score,
    /// Current game state
    pub state: GameState,
    /// Whether the controls overlay is up (gravity waits while it is)
    pub show_help: bool,
    speed: SpeedSettings,
    timer: FallTimer,
    store: S,
}

impl<S: TopScoreStore> Game<S> {
    /// Create a new game with a random seed
    pub fn new(settings: &Settings, store: S) -> Self {
        Self::with_seed(settings, store, rand::random())
    }

    /// Create a new game whose piece sequence is fixed by `seed`
    pub fn with_seed(settings: &Settings, mut store: S, seed: u64) -> Self {
        let stored = store.load_top_score();
        if stored.is_none() {
            // First launch: remember it so the controls are only shown once
            if let Err(e) = store.save_top_score(0) {
                warn!("Could not initialise score file: {}", e);
            }
        }

        let interval = fall_interval(&settings.speed, 0);
        let mut game = Self {
            board: Board::new(settings.board.width, settings.board.height),
            current_piece: None,
            bag: Bag::with_seed(seed),
            score: Score::new(stored.unwrap_or(0)),
            state: GameState::Playing,
            show_help: stored.is_none(),
            speed: settings.speed.clone(),
            timer: FallTimer::new(Instant::now(), interval),
            store,
        };

        info!(seed, top_score = game.score.top_score, "New session");
        let first = game.bag.next_piece();
        game.spawn_next(first);
        game
    }

    /// The falling piece, if any
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    /// Columns last painted by the falling piece
    pub fn touched_columns(&self) -> Option<(i32, i32)> {
        self.current_piece.as_ref().and_then(Piece::columns)
    }

    /// Upcoming pieces
    pub fn preview(&self, count: usize) -> Vec<TetrominoType> {
        self.bag.preview(count).collect()
    }

    /// The score store
    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current fall interval
    pub fn fall_interval(&self) -> Duration {
        fall_interval(&self.speed, self.score.level)
    }

    /// Where new pieces put their pivot: top row, centre column
    fn spawn_position(&self) -> (i32, i32) {
        ((self.board.width() / 2) as i32, 0)
    }

    /// Clear finished rows, score them, then place a new piece.
    ///
    /// Returns false and ends the game if the piece does not fit; the board is
    /// left untouched by the failed placement.
    pub fn spawn_next(&mut self, kind: TetrominoType) -> bool {
        // The previous piece stays painted where it landed
        self.current_piece = None;

        let cleared = self.board.clear_full_rows();
        let update = self.score.apply_clear(cleared);
        if cleared > 0 {
            debug!(cleared, delta = update.delta, points = self.score.points, "Cleared rows");
        }
        if update.leveled_up {
            info!(level = self.score.level, lines = self.score.lines, "Level up");
        }
        if update.new_top {
            self.save_top_score();
        }

        let (x, y) = self.spawn_position();
        let mut piece = Piece::new(kind);
        if !piece.test_placement(&self.board, x, y, Orientation::Top) {
            info!(points = self.score.points, lines = self.score.lines, "Game over");
            self.state = GameState::GameOver;
            return false;
        }

        piece.commit(&mut self.board, x, y, Orientation::Top);
        debug!(?kind, x, y, "Spawned");
        self.current_piece = Some(piece);
        true
    }

    fn save_top_score(&mut self) {
        let top = self.score.top_score;
        match self.store.save_top_score(top) {
            Ok(()) => debug!(top, "Saved top score"),
            Err(e) => warn!("Could not save top score: {}", e),
        }
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::Restart => self.restart(),
            Action::ToggleHelp => self.show_help = !self.show_help,
            // Handled by the caller
            Action::Quit => {}
            _ if self.state == GameState::GameOver || self.show_help => {}
            Action::MoveLeft => self.move_column(-1),
            Action::MoveRight => self.move_column(1),
            Action::MoveDown => self.move_down(),
            Action::Rotate => self.rotate(),
            Action::HardDrop => self.hard_drop(),
        }
    }

    fn move_column(&mut self, dx: i32) {
        if let Some(piece) = &mut self.current_piece {
            piece.move_column(&mut self.board, dx);
        }
    }

    fn move_down(&mut self) {
        if let Some(piece) = &mut self.current_piece {
            piece.move_down(&mut self.board);
        }
    }

    fn rotate(&mut self) {
        if let Some(piece) = &mut self.current_piece {
            piece.rotate(&mut self.board);
        }
    }

    fn hard_drop(&mut self) {
        if let Some(piece) = &mut self.current_piece {
            let distance = piece.hard_drop(&mut self.board);
            debug!(distance, kind = ?piece.piece_type(), "Hard drop");
            self.lock_and_spawn();
        }
    }

    /// The current piece is done; bring in the next one
    fn lock_and_spawn(&mut self) {
        let next = self.bag.next_piece();
        self.spawn_next(next);
    }

    /// One gravity step: move down, or lock and spawn if the piece has landed
    pub fn gravity_step(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        let landed = match &mut self.current_piece {
            Some(piece) => !piece.move_down(&mut self.board),
            None => true,
        };
        if landed {
            self.lock_and_spawn();
        }
    }

    /// Returns a tick if gravity is due
    pub fn poll_tick(&mut self, now: Instant) -> Option<Tick> {
        if self.state != GameState::Playing || self.show_help {
            return None;
        }
        let interval = self.fall_interval();
        self.timer.poll(now, interval)
    }

    /// Run a tick, unless it was scheduled before the last restart
    pub fn on_tick(&mut self, tick: Tick) {
        if !self.timer.is_current(tick) {
            debug!("Dropping stale gravity tick");
            return;
        }
        self.gravity_step();
    }

    /// Update game state (call every frame)
    pub fn update(&mut self, now: Instant) {
        if let Some(tick) = self.poll_tick(now) {
            self.on_tick(tick);
        }
    }

    /// Start a new session with a random seed
    pub fn restart(&mut self) {
        self.restart_with_seed(rand::random());
    }

    /// Start a new session: fresh board, score and bag, keeping the top score
    pub fn restart_with_seed(&mut self, seed: u64) {
        info!(seed, "Restart");
        self.board = Board::new(self.board.width(), self.board.height());
        self.current_piece = None;
        self.bag = Bag::with_seed(seed);
        self.score = Score::new(self.score.top_score);
        self.state = GameState::Playing;
        self.timer.reset(Instant::now(), fall_interval(&self.speed, 0));

        let first = self.bag.next_piece();
        self.spawn_next(first);
    }
}
