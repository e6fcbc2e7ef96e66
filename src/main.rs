//! Terminal Ten Match runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `tenmatch-term`,
//! stepping the session on a fixed 16ms timestep.

use std::env;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tenmatch::adapter::{RecordTable, SubmitOutcome, Submitter};
use tenmatch::core::{GameSession, SessionConfig, SessionEvent, SessionSnapshot};
use tenmatch::input::{handle_key_event, should_quit, Cursor, PlayerAction};
use tenmatch::term::{
    FrameBuffer, FrameExtras, GameView, PopupLayer, StatusView, SubmitView, TerminalRenderer,
    Viewport,
};
use tenmatch::types::{GridPos, TICK_MS};

fn main() -> Result<()> {
    init_logging()?;

    let config = SessionConfig::from_env();
    config.validate().context("invalid session configuration")?;

    let mut submitter = match Submitter::start_from_env() {
        Ok(submitter) => submitter,
        Err(err) => {
            warn!(error = %err, "score submission unavailable");
            None
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, submitter.as_mut());

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to the file named by `TENMATCH_LOG_PATH`; without it nothing is logged
fn init_logging() -> Result<()> {
    let Some(path) = env::var("TENMATCH_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    let file = File::create(&path).with_context(|| format!("cannot open log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Everything the loop keeps across sessions
struct App {
    base: SessionConfig,
    games: u64,
    session: GameSession,
    cursor: Cursor,
    popups: PopupLayer,
    records: RecordTable,
    status: Option<StatusView>,
    pending_submit: Option<u64>,
}

impl App {
    fn new(base: SessionConfig) -> Self {
        let session = GameSession::new(base.clone());
        info!(seed = base.seed, "session started");
        Self {
            base,
            games: 1,
            session,
            cursor: Cursor::at(GridPos::new(4, 4)),
            popups: PopupLayer::default(),
            records: RecordTable::new(),
            status: None,
            pending_submit: None,
        }
    }

    fn restart(&mut self) {
        let seed = self.base.seed.wrapping_add(self.games);
        self.games += 1;
        self.session = GameSession::new(self.base.clone().with_seed(seed));
        self.popups.clear();
        self.status = None;
        self.pending_submit = None;
        info!(seed, "session restarted");
    }

    fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::MoveCursor(dir) => {
                self.cursor.step(dir);
            }
            PlayerAction::Select => {
                if let Some(id) = self.session.tile_at(self.cursor.pos()) {
                    self.session.select(id);
                }
            }
            PlayerAction::Slide(dir) => {
                if let Some(id) = self.session.selected() {
                    self.session.slide(id, dir);
                }
            }
            PlayerAction::Restart => self.restart(),
        }
    }

    fn drain_events(&mut self, submitter: Option<&mut Submitter>) {
        let mut ended = false;
        for event in self.session.drain_events() {
            self.popups.observe(&event);
            ended |= matches!(event, SessionEvent::Ended(_));
        }
        if ended {
            self.finish(submitter);
        }
    }

    fn finish(&mut self, submitter: Option<&mut Submitter>) {
        let (Some(result), Some(reason)) = (self.session.result(), self.session.end_reason()) else {
            return;
        };
        let rank = self.records.record(result, reason);
        info!(total = result.total, ?rank, "session recorded");

        let submit = match submitter {
            Some(submitter) => {
                let seq = submitter.submit(
                    unix_ms(),
                    self.session.score(),
                    self.session.remaining_secs(),
                );
                self.pending_submit = Some(seq);
                SubmitView::Pending
            }
            None => SubmitView::Off,
        };
        self.status = Some(StatusView { rank, submit });
    }

    fn poll_submission(&mut self, submitter: &mut Submitter) {
        while let Some(outcome) = submitter.try_recv_outcome() {
            if self.pending_submit != Some(outcome.seq()) {
                continue;
            }
            self.pending_submit = None;
            if let Some(status) = self.status.as_mut() {
                status.submit = match outcome {
                    SubmitOutcome::Delivered { .. } => SubmitView::Sent,
                    SubmitOutcome::Failed { .. } => SubmitView::Failed,
                };
            }
        }
    }
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn run(
    term: &mut TerminalRenderer,
    config: SessionConfig,
    mut submitter: Option<&mut Submitter>,
) -> Result<()> {
    let mut app = App::new(config);
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.session.snapshot_into(&mut snap);
        let extras = FrameExtras {
            cursor: Some(app.cursor.pos()),
            popups: Some(&app.popups),
            status: app.status.as_ref(),
        };
        view.render_into_with(&snap, &extras, Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        app.apply(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            app.session.update(TICK_MS);
            app.popups.tick(TICK_MS);
        }

        app.drain_events(submitter.as_deref_mut());
        if let Some(submitter) = submitter.as_deref_mut() {
            app.poll_submission(submitter);
        }
    }
}
