//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (reply pending, error border up): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or background actions.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.
//!
//! ## Exchanges
//!
//! Each accepted submission spawns one tokio task that talks to the backend and
//! reports back over an `mpsc` channel: `ResponseArrived`, a pause of
//! `App::reply_delay`, then `ReplyReady`. Failures report `ExchangeFailed`.
//! Several exchanges may be in flight at once.

mod component;
mod components;
mod event;
pub mod markup;
mod ui;

use std::io::{IsTerminal, stdin, stdout};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::layout::Rect;
use uuid::Uuid;

use crate::backend::ChatBackend;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::InputHit;

const ANIMATION_FRAME: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Which region receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing goes to the input box.
    Input,
    /// Arrow keys scroll the transcript. Typing switches back to Input.
    Transcript,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            focus: Focus::Input, // User expects to type immediately
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            debug!("Focus -> {:?}", focus);
        }
        self.focus = focus;
        self.input_box.focused = focus == Focus::Input;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Keyboard enhancement lets Shift+Enter be told apart from Enter.
        // Terminals without support ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Run the chat UI until the user quits.
///
/// Without an interactive terminal there is nothing to attach to, so this
/// logs a warning and returns without touching the terminal.
pub fn run(backend: Arc<dyn ChatBackend>, config: ResolvedConfig) -> std::io::Result<()> {
    if !stdin().is_terminal() || !stdout().is_terminal() {
        warn!("Not attached to a terminal; chat UI not started");
        return Ok(());
    }

    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new();
    info!(
        "Chat UI starting (bot: {}, backend: {}, sanitize: {})",
        app.bot_name,
        app.backend.name(),
        app.sanitize_bot_html
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from exchange tasks
    let (tx, rx) = mpsc::channel();
    let mut exchanges: Vec<tokio::task::AbortHandle> = Vec::new();

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut was_animating = false;

    'main: loop {
        let now = Instant::now();
        let animating = app.is_waiting() || tui.input_box.is_flashing(now);
        // One extra frame after an animation ends so the border reverts
        if animating || was_animating {
            needs_redraw = true;
        }
        was_animating = animating;

        if needs_redraw {
            let tick = (start_time.elapsed().as_millis() / 400) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, tick))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_FRAME } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let frame_area = terminal.get_frame().area();
            let effect = dispatch(&mut app, &mut tui, event, frame_area);
            if apply_effect(effect, &app, &mut tui, &tx, &mut exchanges) {
                break 'main;
            }
        }

        // Actions from exchange tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if apply_effect(effect, &app, &mut tui, &tx, &mut exchanges) {
                break 'main;
            }
        }
    }

    for handle in exchanges.drain(..) {
        handle.abort();
    }
    ratatui::restore();
    info!("Chat UI closed ({} messages)", app.transcript.message_count());
    Ok(())
}

/// Route one terminal event to the focused component, the scroll state, or
/// the core. Returns the core's effect (`Effect::None` for UI-only events).
fn dispatch(app: &mut App, tui: &mut TuiState, event: TuiEvent, frame_area: Rect) -> Effect {
    match event {
        TuiEvent::Resize => return Effect::None,
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        TuiEvent::Escape => {
            let next = match tui.focus {
                Focus::Input => Focus::Transcript,
                Focus::Transcript => Focus::Input,
            };
            tui.set_focus(next);
            return Effect::None;
        }
        TuiEvent::MouseClick(column, row) => {
            let input_height = tui.input_box.calculate_height(frame_area.width);
            let [_, main_area, input_area] = ui::layout_areas(frame_area, input_height);
            match ui::hit_test_input(column, row, input_area) {
                InputHit::Text => {
                    tui.set_focus(Focus::Input);
                    tui.input_box.click_at(column, row, input_area);
                }
                // Clicks on the wrapper are redirected to the text field
                InputHit::Wrapper => tui.set_focus(Focus::Input),
                InputHit::Outside => {
                    if ui::hit_test_transcript(column, row, main_area) {
                        tui.set_focus(Focus::Transcript);
                    }
                }
            }
            return Effect::None;
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            return Effect::None;
        }
        _ => {}
    }

    if tui.focus == Focus::Transcript {
        match event {
            TuiEvent::CursorUp => {
                tui.message_list.handle_event(&TuiEvent::ScrollUp);
                return Effect::None;
            }
            TuiEvent::CursorDown => {
                tui.message_list.handle_event(&TuiEvent::ScrollDown);
                return Effect::None;
            }
            TuiEvent::CursorEnd => {
                tui.message_list.scroll_to_bottom();
                return Effect::None;
            }
            // Typing returns focus to the input and is not lost
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::NewLine => {
                tui.set_focus(Focus::Input);
            }
            TuiEvent::Submit => {
                tui.set_focus(Focus::Input);
                return Effect::None;
            }
            _ => return Effect::None,
        }
    }

    match tui.input_box.handle_event(&event) {
        Some(InputEvent::Submit(draft)) => update(app, Action::Submit(draft)),
        Some(InputEvent::ContentChanged) | None => Effect::None,
    }
}

/// Carry out an effect. Returns `true` when the loop should exit.
fn apply_effect(
    effect: Effect,
    app: &App,
    tui: &mut TuiState,
    tx: &mpsc::Sender<Action>,
    exchanges: &mut Vec<tokio::task::AbortHandle>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::Rejected => {
            tui.input_box.flash_error(Instant::now());
            false
        }
        Effect::SpawnRequest(message) => {
            tui.input_box.clear();
            tui.message_list.scroll_to_bottom();
            exchanges.retain(|h| !h.is_finished());
            exchanges.push(spawn_exchange(
                app.backend.clone(),
                message,
                app.reply_delay,
                tx.clone(),
            ));
            false
        }
    }
}

fn spawn_exchange(
    backend: Arc<dyn ChatBackend>,
    message: String,
    reply_delay: Duration,
    tx: mpsc::Sender<Action>,
) -> tokio::task::AbortHandle {
    tokio::spawn(run_exchange(backend, message, reply_delay, tx)).abort_handle()
}

/// One request/response round trip, reported as actions.
async fn run_exchange(
    backend: Arc<dyn ChatBackend>,
    message: String,
    reply_delay: Duration,
    tx: mpsc::Sender<Action>,
) {
    let exchange_id = Uuid::new_v4();
    let started = Instant::now();
    info!(
        "Exchange {} started via {} ({} chars)",
        exchange_id,
        backend.name(),
        message.chars().count()
    );

    match backend.send_message(&message).await {
        Ok(reply) => {
            info!(
                "Exchange {} answered in {}ms ({} bytes)",
                exchange_id,
                started.elapsed().as_millis(),
                reply.len()
            );
            if tx.send(Action::ResponseArrived).is_err() {
                warn!("Exchange {}: receiver dropped", exchange_id);
                return;
            }
            tokio::time::sleep(reply_delay).await;
            if tx.send(Action::ReplyReady(reply)).is_err() {
                warn!("Exchange {}: receiver dropped before reply", exchange_id);
            }
        }
        Err(e) => {
            warn!(
                "Exchange {} failed after {}ms (retryable: {}): {}",
                exchange_id,
                started.elapsed().as_millis(),
                e.is_retryable(),
                e
            );
            if tx.send(Action::ExchangeFailed(e.to_string())).is_err() {
                warn!("Exchange {}: receiver dropped", exchange_id);
            }
        }
    }
}
