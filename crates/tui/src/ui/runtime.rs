//! Event loop for the terminal client.
//!
//! One `tokio::select!` loop multiplexes four sources: terminal input from a
//! dedicated reader thread, the animation ticker, completed background API
//! calls, and ctrl-c. Components translate input into `Effect`s; navigation
//! effects are applied in place and data effects are handed to the command
//! layer, whose spawned tasks feed completions back in as messages.

use anyhow::Result;
use crossterm::event::MouseEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use mims_api::ApiClient;
use mims_types::{Effect, ExecOutcome, Msg};
use ratatui::{Terminal, prelude::*};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::app::App;
use crate::cmd;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;
use rat_focus::FocusBuilder;

/// Minimum spacing between forwarded mouse-move events.
const MOUSE_MOVE_THROTTLE: Duration = Duration::from_millis(16);

/// Start the blocking input reader.
///
/// `crossterm::event::read` wants to block, so it gets its own OS thread; the
/// async loop receives events over a channel. Mouse-move events are throttled
/// at the source to keep a fast pointer from flooding the channel. The thread
/// ends on read failure or when the receiving side goes away.
fn start_input_reader() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        let mut last_move: Option<Instant> = None;
        loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(error) => {
                    tracing::warn!(%error, "terminal input read failed");
                    break;
                }
            };
            if event.as_mouse_event().is_some_and(|m| m.kind == MouseEventKind::Moved) {
                if last_move.is_some_and(|at| at.elapsed() < MOUSE_MOVE_THROTTLE) {
                    continue;
                }
                last_move = Some(Instant::now());
            }
            if sender.blocking_send(event).is_err() {
                break;
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draw one frame. The focus ring is rebuilt first so structural changes
/// (route switches, opened modals) are already reflected in the ring.
fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = Rc::new(FocusBuilder::rebuild_for(app, Some(Rc::unwrap_or_clone(old_focus))));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn dispatch_input(app: &mut App, main_view: &mut MainView, input: Event) -> Vec<Effect> {
    match input {
        Event::Key(key) => main_view.handle_key_events(app, key),
        Event::Mouse(mouse) => main_view.handle_mouse_events(app, mouse),
        Event::Resize(width, height) => main_view.handle_message(app, &Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Run the terminal client until quit: terminal setup, the select loop, and
/// cleanup on the way out.
pub async fn run_app(client: ApiClient) -> Result<()> {
    let mut input_events = start_input_reader();
    let mut main_view = MainView::new();
    let mut app = App::new(client);
    let mut terminal = setup_terminal()?;

    let mut in_flight: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    let mut effects: Vec<Effect> = Vec::with_capacity(5);

    // The initial screen issues its own load, same as a route switch would.
    if let Some(view) = main_view.content_view.as_mut() {
        effects.extend(view.on_route_enter(&mut app));
    }

    // Tick fast only while something animates or effects are queued; idle at
    // a long interval otherwise so an idle client does no periodic work.
    let fast = Duration::from_millis(100);
    let idle = Duration::from_millis(5000);
    let mut tick_every = fast;
    let mut ticker = time::interval(tick_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    // Some terminals drop Resize events; track the size and synthesize them.
    let mut known_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let busy = app.is_animating() || !effects.is_empty();
        let wanted = if busy { fast } else { idle };
        if wanted != tick_every {
            tick_every = wanted;
            ticker = time::interval(tick_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            received = input_events.recv() => {
                let Some(input) = received else {
                    // Reader thread is gone; nothing more can arrive.
                    break;
                };
                if let Event::Key(key) = input
                    && key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                effects.extend(dispatch_input(&mut app, &mut main_view, input));
                needs_render = true;
            }

            // Animation tick; also the point where queued effects run.
            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, &Msg::Tick));
                needs_render = busy || !effects.is_empty();
                if !effects.is_empty() {
                    // Take the queue so effects produced while processing are
                    // deferred to the next tick instead of lost.
                    let mut batch = Vec::with_capacity(effects.len());
                    batch.append(&mut effects);

                    apply_navigation_effects(&mut app, &mut main_view, &mut batch, &mut effects);
                    let spawned = cmd::run_from_effects(&mut app, batch);
                    if !spawned.is_empty() {
                        if !app.executing {
                            app.throbber_idx = 0;
                        }
                        app.executing = true;
                        in_flight.extend(spawned);
                    }
                }
            }

            Some(joined) = in_flight.next(), if !in_flight.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecOutcome::ActionFailed(format!("Background task failed: {error}")));
                effects.extend(main_view.handle_message(&mut app, &Msg::ExecCompleted(Box::new(outcome))));
                app.executing = !in_flight.is_empty();
                needs_render = true;
            }

            _ = signal::ctrl_c() => break,
        }

        if let Ok(size) = crossterm::terminal::size()
            && known_size != Some(size)
        {
            known_size = Some(size);
            let _ = app.update(&Msg::Resize(size.0, size.1));
            needs_render = true;
        }

        if app.should_quit {
            break;
        }
        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}

/// Pull the navigation-like effects out of `batch` and apply them; the data
/// effects stay for the command layer. Route hooks may queue follow-up
/// effects (initial loads) into `queued`.
fn apply_navigation_effects(app: &mut App, main_view: &mut MainView, batch: &mut Vec<Effect>, queued: &mut Vec<Effect>) {
    let navigation = batch
        .extract_if(0.., |effect| {
            matches!(
                effect,
                Effect::SwitchTo(_) | Effect::ShowModal(_) | Effect::CloseModal | Effect::Toast(_, _) | Effect::Quit
            )
        })
        .collect::<Vec<Effect>>();

    for effect in navigation {
        match effect {
            Effect::SwitchTo(route) => {
                if route == app.route {
                    continue;
                }
                if let Some(mut view) = main_view.content_view.take() {
                    queued.extend(view.on_route_exit(app));
                }
                main_view.set_current_route(app, route);
                if let Some(view) = main_view.content_view.as_mut() {
                    queued.extend(view.on_route_enter(app));
                }
            }
            Effect::ShowModal(request) => {
                main_view.set_open_modal(app, Some(request));
            }
            Effect::CloseModal => {
                main_view.set_open_modal(app, None);
            }
            Effect::Toast(severity, message) => {
                app.push_toast(severity, message);
            }
            Effect::Quit => {
                app.should_quit = true;
            }
            _ => {}
        }
    }
}
