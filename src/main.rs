//! Astro Strike entry point
//!
//! Owns the terminal, the input thread, and the frame loop: sample input,
//! tick the simulation with the elapsed wall-clock delta, drain frame events
//! into audio cues and HUD refreshes, render.

use std::collections::HashMap;
use std::io::{BufWriter, Write, stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal,
};

use astro_strike::audio::{AudioSink, LogAudio, NullAudio, cues_for};
use astro_strike::gesture::{Gesture, GestureEdge, GestureSource, ScriptedHand};
use astro_strike::render::{self, HudModel};
use astro_strike::sim::{FrameEvent, GamePhase, SessionState, TickInput, tick};
use astro_strike::{HighScoreStore, Settings};

const FRAME: Duration = Duration::from_millis(16); // ~60 FPS target

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals without key-release events: OS
/// key-repeat refreshes the timestamp faster than the window expires.
const HOLD_WINDOW: u64 = 4;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: KeyCode, frame: u64) -> bool {
    key_frame
        .get(&key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|&k| is_held(key_frame, k, frame))
}

#[derive(Debug, Default)]
struct CliArgs {
    /// Self-playing demo through the scripted gesture source
    demo: bool,
    /// Force keyboard-only mode regardless of settings
    keyboard: bool,
    seed: Option<u64>,
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--demo" => args.demo = true,
            "--keyboard" => args.keyboard = true,
            "--seed" => {
                args.seed = iter.next().and_then(|s| s.parse().ok());
            }
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: astro-strike [--demo] [--keyboard] [--seed N]");
                std::process::exit(2);
            }
        }
    }
    args
}

/// Attach the gesture tracker. Initialization failure is non-fatal: the game
/// degrades to keyboard-only control.
fn create_gesture_source(args: &CliArgs, settings: &Settings) -> Option<Box<dyn GestureSource>> {
    if args.demo {
        log::info!("demo mode: scripted hand source attached");
        return Some(Box::new(ScriptedHand::default()));
    }
    if args.keyboard || settings.keyboard_only {
        return None;
    }
    // No camera-backed tracker is available in the terminal build
    log::warn!("hand tracker unavailable, falling back to keyboard controls");
    None
}

fn seed_for_run(args: &CliArgs, settings: &Settings, run: u64) -> u64 {
    let base = args.seed.or(settings.seed).unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0x5eed)
    });
    base.wrapping_add(run)
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = parse_args();

    let settings_path = Settings::default_path();
    let settings = Settings::load(&settings_path);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicated thread for blocking event reads so the frame loop never
    // blocks on input I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &args, &settings);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    settings.save(&settings_path);
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    args: &CliArgs,
    settings: &Settings,
) -> std::io::Result<()> {
    let mut high_scores = HighScoreStore::load(HighScoreStore::default_path());
    let mut audio: Box<dyn AudioSink> = if settings.effective_volume() > 0.0 {
        Box::new(LogAudio)
    } else {
        Box::new(NullAudio)
    };

    let (cols, rows) = terminal::size()?;
    let view = render::viewport_for(cols, rows);

    let mut run_index = 0u64;
    let mut state = SessionState::new(seed_for_run(args, settings, run_index), view);
    let mut gesture = create_gesture_source(args, settings);
    let mut edge = GestureEdge::default();
    let mut hud = HudModel::from_state(&state, high_scores.best());

    let mut input = TickInput::default();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();
    let started = Instant::now();

    let mut new_high = false;
    let mut score_submitted = false;

    // FPS over a one-second window
    let mut fps = 0u32;
    let mut fps_frames = 0u32;
    let mut fps_window = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // Drain pending input events (non-blocking)
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => {
                            input.pause = true;
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            input.bomb = true;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.phase == GamePhase::GameOver =>
                        {
                            run_index += 1;
                            state =
                                SessionState::new(seed_for_run(args, settings, run_index), view);
                            gesture = create_gesture_source(args, settings);
                            edge = GestureEdge::default();
                            hud = HudModel::from_state(&state, high_scores.best());
                            new_high = false;
                            score_submitted = false;
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // Held keys drive movement and fire
        input.left = any_held(
            &key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        );
        input.right = any_held(
            &key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        );
        input.up = any_held(
            &key_frame,
            &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
            frame,
        );
        input.down = any_held(
            &key_frame,
            &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
            frame,
        );
        input.fire = is_held(&key_frame, KeyCode::Char(' '), frame);

        // Poll the tracker; the peace edge doubles as a bomb trigger
        match gesture.as_mut() {
            Some(source) => {
                let hand = source.poll();
                let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                if let Some(change) = edge.update(hand.gesture, now_ms) {
                    if change.gesture == Gesture::Peace {
                        input.bomb = true;
                    }
                }
                input.hand = Some(hand);
            }
            None => input.hand = None,
        }

        let dt = (last_tick.elapsed().as_secs_f64() * 1000.0) as f32;
        let dt = dt.min(astro_strike::consts::MAX_FRAME_MS);
        last_tick = Instant::now();

        tick(&mut state, &input, dt);

        // One-shot inputs are consumed by exactly one tick
        input.bomb = false;
        input.pause = false;

        // Frame events drive audio and the HUD refresh
        let events = state.take_events();
        if !events.is_empty() {
            for ev in &events {
                for cue in cues_for(*ev) {
                    audio.play(*cue);
                }
            }
            if !score_submitted && events.contains(&FrameEvent::GameOver) {
                score_submitted = true;
                new_high = high_scores.submit(state.score);
            }
            hud = HudModel::from_state(&state, high_scores.best());
        }

        fps_frames += 1;
        if fps_window.elapsed() >= Duration::from_secs(1) {
            fps = fps_frames;
            fps_frames = 0;
            fps_window = Instant::now();
        }

        render::render(out, &state, settings, &hud, frame, fps, new_high)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}
