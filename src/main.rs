mod display;

use std::io::{stdout, BufWriter};
use std::rc::Rc;
use std::sync::{mpsc, Mutex};
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use heart_battle::compute::Steering;
use heart_battle::config::Settings;
use heart_battle::error::{GameError, Result};
use heart_battle::input::HeldKeys;
use heart_battle::round::{Controller, Controls};
use heart_battle::session::{play, GameSummary};

use display::{TerminalPresenter, TerminalScreen};

// ── Terminal input ────────────────────────────────────────────────────────────

/// Drains the event channel once per frame and turns the set of held keys
/// into a steering vector, so diagonals work by holding two keys.
struct TerminalControls {
    rx: Rc<mpsc::Receiver<Event>>,
    held: HeldKeys,
}

impl TerminalControls {
    fn new(rx: Rc<mpsc::Receiver<Event>>) -> Self {
        Self {
            rx,
            held: HeldKeys::new(),
        }
    }
}

impl Controls for TerminalControls {
    fn poll(&mut self) -> Result<Steering> {
        self.held.next_frame();

        loop {
            let event = match self.rx.try_recv() {
                Ok(event) => event,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Err(GameError::InputClosed),
            };
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            if kind == KeyEventKind::Press {
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Err(GameError::Quit);
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Err(GameError::Quit);
                    }
                    _ => {}
                }
            }
            self.held.record(code, kind);
        }

        Ok(self.held.steering())
    }

    fn reset(&mut self) {
        self.held.clear();
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so traces go to a file.
fn init_logging(settings: &Settings) -> Result<()> {
    let path = settings
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("heart_battle.log"));
    let file = std::fs::File::create(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heart_battle=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    tracing::info!("Heart Battle starting, log at {}", path.display());
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let settings = Settings::load(&Settings::default_path())?;
    init_logging(&settings)?;

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(settings, Rc::new(rx));

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match result {
        Ok(summary) => {
            let verdict = if summary.won { "You won!" } else { "Game over." };
            println!("{} Round {}, score {}", verdict, summary.final_round, summary.score);
            Ok(())
        }
        Err(GameError::Quit) => {
            tracing::info!("quit by player");
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            Err(e)
        }
    }
}

fn run(settings: Settings, rx: Rc<mpsc::Receiver<Event>>) -> Result<GameSummary> {
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let starting_health = settings.starting_health;

    let controls = TerminalControls::new(Rc::clone(&rx));
    let screen = TerminalScreen::new(BufWriter::new(stdout()));
    let mut controller = Controller::new(settings, controls, screen, rng);
    let mut presenter = TerminalPresenter::new(BufWriter::new(stdout()), rx);

    play(&mut controller, &mut presenter, starting_health)
}
