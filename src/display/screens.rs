//! Between-round screens. Each one clears the terminal, prints a few centred
//! lines and blocks until a key is pressed.

use std::io::Write;
use std::rc::Rc;
use std::sync::mpsc;

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use heart_battle::error::{GameError, Result};
use heart_battle::rounds::ROUND_COUNT;
use heart_battle::session::Presenter;

pub struct TerminalPresenter<W: Write> {
    out: W,
    rx: Rc<mpsc::Receiver<Event>>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, rx: Rc<mpsc::Receiver<Event>>) -> Self {
        Self { out, rx }
    }

    fn show(&mut self, lines: &[(&str, Color)]) -> Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        let (width, height) = terminal::size()?;
        let cx = width / 2;
        let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

        for (i, (msg, color)) in lines.iter().enumerate() {
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(*msg))?;
        }

        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        self.wait_for_key()
    }

    /// Block until a key press. Q / Esc / Ctrl-C abort the game.
    fn wait_for_key(&mut self) -> Result<()> {
        // Drop keys still queued from gameplay.
        while self.rx.try_recv().is_ok() {}
        loop {
            match self.rx.recv() {
                Ok(Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    modifiers,
                    ..
                })) => {
                    return match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Err(GameError::Quit),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            Err(GameError::Quit)
                        }
                        _ => Ok(()),
                    };
                }
                Ok(_) => {}
                Err(_) => return Err(GameError::InputClosed),
            }
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_introduction(&mut self) -> Result<()> {
        self.show(&[
            ("♥  HEART  BATTLE  ♥", Color::Red),
            ("", Color::Reset),
            ("Survive three rounds of enemy fire.", Color::White),
            ("Ram ships to destroy them. Dodge everything else.", Color::White),
            ("", Color::Reset),
            ("← ↑ ↓ → / W A S D : Move   Q : Quit", Color::DarkGrey),
            ("", Color::Reset),
            ("Press any key", Color::Yellow),
        ])
    }

    fn show_round_info(&mut self, round: u8) -> Result<()> {
        let title = format!("ROUND {} / {}", round, ROUND_COUNT);
        let hint = match round {
            1 => "Ships fire aimed shots.",
            2 => "Watch for lasers sweeping the lanes.",
            _ => "Bombs detonate in a wide blast. Keep your distance.",
        };
        self.show(&[
            (title.as_str(), Color::Cyan),
            ("", Color::Reset),
            (hint, Color::White),
            ("", Color::Reset),
            ("Press any key", Color::Yellow),
        ])
    }

    fn show_round_complete(&mut self, round: u8, score: u32) -> Result<()> {
        let title = format!("ROUND {} CLEARED", round);
        let score_line = format!("Score: {:>6}", score);
        self.show(&[
            (title.as_str(), Color::Green),
            ("", Color::Reset),
            (score_line.as_str(), Color::Yellow),
            ("", Color::Reset),
            ("Press any key", Color::DarkGrey),
        ])
    }

    fn game_over(&mut self, won: bool, final_round: u8, score: u32) -> Result<()> {
        let (banner, color) = if won {
            ("╔════════════════════╗\n║      VICTORY       ║\n╚════════════════════╝", Color::Green)
        } else {
            ("╔════════════════════╗\n║    GAME  OVER      ║\n╚════════════════════╝", Color::Red)
        };
        let round_line = format!("Reached round {}", final_round);
        let score_line = format!("Final Score: {:>6}", score);

        let mut lines: Vec<(&str, Color)> = banner.lines().map(|l| (l, color)).collect();
        lines.push(("", Color::Reset));
        lines.push((round_line.as_str(), Color::White));
        lines.push((score_line.as_str(), Color::Yellow));
        lines.push(("", Color::Reset));
        lines.push(("Press any key", Color::DarkGrey));
        self.show(&lines)
    }
}
