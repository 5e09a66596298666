use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Terminal too small: need {need_w}x{need_h}, have {have_w}x{have_h}")]
    TerminalTooSmall {
        need_w: u16,
        need_h: u16,
        have_w: u16,
        have_h: u16,
    },

    #[error("Input channel closed")]
    InputClosed,

    #[error("Quit requested")]
    Quit,
}

pub type Result<T> = std::result::Result<T, GameError>;
