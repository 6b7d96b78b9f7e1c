use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Command {
    Split,
    Pause,
    Reset,
    SaveRun,
    SavePb,
    SaveGolds,
    Resume,
    ToggleIds,
    Quit,
}

impl Command {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Self::Quit),
                _ => None,
            };
        }
        match key.code {
            KeyCode::Enter => Some(Self::Split),
            KeyCode::Char(' ') => Some(Self::Pause),
            KeyCode::Char('r') => Some(Self::Reset),
            KeyCode::Char('s') => Some(Self::SaveRun),
            KeyCode::Char('p') => Some(Self::SavePb),
            KeyCode::Char('g') => Some(Self::SaveGolds),
            KeyCode::Char('b') => Some(Self::Resume),
            KeyCode::Char('d') => Some(Self::ToggleIds),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }

    /// Key label for the footer legend.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Split => "enter",
            Self::Pause => "space",
            Self::Reset => "r",
            Self::SaveRun => "s",
            Self::SavePb => "p",
            Self::SaveGolds => "g",
            Self::Resume => "b",
            Self::ToggleIds => "d",
            Self::Quit => "q",
        }
    }

    pub const LEGEND: [Command; 9] = [
        Self::Split,
        Self::Pause,
        Self::Reset,
        Self::SaveRun,
        Self::SavePb,
        Self::SaveGolds,
        Self::Resume,
        Self::ToggleIds,
        Self::Quit,
    ];
}
