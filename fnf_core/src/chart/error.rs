use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartErrorKind {
    Structure,
    NoteData,
    Tempo,
}

impl ChartErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            "E1001" | "E1002" => Self::Structure,
            "E2001" | "E2002" | "E2003" => Self::NoteData,
            "E3001" | "E3002" => Self::Tempo,
            _ => Self::Structure,
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}{}", location(.section, .note))]
pub struct ChartError {
    pub code: &'static str,
    pub kind: ChartErrorKind,
    pub message: String,

    pub section: Option<usize>,
    pub note: Option<usize>,
}

impl ChartError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: ChartErrorKind::from_code(code),
            message: message.into(),
            section: None,
            note: None,
        }
    }

    pub fn with_section(mut self, section: usize) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_note(mut self, note: usize) -> Self {
        self.note = Some(note);
        self
    }
}

fn location(section: &Option<usize>, note: &Option<usize>) -> String {
    match (section, note) {
        (Some(s), Some(n)) => format!(" (section {s}, note {n})"),
        (Some(s), None) => format!(" (section {s})"),
        (None, Some(n)) => format!(" (note {n})"),
        (None, None) => String::new(),
    }
}
