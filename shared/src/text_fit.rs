use crate::note::NoteId;

/// Answers whether `text` still fits inside a note when drawn at the
/// smallest allowed font size.
pub trait TextMeasure {
    fn fits(&self, id: &NoteId, text: &str) -> bool;
}

impl<F> TextMeasure for F
where
    F: Fn(&NoteId, &str) -> bool,
{
    fn fits(&self, id: &NoteId, text: &str) -> bool {
        self(id, text)
    }
}

/// Monospace approximation: `columns` characters per visual line and
/// `rows` lines per note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridMeasure {
    pub columns: usize,
    pub rows: usize,
}

impl GridMeasure {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows,
        }
    }

    pub fn line_count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        text.split('\n')
            .map(|line| line.chars().count().div_ceil(self.columns).max(1))
            .sum()
    }
}

impl TextMeasure for GridMeasure {
    fn fits(&self, _id: &NoteId, text: &str) -> bool {
        self.line_count(text) <= self.rows
    }
}

/// Kind of pending text input, as reported by `beforeinput`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Deletion,
    Insertion,
}

impl InputKind {
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type {
            "deleteContentBackward"
            | "deleteContentForward"
            | "deleteWordBackward"
            | "deleteWordForward"
            | "deleteByCut" => InputKind::Deletion,
            _ => InputKind::Insertion,
        }
    }
}
