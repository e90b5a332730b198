use std::collections::HashMap;

use log::warn;

use crate::error::{BoardError, BoardResult};
use crate::note::Note;

/// Key-value blob store holding the serialized board.
pub trait Storage {
    fn load(&self, key: &str) -> BoardResult<Option<String>>;
    fn save(&mut self, key: &str, blob: &str) -> BoardResult<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self, key: &str) -> BoardResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, blob: &str) -> BoardResult<()> {
        (**self).save(key, blob)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, String>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.blobs.insert(key.to_string(), blob.into());
        storage
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }

    /// Number of writes so far.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> BoardResult<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> BoardResult<()> {
        self.blobs.insert(key.to_string(), blob.to_string());
        self.saves += 1;
        Ok(())
    }
}

pub fn encode_notes(notes: &[Note]) -> BoardResult<String> {
    Ok(serde_json::to_string(notes)?)
}

/// Parses a saved board. The blob must be a JSON array; records inside it
/// that do not look like notes are skipped.
pub fn decode_notes(blob: &str) -> BoardResult<Vec<Note>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(blob)?;
    let mut notes = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Note>(record) {
            Ok(note) => notes.push(note),
            Err(error) => warn!("skipping saved note #{index}: {error}"),
        }
    }
    Ok(notes)
}

/// Reads the board under `key`. A missing key is an empty board.
pub fn load_notes(storage: &impl Storage, key: &str) -> BoardResult<Vec<Note>> {
    match storage.load(key)? {
        Some(blob) => decode_notes(&blob),
        None => Ok(Vec::new()),
    }
}

pub fn save_notes(storage: &mut impl Storage, key: &str, notes: &[Note]) -> BoardResult<()> {
    let blob = encode_notes(notes)?;
    storage.save(key, &blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{ColorClass, NoteId};

    #[test]
    fn legacy_records_without_percentages_decode() {
        let blob = r#"[{"id":"1700000000000","content":"milk","x":40,"y":60,"colorClass":"color-2","zIndex":3}]"#;
        let notes = decode_notes(blob).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, NoteId::from("1700000000000"));
        assert_eq!(notes[0].color_class, ColorClass::Orange);
        assert_eq!(notes[0].x_percent, None);
        assert_eq!(notes[0].z_index, 3);
    }

    #[test]
    fn encoded_records_use_camel_case_fields() {
        let note = Note {
            id: NoteId::from("7"),
            content: "hi".into(),
            x: 1.0,
            y: 2.0,
            x_percent: Some(0.5),
            y_percent: Some(0.25),
            color_class: ColorClass::Blue,
            z_index: 4,
        };
        let blob = encode_notes(&[note]).unwrap();
        assert!(blob.contains("\"xPercent\":0.5"));
        assert!(blob.contains("\"colorClass\":\"color-5\""));
        assert!(blob.contains("\"zIndex\":4"));
    }

    #[test]
    fn broken_records_are_skipped_but_broken_blobs_fail() {
        let blob = r#"[{"id":"1","x":0,"y":0,"colorClass":"color-1"},{"nope":true}]"#;
        assert_eq!(decode_notes(blob).unwrap().len(), 1);
        assert!(matches!(decode_notes("{not json"), Err(BoardError::Decode(_))));
    }

    #[test]
    fn absent_key_is_an_empty_board() {
        let storage = MemoryStorage::new();
        assert!(load_notes(&storage, "postItNotes").unwrap().is_empty());
    }
}
