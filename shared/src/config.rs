use crate::note::ColorClass;

pub const NOTE_SIZE: f64 = 150.0;
pub const MAX_HISTORY_LENGTH: usize = 50;
pub const DOUBLE_DELETE_THRESHOLD_MS: f64 = 300.0;
pub const AUTOSAVE_THRESHOLD: u32 = 10;
pub const MOVE_HISTORY_THRESHOLD_PX: f64 = 5.0;
pub const STORAGE_KEY: &str = "postItNotes";
pub const RESIZE_SETTLE_MS: i32 = 50;

/// Tunables for a [`Board`](crate::controller::Board).
#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    pub note_size: f64,
    pub max_history: usize,
    pub double_delete_ms: f64,
    pub autosave_keystrokes: u32,
    pub move_threshold_px: f64,
    pub storage_key: String,
    pub resize_settle_ms: i32,
    pub default_color: ColorClass,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            note_size: NOTE_SIZE,
            max_history: MAX_HISTORY_LENGTH,
            double_delete_ms: DOUBLE_DELETE_THRESHOLD_MS,
            autosave_keystrokes: AUTOSAVE_THRESHOLD,
            move_threshold_px: MOVE_HISTORY_THRESHOLD_PX,
            storage_key: STORAGE_KEY.to_string(),
            resize_settle_ms: RESIZE_SETTLE_MS,
            default_color: ColorClass::Yellow,
        }
    }
}
