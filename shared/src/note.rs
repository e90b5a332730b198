use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Ids are the creation time in whole milliseconds.
    pub fn from_timestamp(millis: u64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The five-entry palette. Serialized as the `color-N` class names.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ColorClass {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
}

impl ColorClass {
    pub const ALL: [ColorClass; 5] = [
        ColorClass::Red,
        ColorClass::Orange,
        ColorClass::Yellow,
        ColorClass::Green,
        ColorClass::Blue,
    ];

    /// 1-based palette slot, matching the number-key shortcuts.
    pub fn number(self) -> u8 {
        match self {
            ColorClass::Red => 1,
            ColorClass::Orange => 2,
            ColorClass::Yellow => 3,
            ColorClass::Green => 4,
            ColorClass::Blue => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=5 => Some(Self::ALL[usize::from(number - 1)]),
            _ => None,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let digit = chars.next()?.to_digit(10)?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_number(digit as u8)
    }

    /// Maps a uniform sample in `[0, 1)` onto the palette.
    pub fn from_unit(sample: f64) -> Self {
        let sample = if sample.is_finite() { sample } else { 0.0 };
        let index = (sample * Self::ALL.len() as f64).floor() as isize;
        let index = index.clamp(0, Self::ALL.len() as isize - 1) as usize;
        Self::ALL[index]
    }

    pub fn class_name(self) -> &'static str {
        match self {
            ColorClass::Red => "color-1",
            ColorClass::Orange => "color-2",
            ColorClass::Yellow => "color-3",
            ColorClass::Green => "color-4",
            ColorClass::Blue => "color-5",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            ColorClass::Red => "#FFADAD",
            ColorClass::Orange => "#FFD6A5",
            ColorClass::Yellow => "#FDFFB6",
            ColorClass::Green => "#CAFFBF",
            ColorClass::Blue => "#A0C4FF",
        }
    }
}

impl From<String> for ColorClass {
    fn from(value: String) -> Self {
        value
            .strip_prefix("color-")
            .and_then(ColorClass::from_key)
            .unwrap_or(ColorClass::Yellow)
    }
}

impl From<ColorClass> for String {
    fn from(value: ColorClass) -> Self {
        value.class_name().to_string()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub content: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_percent: Option<f64>,
    pub color_class: ColorClass,
    #[serde(default)]
    pub z_index: i64,
}

impl Note {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn percent(&self) -> Option<Point> {
        match (self.x_percent, self.y_percent) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    pub fn same_except_position(&self, other: &Note) -> bool {
        self.id == other.id
            && self.content == other.content
            && self.color_class == other.color_class
            && self.z_index == other.z_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_class_uses_css_class_names_on_the_wire() {
        let json = serde_json::to_string(&ColorClass::Green).unwrap();
        assert_eq!(json, "\"color-4\"");
        let parsed: ColorClass = serde_json::from_str("\"color-1\"").unwrap();
        assert_eq!(parsed, ColorClass::Red);
    }

    #[test]
    fn unknown_color_class_falls_back_to_yellow() {
        let parsed: ColorClass = serde_json::from_str("\"color-9\"").unwrap();
        assert_eq!(parsed, ColorClass::Yellow);
    }

    #[test]
    fn unit_samples_cover_the_palette() {
        assert_eq!(ColorClass::from_unit(0.0), ColorClass::Red);
        assert_eq!(ColorClass::from_unit(0.39), ColorClass::Orange);
        assert_eq!(ColorClass::from_unit(0.5), ColorClass::Yellow);
        assert_eq!(ColorClass::from_unit(0.999_999), ColorClass::Blue);
        assert_eq!(ColorClass::from_unit(1.0), ColorClass::Blue);
    }

    #[test]
    fn number_keys_map_to_palette_slots() {
        assert_eq!(ColorClass::from_key("2"), Some(ColorClass::Orange));
        assert_eq!(ColorClass::from_key("6"), None);
        assert_eq!(ColorClass::from_key("12"), None);
        assert_eq!(ColorClass::from_key("n"), None);
    }
}
