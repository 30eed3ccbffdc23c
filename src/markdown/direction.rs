//! Text direction detection.
//!
//! A block reads right-to-left as soon as it contains a single Hebrew
//! character; everything else reads left-to-right.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

impl TextDirection {
    pub fn alignment(self) -> Alignment {
        match self {
            TextDirection::Ltr => Alignment::Left,
            TextDirection::Rtl => Alignment::Right,
        }
    }

    pub fn is_rtl(self) -> bool {
        self == TextDirection::Rtl
    }
}

/// Hebrew block, U+0590..=U+05FF.
pub fn is_hebrew(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

pub fn text_direction(text: &str) -> TextDirection {
    if text.chars().any(is_hebrew) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_is_ltr() {
        assert_eq!(text_direction("Play something chill"), TextDirection::Ltr);
        assert_eq!(text_direction(""), TextDirection::Ltr);
    }

    #[test]
    fn test_any_hebrew_char_is_rtl() {
        assert_eq!(text_direction("שיר לריצה"), TextDirection::Rtl);
        assert_eq!(text_direction("Playlist: שלום"), TextDirection::Rtl);
        assert_eq!(text_direction("x\u{05D0}"), TextDirection::Rtl);
    }

    #[test]
    fn test_block_boundaries() {
        assert!(is_hebrew('\u{0590}'));
        assert!(is_hebrew('\u{05FF}'));
        assert!(!is_hebrew('\u{0600}'));
        // Arabic is outside the detected range
        assert_eq!(text_direction("مرحبا"), TextDirection::Ltr);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(TextDirection::Rtl.alignment(), Alignment::Right);
        assert_eq!(TextDirection::Ltr.alignment(), Alignment::Left);
    }
}
