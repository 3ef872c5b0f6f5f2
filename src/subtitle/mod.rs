use crate::Cue;
use egui::{Align2, Color32, Margin, Pos2};

/// A cue styled for display over the video.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtitle {
    /// Text to display
    pub text: String,
    /// Anchor within the video rect
    pub alignment: Align2,
    /// Text color
    pub primary_fill: Color32,
    /// Explicit position, overriding the alignment
    pub position: Option<Pos2>,
    /// Font size in points
    pub font_size: f32,
    /// Distance kept from the video edges
    pub margin: Margin,
}

impl Default for Subtitle {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 30.,
            margin: Margin::same(24),
            alignment: Align2::CENTER_BOTTOM,
            primary_fill: Color32::WHITE,
            position: None,
        }
    }
}

impl Subtitle {
    /// Default styled subtitle showing `text`.
    pub fn from_text(text: &str) -> Self {
        Subtitle::default().with_text(text)
    }

    /// Default styled subtitle for `cue`.
    pub fn from_cue(cue: &Cue) -> Self {
        Self::from_text(&cue.text)
    }

    /// Replace the text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = String::from(text);
        self
    }

    /// Replace the font size.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }
}

/// Styles `cues` for display, dropping blank ones.
pub(crate) fn subtitles_for(cues: &[Cue]) -> Vec<Subtitle> {
    cues.iter()
        .filter(|c| !c.text.trim().is_empty())
        .map(Subtitle::from_cue)
        .collect()
}
