/// Keys the view reacts to.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum KeyCode {
    /// D-pad up
    DpadUp,
    /// D-pad up and right
    DpadUpRight,
    /// D-pad right
    DpadRight,
    /// D-pad down and right
    DpadDownRight,
    /// D-pad down
    DpadDown,
    /// D-pad down and left
    DpadDownLeft,
    /// D-pad left
    DpadLeft,
    /// D-pad up and left
    DpadUpLeft,
    /// D-pad center / OK
    DpadCenter,
    /// Toggle play and pause
    MediaPlayPause,
    /// Play
    MediaPlay,
    /// Pause
    MediaPause,
    /// Stop
    MediaStop,
    /// Next item
    MediaNext,
    /// Previous item
    MediaPrevious,
    /// Fast forward
    MediaFastForward,
    /// Rewind
    MediaRewind,
    /// Any other key, by platform key code
    Other(u32),
}

impl KeyCode {
    /// Directional and center keys of a D-pad.
    pub fn is_dpad(&self) -> bool {
        use KeyCode::*;
        matches!(
            self,
            DpadUp
                | DpadUpRight
                | DpadRight
                | DpadDownRight
                | DpadDown
                | DpadDownLeft
                | DpadLeft
                | DpadUpLeft
                | DpadCenter
        )
    }

    /// Keys the control bar handles itself.
    pub fn is_media_key(&self) -> bool {
        use KeyCode::*;
        matches!(
            self,
            MediaPlayPause
                | MediaPlay
                | MediaPause
                | MediaStop
                | MediaNext
                | MediaPrevious
                | MediaFastForward
                | MediaRewind
        )
    }
}

impl From<egui::Key> for KeyCode {
    fn from(key: egui::Key) -> Self {
        match key {
            egui::Key::ArrowUp => KeyCode::DpadUp,
            egui::Key::ArrowDown => KeyCode::DpadDown,
            egui::Key::ArrowLeft => KeyCode::DpadLeft,
            egui::Key::ArrowRight => KeyCode::DpadRight,
            egui::Key::Enter => KeyCode::DpadCenter,
            egui::Key::Space => KeyCode::MediaPlayPause,
            k => KeyCode::Other(k as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_classes() {
        assert!(KeyCode::DpadCenter.is_dpad());
        assert!(!KeyCode::DpadCenter.is_media_key());
        assert!(KeyCode::MediaRewind.is_media_key());
        assert!(!KeyCode::Other(42).is_dpad());
        assert_eq!(KeyCode::from(egui::Key::ArrowUp), KeyCode::DpadUp);
        assert_eq!(KeyCode::from(egui::Key::Space), KeyCode::MediaPlayPause);
    }
}
