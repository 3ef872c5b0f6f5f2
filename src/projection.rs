use crate::{
    Artwork, ArtworkSource, ErrorMessageProvider, PlaybackError, PlaybackState, PlayerSnapshot,
    ShowBuffering, SurfaceKind, VideoSize, ViewOptions,
};
use log::debug;

/// Accessibility label of the view, describing what a tap does.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ContentDescription {
    /// Tapping shows the controller
    ShowControls,
    /// Tapping hides the controller
    HideControls,
}

impl ContentDescription {
    /// English label for assistive technology.
    pub fn label(&self) -> &'static str {
        match self {
            ContentDescription::ShowControls => "Show player controls",
            ContentDescription::HideControls => "Hide player controls",
        }
    }
}

/// Artwork on screen and where it came from.
#[derive(PartialEq, Clone, Debug)]
pub struct ShownArtwork {
    /// Where it came from
    pub source: ArtworkSource,
    /// The image
    pub artwork: Artwork,
}

/// What the host should currently display.
#[derive(PartialEq, Clone, Debug)]
pub struct ProjectionResult {
    /// `None` hides the artwork element
    pub artwork: Option<ShownArtwork>,
    /// Opaque overlay hiding the rendering surface
    pub shutter_visible: bool,
    /// Spinner shown
    pub buffering_visible: bool,
    /// Text of the error banner
    pub error_message: Option<String>,
    /// Timeout applied when the controller is shown, `0` meaning indefinitely
    pub controller_show_timeout_ms: i32,
    /// Width over height of the content, `0` when unknown
    pub content_aspect_ratio: f32,
    /// Rotation applied by the texture transform, in degrees
    pub texture_rotation_degrees: u16,
    /// Accessibility label
    pub content_description: Option<ContentDescription>,
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self {
            artwork: None,
            shutter_visible: true,
            buffering_visible: false,
            error_message: None,
            controller_show_timeout_ms: 0,
            content_aspect_ratio: 0.0,
            texture_rotation_degrees: 0,
            content_description: None,
        }
    }
}

impl ProjectionResult {
    /// Artwork is shown.
    pub fn artwork_visible(&self) -> bool {
        self.artwork.is_some()
    }

    /// Video frames are visible, i.e. not covered by the shutter.
    pub fn video_visible(&self) -> bool {
        !self.shutter_visible
    }

    fn hide_artwork(&mut self) {
        self.artwork = None;
    }

    fn close_shutter(&mut self) {
        self.shutter_visible = true;
    }

    /// Shows `artwork` if it has a usable size.
    fn show_artwork(&mut self, source: ArtworkSource, artwork: Artwork) -> bool {
        match artwork.aspect_ratio() {
            Some(ratio) => {
                self.content_aspect_ratio = ratio;
                self.artwork = Some(ShownArtwork { source, artwork });
                true
            }
            None => false,
        }
    }
}

/// Whether the spinner shows for `state` under `policy`.
pub fn buffering_visible(
    state: PlaybackState,
    play_when_ready: bool,
    policy: ShowBuffering,
) -> bool {
    state == PlaybackState::Buffering
        && match policy {
            ShowBuffering::Never => false,
            ShowBuffering::WhenPlaying => play_when_ready,
            ShowBuffering::Always => true,
        }
}

/// Text of the error banner. A custom message always wins over player errors.
pub fn error_message(
    custom: Option<&str>,
    error: Option<&PlaybackError>,
    provider: Option<&ErrorMessageProvider>,
) -> Option<String> {
    if let Some(msg) = custom.filter(|m| !m.is_empty()) {
        return Some(msg.to_string());
    }
    match (error, provider) {
        (Some(e), Some(p)) => Some(p(e)),
        _ => None,
    }
}

/// Aspect ratio the content frame should take for `size` rendered on `surface`.
pub fn video_aspect_ratio(size: &VideoSize, surface: SurfaceKind) -> f32 {
    if surface.ignores_aspect_ratio() || size.is_unknown() {
        return 0.0;
    }
    let ratio = (size.width as f32 * size.pixel_aspect_ratio) / size.height as f32;
    if ratio > 0.0
        && surface.swaps_axes_on_rotation()
        && matches!(size.unapplied_rotation_degrees, 90 | 270)
    {
        1.0 / ratio
    } else {
        ratio
    }
}

/// Label for the current controller state.
pub fn content_description(
    use_controller: bool,
    controller_visible: bool,
    hide_on_touch: bool,
) -> Option<ContentDescription> {
    if !use_controller {
        None
    } else if controller_visible {
        hide_on_touch.then_some(ContentDescription::HideControls)
    } else {
        Some(ContentDescription::ShowControls)
    }
}

/// Updates shutter and artwork for the tracks of `player`.
///
/// With `is_new_player` the previous player's last frame is covered before the new one renders.
/// The shutter is never opened here, that waits for the first rendered frame.
pub fn reconcile_tracks(
    projection: &mut ProjectionResult,
    player: Option<&PlayerSnapshot>,
    options: &ViewOptions,
    is_new_player: bool,
) {
    let Some(player) = player.filter(|p| p.has_tracks()) else {
        if !options.keep_content_on_player_reset {
            projection.hide_artwork();
            projection.close_shutter();
        }
        return;
    };

    if is_new_player && !options.keep_content_on_player_reset {
        projection.close_shutter();
    }

    if player.tracks.is_some_and(|t| t.is_video_selected()) {
        projection.hide_artwork();
        return;
    }

    projection.close_shutter();
    if options.use_artwork {
        if let Some(data) = player.artwork_data.as_deref() {
            match Artwork::decode(data) {
                Ok(artwork) => {
                    if projection.show_artwork(ArtworkSource::MediaMetadata, artwork) {
                        return;
                    }
                }
                Err(e) => debug!("Ignoring media artwork: {:#}", e),
            }
        }
        if let Some(artwork) = options.default_artwork.clone() {
            if projection.show_artwork(ArtworkSource::Default, artwork) {
                return;
            }
        }
    }
    projection.hide_artwork();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::encode_png;
    use crate::Tracks;
    use egui::Color32;

    fn audio_only() -> PlayerSnapshot {
        PlayerSnapshot {
            tracks: Some(Tracks {
                groups: 1,
                video_selected: false,
            }),
            ..Default::default()
        }
    }

    fn with_video() -> PlayerSnapshot {
        PlayerSnapshot {
            tracks: Some(Tracks {
                groups: 2,
                video_selected: true,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_buffering_policy() {
        use PlaybackState::*;
        for state in [Idle, Buffering, Ready, Ended] {
            for pwr in [false, true] {
                assert!(!buffering_visible(state, pwr, ShowBuffering::Never));
                assert_eq!(
                    buffering_visible(state, pwr, ShowBuffering::Always),
                    state == Buffering
                );
                assert_eq!(
                    buffering_visible(state, pwr, ShowBuffering::WhenPlaying),
                    state == Buffering && pwr
                );
            }
        }
    }

    #[test]
    fn test_error_precedence() {
        let provider: ErrorMessageProvider = Box::new(|e| format!("Playback failed: {}", e.message));
        let error = PlaybackError {
            code: 2001,
            message: "source unreachable".to_string(),
        };
        assert_eq!(
            error_message(Some("custom"), Some(&error), Some(&provider)).as_deref(),
            Some("custom")
        );
        assert_eq!(
            error_message(None, Some(&error), Some(&provider)).as_deref(),
            Some("Playback failed: source unreachable")
        );
        assert_eq!(error_message(Some(""), Some(&error), None), None);
        assert_eq!(error_message(None, None, Some(&provider)), None);
    }

    #[test]
    fn test_aspect_ratio() {
        let portrait = VideoSize::new(1080, 1920).with_rotation(90);
        let ratio = video_aspect_ratio(&portrait, SurfaceKind::Texture);
        assert!((ratio - 1920. / 1080.).abs() < 1e-5);
        let ratio = video_aspect_ratio(&portrait, SurfaceKind::Surface);
        assert!((ratio - 1080. / 1920.).abs() < 1e-5);

        let wide = VideoSize::new(100, 100).with_pixel_aspect_ratio(2.0);
        assert_eq!(video_aspect_ratio(&wide, SurfaceKind::Texture), 2.0);
        assert_eq!(video_aspect_ratio(&wide, SurfaceKind::SphericalGl), 0.0);
        assert_eq!(video_aspect_ratio(&VideoSize::new(0, 720), SurfaceKind::Surface), 0.0);
        assert_eq!(video_aspect_ratio(&VideoSize::UNKNOWN, SurfaceKind::Texture), 0.0);
    }

    #[test]
    fn test_no_tracks_closes_shutter() {
        let options = ViewOptions::default();
        for snapshot in [None, Some(PlayerSnapshot::default())] {
            let mut projection = ProjectionResult {
                shutter_visible: false,
                artwork: Some(ShownArtwork {
                    source: ArtworkSource::Default,
                    artwork: Artwork::solid([2, 2], Color32::RED),
                }),
                ..Default::default()
            };
            reconcile_tracks(&mut projection, snapshot.as_ref(), &options, true);
            assert!(projection.shutter_visible);
            assert!(!projection.artwork_visible());
        }
    }

    #[test]
    fn test_no_tracks_keeps_content() {
        let options = ViewOptions {
            keep_content_on_player_reset: true,
            ..Default::default()
        };
        let mut projection = ProjectionResult {
            shutter_visible: false,
            ..Default::default()
        };
        let before = projection.clone();
        reconcile_tracks(&mut projection, None, &options, true);
        assert_eq!(projection, before);
    }

    #[test]
    fn test_video_track_leaves_shutter_alone() {
        let options = ViewOptions::default();
        let mut projection = ProjectionResult {
            shutter_visible: false,
            ..Default::default()
        };
        reconcile_tracks(&mut projection, Some(&with_video()), &options, false);
        assert!(!projection.shutter_visible);
        assert!(!projection.artwork_visible());

        reconcile_tracks(&mut projection, Some(&with_video()), &options, true);
        assert!(projection.shutter_visible);
    }

    #[test]
    fn test_metadata_artwork() {
        let mut snapshot = audio_only();
        snapshot.artwork_data = Some(encode_png(300, 100));
        let mut projection = ProjectionResult {
            shutter_visible: false,
            ..Default::default()
        };
        reconcile_tracks(&mut projection, Some(&snapshot), &ViewOptions::default(), false);
        assert!(projection.shutter_visible);
        let shown = projection.artwork.as_ref().unwrap();
        assert_eq!(shown.source, ArtworkSource::MediaMetadata);
        assert_eq!(projection.content_aspect_ratio, 3.0);
    }

    #[test]
    fn test_broken_artwork_falls_back_to_default() {
        let mut snapshot = audio_only();
        snapshot.artwork_data = Some(b"\x89PNG broken".to_vec());
        let options = ViewOptions {
            default_artwork: Some(Artwork::solid([40, 20], Color32::GRAY)),
            ..Default::default()
        };
        let mut projection = ProjectionResult::default();
        reconcile_tracks(&mut projection, Some(&snapshot), &options, false);
        assert_eq!(
            projection.artwork.as_ref().map(|a| a.source),
            Some(ArtworkSource::Default)
        );
        assert_eq!(projection.content_aspect_ratio, 2.0);
    }

    #[test]
    fn test_unusable_artwork_is_hidden() {
        let options = ViewOptions {
            default_artwork: Some(Artwork::solid([0, 20], Color32::GRAY)),
            ..Default::default()
        };
        let mut projection = ProjectionResult::default();
        reconcile_tracks(&mut projection, Some(&audio_only()), &options, false);
        assert!(!projection.artwork_visible());
        assert!(projection.shutter_visible);

        let options = ViewOptions {
            use_artwork: false,
            default_artwork: Some(Artwork::solid([20, 20], Color32::GRAY)),
            ..Default::default()
        };
        reconcile_tracks(&mut projection, Some(&audio_only()), &options, false);
        assert!(!projection.artwork_visible());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut snapshot = audio_only();
        snapshot.artwork_data = Some(encode_png(8, 8));
        let options = ViewOptions::default();
        let mut first = ProjectionResult::default();
        reconcile_tracks(&mut first, Some(&snapshot), &options, false);
        let mut second = first.clone();
        reconcile_tracks(&mut second, Some(&snapshot), &options, false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_artwork_never_over_video() {
        let options = ViewOptions::default();
        let mut projection = ProjectionResult::default();
        for snapshot in [audio_only(), with_video(), PlayerSnapshot::default()] {
            reconcile_tracks(&mut projection, Some(&snapshot), &options, false);
            assert!(!(projection.artwork_visible() && projection.video_visible()));
        }
    }

    #[test]
    fn test_content_description() {
        assert_eq!(content_description(false, true, true), None);
        assert_eq!(
            content_description(true, false, false),
            Some(ContentDescription::ShowControls)
        );
        assert_eq!(
            content_description(true, true, true),
            Some(ContentDescription::HideControls)
        );
        assert_eq!(content_description(true, true, false), None);
    }
}
