use crate::Artwork;
use egui::Color32;

/// Default time the controller stays up after an interaction, in milliseconds.
pub const DEFAULT_SHOW_TIMEOUT_MS: i32 = 5_000;

/// When the buffering spinner is shown.
#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum ShowBuffering {
    /// Never.
    #[default]
    Never,
    /// Only while buffering and playback is requested.
    WhenPlaying,
    /// Whenever the player is buffering.
    Always,
}

/// Kind of rendering surface the host put into the content frame.
#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum SurfaceKind {
    /// No rendering surface at all
    None,
    /// Plain surface, the default
    #[default]
    Surface,
    /// Texture surface, rotation applied by the view
    Texture,
    /// Spherical (360°) GL surface
    SphericalGl,
    /// Surface rendered by a GL video decoder output
    DecoderGl,
}

impl SurfaceKind {
    /// Surfaces that render unapplied rotation with a view transform, swapping the visual axes.
    pub fn swaps_axes_on_rotation(&self) -> bool {
        matches!(self, SurfaceKind::Texture)
    }

    /// Surfaces that lay out independently of the video aspect ratio.
    pub fn ignores_aspect_ratio(&self) -> bool {
        matches!(self, SurfaceKind::SphericalGl)
    }

    /// There is a surface the player can render into.
    pub fn has_surface(&self) -> bool {
        !matches!(self, SurfaceKind::None)
    }
}

/// Child elements the host actually has.
///
/// Options which need an element that is missing are configuration errors.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ViewElements {
    /// Artwork image
    pub artwork: bool,
    /// Shutter covering the surface
    pub shutter: bool,
    /// Buffering spinner
    pub buffering: bool,
    /// Error banner
    pub error_message: bool,
    /// Subtitle overlay
    pub subtitles: bool,
    /// Playback control bar
    pub controller: bool,
}

impl ViewElements {
    /// Every element present.
    pub const ALL: ViewElements = ViewElements {
        artwork: true,
        shutter: true,
        buffering: true,
        error_message: true,
        subtitles: true,
        controller: true,
    };

    /// No element present.
    pub const NONE: ViewElements = ViewElements {
        artwork: false,
        shutter: false,
        buffering: false,
        error_message: false,
        subtitles: false,
        controller: false,
    };
}

impl Default for ViewElements {
    fn default() -> Self {
        Self::ALL
    }
}

/// Configurable aspects of a [`crate::PlayerView`].
#[derive(Clone, Debug)]
pub struct ViewOptions {
    /// Show artwork when there is no video track.
    pub use_artwork: bool,
    /// Artwork used when the media carries none.
    pub default_artwork: Option<Artwork>,
    /// Keep the last frame/artwork when the player is reset or replaced.
    pub keep_content_on_player_reset: bool,
    /// When to show the buffering spinner
    pub show_buffering: ShowBuffering,
    /// Whether the control bar is used at all
    pub use_controller: bool,
    /// Tapping a visible controller hides it
    pub controller_hide_on_touch: bool,
    /// Show the controller automatically when playback ends or pauses
    pub controller_auto_show: bool,
    /// Keep the controller hidden while an ad plays
    pub controller_hide_during_ads: bool,
    /// Non-positive values keep the controller up indefinitely.
    pub controller_show_timeout_ms: i32,
    /// Kind of surface the host renders video into
    pub surface_kind: SurfaceKind,
    /// Color of the shutter
    pub shutter_color: Color32,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            use_artwork: true,
            default_artwork: None,
            keep_content_on_player_reset: false,
            show_buffering: ShowBuffering::Never,
            use_controller: true,
            controller_hide_on_touch: true,
            controller_auto_show: true,
            controller_hide_during_ads: true,
            controller_show_timeout_ms: DEFAULT_SHOW_TIMEOUT_MS,
            surface_kind: SurfaceKind::Surface,
            shutter_color: Color32::BLACK,
        }
    }
}

impl ViewOptions {
    /// Drops options the given elements cannot support.
    pub(crate) fn fit_to(mut self, elements: &ViewElements) -> Self {
        self.use_artwork &= elements.artwork;
        self.use_controller &= elements.controller;
        if !elements.controller {
            self.controller_show_timeout_ms = 0;
        }
        self
    }
}
