use egui::Id;
use egui_inbox::UiInboxSender;
use std::thread::ThreadId;

/// Capabilities a [`Player`] may or may not expose.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Command {
    /// Read the current tracks
    GetTracks,
    /// Read the timeline
    GetTimeline,
    /// Read the current media item, including the ad flag
    GetCurrentMediaItem,
    /// Read media item metadata
    GetMediaItemsMetadata,
    /// Link a rendering surface
    SetVideoSurface,
    /// Read subtitle cues
    GetText,
}

/// The playback states reported by a [`Player`].
#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum PlaybackState {
    /// Nothing is prepared.
    #[default]
    Idle,
    /// Waiting for data.
    Buffering,
    /// Able to play immediately.
    Ready,
    /// Reached the end of the media.
    Ended,
}

/// Summary of the tracks of the current media item.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Tracks {
    /// Number of track groups, selected or not
    pub groups: usize,
    /// A video track is selected for playback
    pub video_selected: bool,
}

impl Tracks {
    /// No tracks at all.
    pub const EMPTY: Tracks = Tracks {
        groups: 0,
        video_selected: false,
    };

    /// No track groups.
    pub fn is_empty(&self) -> bool {
        self.groups == 0
    }

    /// A video track is selected.
    pub fn is_video_selected(&self) -> bool {
        self.video_selected
    }
}

/// Dimensions of the video being decoded.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct VideoSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Width to height ratio of a single pixel
    pub pixel_aspect_ratio: f32,
    /// Clockwise rotation the renderer did not apply, one of 0, 90, 180 or 270
    pub unapplied_rotation_degrees: u16,
}

impl VideoSize {
    /// Size of a player that has not seen any video yet.
    pub const UNKNOWN: VideoSize = VideoSize {
        width: 0,
        height: 0,
        pixel_aspect_ratio: 1.0,
        unapplied_rotation_degrees: 0,
    };

    /// Square pixels, no rotation.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::UNKNOWN
        }
    }

    /// Rotation the surface still has to apply, in degrees clockwise.
    pub fn with_rotation(mut self, degrees: u16) -> Self {
        self.unapplied_rotation_degrees = degrees;
        self
    }

    /// Width over height of a single pixel.
    pub fn with_pixel_aspect_ratio(mut self, ratio: f32) -> Self {
        self.pixel_aspect_ratio = ratio;
        self
    }

    /// Width or height is zero.
    pub fn is_unknown(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for VideoSize {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Stable identity of a timeline period.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct PeriodUid(pub u64);

/// A part of a media item.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Period {
    /// Stable identity of the period
    pub uid: PeriodUid,
    /// Index of the window (media item) this period belongs to
    pub window_index: usize,
}

/// Ordered list of periods known to the player.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Timeline {
    periods: Vec<Period>,
}

impl Timeline {
    /// Timeline made of `periods`, in playback order.
    pub fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    /// Timeline without periods.
    pub fn empty() -> Self {
        Self::default()
    }

    /// No periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Period at `index`.
    pub fn period(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    /// Index of the period with `uid`, if still in the timeline.
    pub fn index_of_period(&self, uid: PeriodUid) -> Option<usize> {
        self.periods.iter().position(|p| p.uid == uid)
    }
}

/// Media item metadata relevant to the view.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct MediaMetadata {
    /// Encoded artwork image (png/jpeg)
    pub artwork_data: Option<Vec<u8>>,
}

/// A failure reported by the player.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PlaybackError {
    /// Player specific error code
    pub code: i32,
    /// Human readable description
    pub message: String,
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for PlaybackError {}

/// Formats a [`PlaybackError`] for display in the error banner.
pub type ErrorMessageProvider = Box<dyn Fn(&PlaybackError) -> String>;

/// A single subtitle cue.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Cue {
    /// Plain text of the cue
    pub text: String,
}

impl Cue {
    /// Cue showing `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Why the playback position jumped.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum DiscontinuityReason {
    /// Moved to the next period or item on its own
    AutoTransition,
    /// User seek
    Seek,
    /// Seek adjusted by the player
    SeekAdjustment,
    /// Period skipped, e.g. an ad
    Skip,
    /// Playing period removed from the timeline
    Remove,
    /// Player internal reasons
    Internal,
}

/// Notifications delivered by a [`Player`] to its listeners.
#[derive(PartialEq, Clone, Debug)]
pub enum PlayerEvent {
    /// New playback state
    PlaybackStateChanged(PlaybackState),
    /// Playback requested or paused
    PlayWhenReadyChanged(bool),
    /// Available or selected tracks changed
    TracksChanged,
    /// Size or rotation of the video changed
    VideoSizeChanged(VideoSize),
    /// The first frame after a surface change was rendered
    RenderedFirstFrame,
    /// Playback position jumped
    PositionDiscontinuity(DiscontinuityReason),
    /// Cues to display changed
    CuesChanged(Vec<Cue>),
    /// Error set or cleared
    PlayerErrorChanged(Option<PlaybackError>),
}

/// Handle returned by [`Player::add_listener`].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct ListenerId(pub u64);

/// Rendering target a view offers to a player.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct VideoSurface {
    /// Id of the owning view
    pub id: Id,
    /// Kind of the surface
    pub kind: crate::SurfaceKind,
}

/// The player a [`crate::PlayerView`] observes.
///
/// All methods take `&self`: the player is shared with the host and every call happens on
/// [`Player::application_thread`].
pub trait Player {
    /// Thread on which this player delivers events and must be accessed.
    fn application_thread(&self) -> ThreadId;

    /// Whether `command` may be used right now.
    fn is_command_available(&self, _command: Command) -> bool {
        true
    }

    /// Current [`PlaybackState`].
    fn playback_state(&self) -> PlaybackState;

    /// Playback proceeds once ready.
    fn play_when_ready(&self) -> bool;

    /// Whether an ad is being played right now.
    fn is_playing_ad(&self) -> bool;

    /// Last error, cleared when playback recovers.
    fn player_error(&self) -> Option<PlaybackError>;

    /// Currently available tracks.
    fn current_tracks(&self) -> Tracks;

    /// Size of the video being rendered.
    fn video_size(&self) -> VideoSize;

    /// Current timeline.
    fn current_timeline(&self) -> Timeline;

    /// Index of the playing period in the timeline.
    fn current_period_index(&self) -> usize;

    /// Index of the playing media item.
    fn current_media_item_index(&self) -> usize;

    /// Cues to display right now.
    fn current_cues(&self) -> Vec<Cue>;

    /// Metadata of the current media item.
    fn media_metadata(&self) -> MediaMetadata;

    /// Deliver [`PlayerEvent`]s to `listener` until removed.
    fn add_listener(&self, listener: UiInboxSender<PlayerEvent>) -> ListenerId;

    /// Stop delivering events to the listener `id`.
    fn remove_listener(&self, id: ListenerId);

    /// Render into `surface`.
    fn set_video_surface(&self, surface: VideoSurface);

    /// Detaches `surface` if it is the one currently attached.
    fn clear_video_surface(&self, surface: VideoSurface);
}

/// Everything the view reads from a [`Player`] when reconciling.
///
/// Captured fresh for every notification and never stored beyond it.
#[derive(Clone, Debug, Default)]
pub struct PlayerSnapshot {
    /// State when captured
    pub playback_state: PlaybackState,
    /// Play-when-ready when captured
    pub play_when_ready: bool,
    /// Current error
    pub error: Option<PlaybackError>,
    /// `None` when the player cannot report tracks
    pub tracks: Option<Tracks>,
    /// Raw ad flag, see [`PlayerSnapshot::is_playing_ad`]
    pub playing_ad: bool,
    /// Size of the video
    pub video_size: VideoSize,
    /// Encoded artwork, `None` when metadata is unavailable
    pub artwork_data: Option<Vec<u8>>,
    /// `None` when the player cannot report its timeline
    pub timeline: Option<Timeline>,
    /// Index of the playing period
    pub current_period_index: usize,
    /// Index of the playing media item
    pub current_media_item_index: usize,
}

impl PlayerSnapshot {
    /// Read everything from `player`, skipping unavailable commands.
    pub fn capture(player: &dyn Player) -> Self {
        let tracks = player
            .is_command_available(Command::GetTracks)
            .then(|| player.current_tracks());
        let timeline = player
            .is_command_available(Command::GetTimeline)
            .then(|| player.current_timeline());
        let artwork_data = if player.is_command_available(Command::GetMediaItemsMetadata) {
            player.media_metadata().artwork_data
        } else {
            None
        };
        Self {
            playback_state: player.playback_state(),
            play_when_ready: player.play_when_ready(),
            error: player.player_error(),
            tracks,
            playing_ad: player.is_command_available(Command::GetCurrentMediaItem)
                && player.is_playing_ad(),
            video_size: player.video_size(),
            artwork_data,
            timeline,
            current_period_index: player.current_period_index(),
            current_media_item_index: player.current_media_item_index(),
        }
    }

    /// An ad is playing and playback is not paused.
    pub fn is_playing_ad(&self) -> bool {
        self.playing_ad && self.play_when_ready
    }

    /// The reported timeline, empty when unknown.
    pub fn timeline_or_empty(&self) -> &Timeline {
        static EMPTY: Timeline = Timeline {
            periods: Vec::new(),
        };
        self.timeline.as_ref().unwrap_or(&EMPTY)
    }

    /// Tracks known and non-empty.
    pub fn has_tracks(&self) -> bool {
        self.tracks.is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePlayer;

    #[test]
    fn test_snapshot_respects_missing_commands() {
        let player = FakePlayer::new();
        player.set_tracks(Tracks {
            groups: 2,
            video_selected: true,
        });
        player.set_timeline(Timeline::new(vec![Period {
            uid: PeriodUid(1),
            window_index: 0,
        }]));
        player.set_artwork_data(Some(vec![1, 2, 3]));
        player.disable_command(Command::GetTracks);
        player.disable_command(Command::GetTimeline);
        player.disable_command(Command::GetMediaItemsMetadata);

        let snapshot = PlayerSnapshot::capture(&player);
        assert_eq!(snapshot.tracks, None);
        assert!(!snapshot.has_tracks());
        assert_eq!(snapshot.timeline, None);
        assert!(snapshot.timeline_or_empty().is_empty());
        assert_eq!(snapshot.artwork_data, None);
    }

    #[test]
    fn test_ad_requires_play_when_ready() {
        let player = FakePlayer::new();
        player.set_playing_ad(true);
        player.set_play_when_ready(false);
        assert!(!PlayerSnapshot::capture(&player).is_playing_ad());

        player.set_play_when_ready(true);
        assert!(PlayerSnapshot::capture(&player).is_playing_ad());

        player.disable_command(Command::GetCurrentMediaItem);
        assert!(!PlayerSnapshot::capture(&player).is_playing_ad());
    }

    #[test]
    fn test_timeline_lookup() {
        let timeline = Timeline::new(vec![
            Period {
                uid: PeriodUid(7),
                window_index: 0,
            },
            Period {
                uid: PeriodUid(9),
                window_index: 1,
            },
        ]);
        assert_eq!(timeline.index_of_period(PeriodUid(9)), Some(1));
        assert_eq!(timeline.index_of_period(PeriodUid(3)), None);
        assert_eq!(timeline.period(1).map(|p| p.window_index), Some(1));
    }
}
