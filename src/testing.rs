use crate::{
    Command, Cue, DiscontinuityReason, ListenerId, MediaMetadata, PlaybackError, PlaybackState,
    Player, PlayerEvent, Timeline, Tracks, VideoSize, VideoSurface,
};
use egui::Id;
use egui_inbox::UiInboxSender;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::thread::ThreadId;

/// Surface linkage requested from a [`FakePlayer`], in call order.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum SurfaceCall {
    Set(Id),
    Clear(Id),
}

/// In-memory [`Player`] whose setters notify listeners like a real player would.
pub(crate) struct FakePlayer {
    thread: Cell<ThreadId>,
    disabled: RefCell<HashSet<Command>>,
    state: Cell<PlaybackState>,
    play_when_ready: Cell<bool>,
    playing_ad: Cell<bool>,
    error: RefCell<Option<PlaybackError>>,
    tracks: Cell<Tracks>,
    video_size: Cell<VideoSize>,
    timeline: RefCell<Timeline>,
    period_index: Cell<usize>,
    media_item_index: Cell<usize>,
    cues: RefCell<Vec<Cue>>,
    artwork_data: RefCell<Option<Vec<u8>>>,
    listeners: RefCell<Vec<(ListenerId, UiInboxSender<PlayerEvent>)>>,
    next_listener: Cell<u64>,
    surface: Cell<Option<VideoSurface>>,
    surface_calls: RefCell<Vec<SurfaceCall>>,
}

impl FakePlayer {
    pub fn new() -> Self {
        Self {
            thread: Cell::new(std::thread::current().id()),
            disabled: RefCell::new(HashSet::new()),
            state: Cell::new(PlaybackState::Idle),
            play_when_ready: Cell::new(false),
            playing_ad: Cell::new(false),
            error: RefCell::new(None),
            tracks: Cell::new(Tracks::EMPTY),
            video_size: Cell::new(VideoSize::UNKNOWN),
            timeline: RefCell::new(Timeline::empty()),
            period_index: Cell::new(0),
            media_item_index: Cell::new(0),
            cues: RefCell::new(Vec::new()),
            artwork_data: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            surface: Cell::new(None),
            surface_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn emit(&self, event: PlayerEvent) {
        self.listeners
            .borrow_mut()
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn surface(&self) -> Option<VideoSurface> {
        self.surface.get()
    }

    pub fn surface_calls(&self) -> Vec<SurfaceCall> {
        self.surface_calls.borrow().clone()
    }

    pub fn set_application_thread(&self, thread: ThreadId) {
        self.thread.set(thread);
    }

    pub fn disable_command(&self, command: Command) {
        self.disabled.borrow_mut().insert(command);
    }

    pub fn set_playback_state(&self, state: PlaybackState) {
        self.state.set(state);
        self.emit(PlayerEvent::PlaybackStateChanged(state));
    }

    pub fn set_play_when_ready(&self, play_when_ready: bool) {
        self.play_when_ready.set(play_when_ready);
        self.emit(PlayerEvent::PlayWhenReadyChanged(play_when_ready));
    }

    pub fn set_tracks(&self, tracks: Tracks) {
        self.tracks.set(tracks);
        self.emit(PlayerEvent::TracksChanged);
    }

    pub fn set_video_size(&self, size: VideoSize) {
        self.video_size.set(size);
        self.emit(PlayerEvent::VideoSizeChanged(size));
    }

    pub fn set_error(&self, error: Option<PlaybackError>) {
        *self.error.borrow_mut() = error.clone();
        self.emit(PlayerEvent::PlayerErrorChanged(error));
    }

    pub fn set_cues(&self, cues: Vec<Cue>) {
        *self.cues.borrow_mut() = cues.clone();
        self.emit(PlayerEvent::CuesChanged(cues));
    }

    pub fn set_timeline(&self, timeline: Timeline) {
        *self.timeline.borrow_mut() = timeline;
    }

    /// Moves playback to another period without notifying.
    pub fn set_position(&self, period_index: usize, media_item_index: usize) {
        self.period_index.set(period_index);
        self.media_item_index.set(media_item_index);
    }

    pub fn set_artwork_data(&self, data: Option<Vec<u8>>) {
        *self.artwork_data.borrow_mut() = data;
    }

    pub fn set_playing_ad(&self, playing_ad: bool) {
        self.playing_ad.set(playing_ad);
    }

    /// Jumps into an ad break.
    pub fn start_ad(&self) {
        self.playing_ad.set(true);
        self.emit(PlayerEvent::PositionDiscontinuity(
            DiscontinuityReason::AutoTransition,
        ));
    }

    pub fn render_first_frame(&self) {
        self.emit(PlayerEvent::RenderedFirstFrame);
    }
}

impl Player for FakePlayer {
    fn application_thread(&self) -> ThreadId {
        self.thread.get()
    }

    fn is_command_available(&self, command: Command) -> bool {
        !self.disabled.borrow().contains(&command)
    }

    fn playback_state(&self) -> PlaybackState {
        self.state.get()
    }

    fn play_when_ready(&self) -> bool {
        self.play_when_ready.get()
    }

    fn is_playing_ad(&self) -> bool {
        self.playing_ad.get()
    }

    fn player_error(&self) -> Option<PlaybackError> {
        self.error.borrow().clone()
    }

    fn current_tracks(&self) -> Tracks {
        self.tracks.get()
    }

    fn video_size(&self) -> VideoSize {
        self.video_size.get()
    }

    fn current_timeline(&self) -> Timeline {
        self.timeline.borrow().clone()
    }

    fn current_period_index(&self) -> usize {
        self.period_index.get()
    }

    fn current_media_item_index(&self) -> usize {
        self.media_item_index.get()
    }

    fn current_cues(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    fn media_metadata(&self) -> MediaMetadata {
        MediaMetadata {
            artwork_data: self.artwork_data.borrow().clone(),
        }
    }

    fn add_listener(&self, listener: UiInboxSender<PlayerEvent>) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(i, _)| *i != id);
    }

    fn set_video_surface(&self, surface: VideoSurface) {
        self.surface_calls.borrow_mut().push(SurfaceCall::Set(surface.id));
        self.surface.set(Some(surface));
    }

    fn clear_video_surface(&self, surface: VideoSurface) {
        self.surface_calls.borrow_mut().push(SurfaceCall::Clear(surface.id));
        if self.surface.get() == Some(surface) {
            self.surface.set(None);
        }
    }
}
