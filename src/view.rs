use crate::command::{diff, ViewCommand};
use crate::controls::{should_show_indefinitely, ControllerAction, ControllerVisibility};
use crate::projection::{
    buffering_visible, content_description, error_message, reconcile_tracks, video_aspect_ratio,
};
#[cfg(feature = "subtitles")]
use crate::subtitle::subtitles_for;
use crate::tracks::TrackUpdate;
use crate::{
    compute_texture_transform, Artwork, Command, Cue, ErrorMessageProvider, KeyCode, ListenerId,
    PeriodTracker, Player, PlayerEvent, PlayerSnapshot, ProjectionResult, ShowBuffering,
    SurfaceKind, VideoSize, VideoSurface, ViewElements, ViewOptions,
};
use egui::{Color32, Id, Vec2};
use egui_inbox::{UiInbox, UiInboxSender};
use log::{debug, info, warn};
use std::rc::Rc;
use std::thread::ThreadId;

/// Keeps the chrome of a video view (shutter, artwork, spinner, error banner, control bar)
/// in sync with an attached [`Player`].
///
/// The view never touches host elements itself. Every change is sent as a [`ViewCommand`] to
/// the [`UiInbox`] returned by [`PlayerView::new`], which the host drains and applies.
///
/// A view is bound to the thread that created it, and only accepts players delivering events
/// on that same thread.
pub struct PlayerView {
    id: Id,
    owner: ThreadId,
    options: ViewOptions,
    elements: ViewElements,

    player: Option<Rc<dyn Player>>,
    listener: Option<ListenerId>,
    /// Notifications from the attached player, replaced on every attach
    events: Option<UiInbox<PlayerEvent>>,

    tracker: PeriodTracker,
    controls: ControllerVisibility,
    projection: ProjectionResult,
    layout_hook: bool,
    surface_size: Vec2,
    /// Controller visibility last reported to the visibility listener
    controller_visible: bool,

    custom_error_message: Option<String>,
    error_message_provider: Option<ErrorMessageProvider>,
    controller_visibility_listener: Option<Box<dyn FnMut(bool)>>,

    tx: UiInboxSender<ViewCommand>,
}

impl PlayerView {
    /// Create a new [`PlayerView`] and the inbox its commands are delivered to.
    ///
    /// Options needing an element the host does not have are switched off.
    pub fn new(id: Id, options: ViewOptions, elements: ViewElements) -> (Self, UiInbox<ViewCommand>) {
        let inbox = UiInbox::new();
        let options = options.fit_to(&elements);
        let mut projection = ProjectionResult::default();
        projection.content_description =
            content_description(options.use_controller, false, options.controller_hide_on_touch);
        let view = Self {
            id,
            owner: std::thread::current().id(),
            options,
            elements,
            player: None,
            listener: None,
            events: None,
            tracker: PeriodTracker::default(),
            controls: ControllerVisibility::default(),
            projection,
            layout_hook: false,
            surface_size: Vec2::ZERO,
            controller_visible: false,
            custom_error_message: None,
            error_message_provider: None,
            controller_visibility_listener: None,
            tx: inbox.sender(),
        };
        (view, inbox)
    }

    /// Id of the view, also identifying its surface.
    pub fn id(&self) -> Id {
        self.id
    }

    /// The attached player.
    pub fn player(&self) -> Option<&Rc<dyn Player>> {
        self.player.as_ref()
    }

    /// What the host should currently display.
    pub fn projection(&self) -> &ProjectionResult {
        &self.projection
    }

    /// Current configuration.
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    fn surface(&self) -> VideoSurface {
        VideoSurface {
            id: self.id,
            kind: self.options.surface_kind,
        }
    }

    fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.player.as_deref().map(|p| PlayerSnapshot::capture(p))
    }

    fn emit(&self, cmd: ViewCommand) {
        if self.tx.send(cmd).is_err() {
            warn!("View {:?} has no command receiver, dropping command", self.id);
        }
    }

    fn assert_owner_thread(&self) {
        assert_eq!(
            std::thread::current().id(),
            self.owner,
            "PlayerView must be accessed from the thread that created it"
        );
    }

    /// Attach `player`, or detach the current one with `None`.
    ///
    /// To move a player between views use [`PlayerView::switch_target_view`], which links the
    /// new view before unlinking the old one.
    ///
    /// # Panics
    /// When called off the view's thread, or when `player` delivers events on another thread.
    pub fn set_player(&mut self, player: Option<Rc<dyn Player>>) {
        self.assert_owner_thread();
        if let Some(p) = &player {
            assert_eq!(
                p.application_thread(),
                self.owner,
                "Player must deliver events on the thread owning the view"
            );
        }
        let same = match (&self.player, &player) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }

        if let Some(old) = self.player.take() {
            if let Some(id) = self.listener.take() {
                old.remove_listener(id);
            }
            self.events = None;
            if self.options.surface_kind.has_surface()
                && old.is_command_available(Command::SetVideoSurface)
            {
                old.clear_video_surface(self.surface());
            }
            info!("Detached player from view {:?}", self.id);
        }
        self.set_cues(&[]);

        self.player = player;
        self.tracker.reset();
        let snapshot = self.snapshot();
        let before = self.projection.clone();
        self.update_buffering(snapshot.as_ref());
        self.update_error_message(snapshot.as_ref());
        reconcile_tracks(&mut self.projection, snapshot.as_ref(), &self.options, true);

        let Some(player) = self.player.clone() else {
            self.commit(before);
            self.hide_controller();
            return;
        };

        if player.is_command_available(Command::SetVideoSurface) {
            if self.options.surface_kind.has_surface() {
                player.set_video_surface(self.surface());
            }
            self.update_aspect_ratio(player.video_size());
        }
        if player.is_command_available(Command::GetText) {
            self.set_cues(&player.current_cues());
        }
        let inbox = UiInbox::new();
        self.listener = Some(player.add_listener(inbox.sender()));
        self.events = Some(inbox);
        info!("Attached player to view {:?}", self.id);

        self.commit(before);
        let action = self.controls.maybe_show(false, snapshot.as_ref(), &self.options);
        self.apply_controller(action);
    }

    /// Move `player` from `old` to `new`, attaching to `new` first so the player never runs
    /// without a surface.
    pub fn switch_target_view(
        player: Rc<dyn Player>,
        old: Option<&mut PlayerView>,
        new: Option<&mut PlayerView>,
    ) {
        if let Some(new) = new {
            new.set_player(Some(player));
        }
        if let Some(old) = old {
            old.set_player(None);
        }
    }

    /// Handle pending player notifications, requesting a repaint of `ctx` when new ones arrive.
    pub fn process_events(&mut self, ctx: &egui::Context) {
        let events: Vec<PlayerEvent> = match &self.events {
            Some(inbox) => inbox.read(ctx).collect(),
            None => return,
        };
        for e in events {
            self.on_player_event(e);
        }
    }

    /// Like [`PlayerView::process_events`], for hosts without an egui context.
    pub fn process_pending_events(&mut self) {
        let events: Vec<PlayerEvent> = match &self.events {
            Some(inbox) => inbox.read_without_ctx().collect(),
            None => return,
        };
        for e in events {
            self.on_player_event(e);
        }
    }

    /// React to a single notification of the attached player.
    pub fn on_player_event(&mut self, event: PlayerEvent) {
        self.assert_owner_thread();
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        let before = self.projection.clone();
        let mut controller = None;
        match event {
            PlayerEvent::PlaybackStateChanged(_) => {
                self.update_buffering(Some(&snapshot));
                self.update_error_message(Some(&snapshot));
                controller = self.controls.update(Some(&snapshot), &self.options);
            }
            PlayerEvent::PlayWhenReadyChanged(_) => {
                self.update_buffering(Some(&snapshot));
                controller = self.controls.update(Some(&snapshot), &self.options);
            }
            PlayerEvent::TracksChanged => {
                let update = self.tracker.on_tracks_changed(
                    snapshot.timeline_or_empty(),
                    !snapshot.has_tracks(),
                    snapshot.current_period_index,
                    snapshot.current_media_item_index,
                );
                if update == TrackUpdate::Suppress {
                    return;
                }
                reconcile_tracks(&mut self.projection, Some(&snapshot), &self.options, false);
            }
            PlayerEvent::VideoSizeChanged(size) => self.update_aspect_ratio(size),
            PlayerEvent::RenderedFirstFrame => {
                if self.projection.artwork_visible() && !self.options.keep_content_on_player_reset
                {
                    debug!("Ignoring first frame while artwork is shown");
                } else {
                    self.projection.shutter_visible = false;
                }
            }
            PlayerEvent::PositionDiscontinuity(reason) => {
                controller = self.controls.on_discontinuity(Some(&snapshot), &self.options);
                if controller.is_some() {
                    debug!("Hiding controller for ad ({:?})", reason);
                }
            }
            PlayerEvent::CuesChanged(cues) => self.set_cues(&cues),
            PlayerEvent::PlayerErrorChanged(_) => self.update_error_message(Some(&snapshot)),
        }
        self.commit(before);
        self.apply_controller(controller);
    }

    /// The rendering surface was laid out at `size`.
    pub fn on_layout_changed(&mut self, size: Vec2) {
        self.surface_size = size;
        if self.layout_hook {
            self.apply_texture_rotation();
        }
    }

    fn commit(&mut self, before: ProjectionResult) {
        for cmd in diff(&before, &self.projection, &self.elements) {
            self.emit(cmd);
        }
    }

    fn update_buffering(&mut self, player: Option<&PlayerSnapshot>) {
        let policy = self.options.show_buffering;
        self.projection.buffering_visible = player
            .is_some_and(|p| buffering_visible(p.playback_state, p.play_when_ready, policy));
    }

    fn update_error_message(&mut self, player: Option<&PlayerSnapshot>) {
        self.projection.error_message = error_message(
            self.custom_error_message.as_deref(),
            player.and_then(|p| p.error.as_ref()),
            self.error_message_provider.as_ref(),
        );
    }

    fn update_aspect_ratio(&mut self, size: VideoSize) {
        let kind = self.options.surface_kind;
        if kind.swaps_axes_on_rotation() {
            let rotation = size.unapplied_rotation_degrees;
            self.projection.texture_rotation_degrees = rotation;
            let hook = rotation != 0;
            if hook != self.layout_hook {
                self.layout_hook = hook;
                self.emit(ViewCommand::SetLayoutHook(hook));
            }
            self.apply_texture_rotation();
        }
        self.projection.content_aspect_ratio = video_aspect_ratio(&size, kind);
    }

    fn apply_texture_rotation(&self) {
        self.emit(ViewCommand::ApplyTextureTransform(compute_texture_transform(
            self.surface_size,
            self.projection.texture_rotation_degrees,
        )));
    }

    fn reconcile(&mut self) {
        let snapshot = self.snapshot();
        let before = self.projection.clone();
        reconcile_tracks(&mut self.projection, snapshot.as_ref(), &self.options, false);
        self.commit(before);
    }

    fn refresh_error_message(&mut self) {
        let snapshot = self.snapshot();
        let before = self.projection.clone();
        self.update_error_message(snapshot.as_ref());
        self.commit(before);
    }

    #[cfg(feature = "subtitles")]
    fn set_cues(&self, cues: &[Cue]) {
        if self.elements.subtitles {
            self.emit(ViewCommand::SetSubtitles(subtitles_for(cues)));
        }
    }

    #[cfg(not(feature = "subtitles"))]
    fn set_cues(&self, _cues: &[Cue]) {}

    fn apply_controller(&mut self, action: Option<ControllerAction>) {
        let Some(action) = action else {
            return;
        };
        if !self.elements.controller {
            return;
        }
        let before = self.projection.clone();
        match action {
            ControllerAction::Show { timeout_ms } => {
                self.projection.controller_show_timeout_ms = timeout_ms;
                self.emit(ViewCommand::ShowController { timeout_ms });
            }
            ControllerAction::Hide => self.emit(ViewCommand::HideController),
        }
        self.on_controller_visibility(before);
    }

    fn on_controller_visibility(&mut self, before: ProjectionResult) {
        self.update_content_description();
        self.commit(before);
        let visible = self.controls.state().is_visible();
        if visible != self.controller_visible {
            self.controller_visible = visible;
            if let Some(listener) = self.controller_visibility_listener.as_mut() {
                listener(visible);
            }
        }
    }

    fn update_content_description(&mut self) {
        self.projection.content_description = content_description(
            self.options.use_controller,
            self.controls.state().is_visible(),
            self.options.controller_hide_on_touch,
        );
    }

    // Input

    /// The user tapped the view: show the controller, or hide it if hide-on-touch is set.
    pub fn on_tap(&mut self) {
        let snapshot = self.snapshot();
        let action = self.controls.toggle(snapshot.as_ref(), &self.options);
        self.apply_controller(action);
    }

    /// A trackball moved, shows the controller. Returns whether it was consumed.
    pub fn on_trackball_event(&mut self) -> bool {
        if !self.options.use_controller || self.player.is_none() {
            return false;
        }
        self.maybe_show_controller(true);
        true
    }

    /// Handle a key press, returns whether it was consumed.
    ///
    /// D-pad keys reveal the controller, media keys are forwarded to it. Keys are ignored
    /// while an ad is playing.
    pub fn dispatch_key_event(&mut self, key: KeyCode) -> bool {
        if self.snapshot().is_some_and(|p| p.playing_ad) {
            return false;
        }
        let dpad = key.is_dpad() && self.options.use_controller;
        if dpad && !self.controls.state().is_visible() {
            self.maybe_show_controller(true);
            true
        } else if self.dispatch_media_key_event(key) {
            self.maybe_show_controller(true);
            true
        } else {
            if dpad {
                // extends the timeout
                self.maybe_show_controller(true);
            }
            false
        }
    }

    /// Forward a media key to the control bar. Does nothing when the controller is disabled.
    pub fn dispatch_media_key_event(&mut self, key: KeyCode) -> bool {
        if self.options.use_controller && key.is_media_key() {
            self.emit(ViewCommand::DispatchMediaKey(key));
            true
        } else {
            false
        }
    }

    fn maybe_show_controller(&mut self, forced: bool) {
        let snapshot = self.snapshot();
        let action = self.controls.maybe_show(forced, snapshot.as_ref(), &self.options);
        self.apply_controller(action);
    }

    // Controller

    /// The controller element exists and is shown.
    pub fn is_controller_fully_visible(&self) -> bool {
        self.elements.controller && self.controls.state().is_visible()
    }

    /// Show the controller, indefinitely when playback is not running.
    pub fn show_controller(&mut self) {
        let snapshot = self.snapshot();
        let indefinitely = should_show_indefinitely(snapshot.as_ref(), self.options.controller_auto_show);
        let action = self.controls.show(indefinitely, &self.options);
        self.apply_controller(action);
    }

    /// Hide the controller, if the host has one.
    pub fn hide_controller(&mut self) {
        if self.elements.controller {
            let action = self.controls.hide();
            self.apply_controller(Some(action));
        }
    }

    /// The host's control bar changed visibility by itself, e.g. its timeout elapsed.
    pub fn on_controller_visibility_changed(&mut self, visible: bool) {
        if visible == self.controls.state().is_visible() {
            return;
        }
        let before = self.projection.clone();
        if visible {
            self.controls.on_host_shown(&self.options);
            self.projection.controller_show_timeout_ms = self.controls.state().show_timeout_ms();
        } else {
            self.controls.on_host_hidden();
        }
        self.on_controller_visibility(before);
    }

    /// Called with the new visibility whenever the controller is shown or hidden.
    pub fn set_controller_visibility_listener(&mut self, listener: Option<Box<dyn FnMut(bool)>>) {
        self.controller_visibility_listener = listener;
    }

    // Configuration

    /// Whether artwork is shown for media without video.
    pub fn use_artwork(&self) -> bool {
        self.options.use_artwork
    }

    /// # Panics
    /// When enabling artwork without an artwork element.
    pub fn set_use_artwork(&mut self, use_artwork: bool) {
        assert!(
            !use_artwork || self.elements.artwork,
            "Artwork enabled without an artwork element"
        );
        if self.options.use_artwork != use_artwork {
            self.options.use_artwork = use_artwork;
            self.reconcile();
        }
    }

    /// Artwork used when the media has none.
    pub fn default_artwork(&self) -> Option<&Artwork> {
        self.options.default_artwork.as_ref()
    }

    /// Replace the default artwork, reconciling immediately.
    pub fn set_default_artwork(&mut self, artwork: Option<Artwork>) {
        if self.options.default_artwork != artwork {
            self.options.default_artwork = artwork;
            self.reconcile();
        }
    }

    /// Whether the control bar is used.
    pub fn use_controller(&self) -> bool {
        self.options.use_controller
    }

    /// # Panics
    /// When enabling the controller without a controller element.
    pub fn set_use_controller(&mut self, use_controller: bool) {
        assert!(
            !use_controller || self.elements.controller,
            "Controller enabled without a controller element"
        );
        if self.options.use_controller == use_controller {
            return;
        }
        if !use_controller {
            self.hide_controller();
        }
        self.options.use_controller = use_controller;
        let before = self.projection.clone();
        self.on_controller_visibility(before);
    }

    /// Whether the last frame or artwork stays up when the player is reset.
    pub fn keep_content_on_player_reset(&self) -> bool {
        self.options.keep_content_on_player_reset
    }

    /// Reconciles immediately.
    pub fn set_keep_content_on_player_reset(&mut self, keep: bool) {
        if self.options.keep_content_on_player_reset != keep {
            self.options.keep_content_on_player_reset = keep;
            self.reconcile();
        }
    }

    /// When the buffering spinner is shown.
    pub fn show_buffering(&self) -> ShowBuffering {
        self.options.show_buffering
    }

    /// Updates the spinner immediately.
    pub fn set_show_buffering(&mut self, show_buffering: ShowBuffering) {
        if self.options.show_buffering != show_buffering {
            self.options.show_buffering = show_buffering;
            let snapshot = self.snapshot();
            let before = self.projection.clone();
            self.update_buffering(snapshot.as_ref());
            self.commit(before);
        }
    }

    /// Formatter for player errors, refreshing the error banner.
    pub fn set_error_message_provider(&mut self, provider: Option<ErrorMessageProvider>) {
        self.error_message_provider = provider;
        self.refresh_error_message();
    }

    /// Message overriding player errors.
    pub fn custom_error_message(&self) -> Option<&str> {
        self.custom_error_message.as_deref()
    }

    /// Show `message` instead of any player error until cleared with `None`.
    ///
    /// # Panics
    /// When the host has no error message element.
    pub fn set_custom_error_message(&mut self, message: Option<String>) {
        assert!(
            self.elements.error_message,
            "Custom error message set without an error message element"
        );
        self.custom_error_message = message;
        self.refresh_error_message();
    }

    /// Time the controller stays up after an interaction.
    pub fn controller_show_timeout_ms(&self) -> i32 {
        self.options.controller_show_timeout_ms
    }

    /// Non-positive values keep the controller up until hidden.
    ///
    /// # Panics
    /// When the host has no controller element.
    pub fn set_controller_show_timeout_ms(&mut self, timeout_ms: i32) {
        assert!(
            self.elements.controller,
            "Controller timeout set without a controller element"
        );
        self.options.controller_show_timeout_ms = timeout_ms;
        if self.controls.state().is_visible() {
            self.show_controller();
        }
    }

    /// Whether tapping a visible controller hides it.
    pub fn controller_hide_on_touch(&self) -> bool {
        self.options.controller_hide_on_touch
    }

    /// # Panics
    /// When the host has no controller element.
    pub fn set_controller_hide_on_touch(&mut self, hide_on_touch: bool) {
        assert!(
            self.elements.controller,
            "Controller hide-on-touch set without a controller element"
        );
        self.options.controller_hide_on_touch = hide_on_touch;
        let before = self.projection.clone();
        self.update_content_description();
        self.commit(before);
    }

    /// Whether the controller shows itself when playback ends or pauses.
    pub fn controller_auto_show(&self) -> bool {
        self.options.controller_auto_show
    }

    /// Takes effect on the next playback change.
    pub fn set_controller_auto_show(&mut self, auto_show: bool) {
        self.options.controller_auto_show = auto_show;
    }

    /// Whether the controller is kept hidden during ads.
    pub fn controller_hide_during_ads(&self) -> bool {
        self.options.controller_hide_during_ads
    }

    /// Takes effect on the next playback change.
    pub fn set_controller_hide_during_ads(&mut self, hide_during_ads: bool) {
        self.options.controller_hide_during_ads = hide_during_ads;
    }

    /// Kind of surface the player renders into.
    pub fn surface_kind(&self) -> SurfaceKind {
        self.options.surface_kind
    }

    /// Swap the rendering surface, relinking the attached player to the new one.
    pub fn set_surface_kind(&mut self, kind: SurfaceKind) {
        if self.options.surface_kind == kind {
            return;
        }
        let player = self
            .player
            .clone()
            .filter(|p| p.is_command_available(Command::SetVideoSurface));
        if let Some(p) = &player {
            if self.options.surface_kind.has_surface() {
                p.clear_video_surface(self.surface());
            }
        }
        if self.layout_hook {
            self.layout_hook = false;
            self.emit(ViewCommand::SetLayoutHook(false));
        }
        self.options.surface_kind = kind;
        let before = self.projection.clone();
        self.projection.texture_rotation_degrees = 0;
        match player {
            Some(p) => {
                if kind.has_surface() {
                    p.set_video_surface(self.surface());
                }
                self.update_aspect_ratio(p.video_size());
            }
            None => self.projection.content_aspect_ratio = 0.0,
        }
        self.commit(before);
    }

    /// Color of the shutter.
    pub fn shutter_color(&self) -> Color32 {
        self.options.shutter_color
    }

    /// Forwarded to the host when it has a shutter.
    pub fn set_shutter_color(&mut self, color: Color32) {
        self.options.shutter_color = color;
        if self.elements.shutter {
            self.emit(ViewCommand::SetShutterColor(color));
        }
    }
}

impl Drop for PlayerView {
    fn drop(&mut self) {
        if let (Some(player), Some(id)) = (self.player.as_ref(), self.listener.take()) {
            player.remove_listener(id);
        }
    }
}
