use eframe::NativeOptions;
use egui::{CentralPanel, Color32, Id, RichText, Sense, TopBottomPanel, ViewportBuilder};
use egui_inbox::{UiInbox, UiInboxSender};
use player_view::{
    Artwork, ListenerId, MediaMetadata, Period, PeriodUid, PlaybackError, PlaybackState, Player,
    PlayerEvent, PlayerView, ShowBuffering, Timeline, Tracks, VideoSize, VideoSurface,
    ViewCommand, ViewElements, ViewOptions,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread::ThreadId;

fn main() {
    env_logger::init();
    let mut opt = NativeOptions::default();
    opt.viewport = ViewportBuilder::default().with_inner_size([1270.0, 740.0]);

    let _ = eframe::run_native("app", opt, Box::new(|_cc| Ok(Box::new(App::default()))));
}

/// Player driven by the buttons of the demo instead of a decoder.
struct DemoPlayer {
    thread: ThreadId,
    state: Cell<PlaybackState>,
    play_when_ready: Cell<bool>,
    error: RefCell<Option<PlaybackError>>,
    tracks: Cell<Tracks>,
    video_size: Cell<VideoSize>,
    listeners: RefCell<Vec<(ListenerId, UiInboxSender<PlayerEvent>)>>,
    next_listener: Cell<u64>,
    surface: Cell<Option<VideoSurface>>,
}

impl DemoPlayer {
    fn new() -> Self {
        Self {
            thread: std::thread::current().id(),
            state: Cell::new(PlaybackState::Idle),
            play_when_ready: Cell::new(false),
            error: RefCell::new(None),
            tracks: Cell::new(Tracks::EMPTY),
            video_size: Cell::new(VideoSize::UNKNOWN),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            surface: Cell::new(None),
        }
    }

    fn emit(&self, event: PlayerEvent) {
        self.listeners
            .borrow_mut()
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    fn load(&self, video: bool) {
        self.tracks.set(Tracks {
            groups: 1,
            video_selected: video,
        });
        self.emit(PlayerEvent::TracksChanged);
        let size = if video {
            VideoSize::new(1280, 720)
        } else {
            VideoSize::UNKNOWN
        };
        self.video_size.set(size);
        self.emit(PlayerEvent::VideoSizeChanged(size));
        self.set_state(PlaybackState::Buffering);
    }

    fn set_state(&self, state: PlaybackState) {
        self.state.set(state);
        self.emit(PlayerEvent::PlaybackStateChanged(state));
        if state == PlaybackState::Ready && self.tracks.get().video_selected {
            self.emit(PlayerEvent::RenderedFirstFrame);
        }
    }

    fn set_play_when_ready(&self, play: bool) {
        self.play_when_ready.set(play);
        self.emit(PlayerEvent::PlayWhenReadyChanged(play));
    }

    fn fail(&self, message: &str) {
        let error = PlaybackError {
            code: 1000,
            message: message.to_string(),
        };
        *self.error.borrow_mut() = Some(error.clone());
        self.emit(PlayerEvent::PlayerErrorChanged(Some(error)));
        self.set_state(PlaybackState::Idle);
    }
}

impl Player for DemoPlayer {
    fn application_thread(&self) -> ThreadId {
        self.thread
    }

    fn playback_state(&self) -> PlaybackState {
        self.state.get()
    }

    fn play_when_ready(&self) -> bool {
        self.play_when_ready.get()
    }

    fn is_playing_ad(&self) -> bool {
        false
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
        if self.tracks.get().is_empty() {
            Timeline::empty()
        } else {
            Timeline::new(vec![Period {
                uid: PeriodUid(1),
                window_index: 0,
            }])
        }
    }

    fn current_period_index(&self) -> usize {
        0
    }

    fn current_media_item_index(&self) -> usize {
        0
    }

    fn current_cues(&self) -> Vec<player_view::Cue> {
        Vec::new()
    }

    fn media_metadata(&self) -> MediaMetadata {
        MediaMetadata::default()
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
        self.surface.set(Some(surface));
    }

    fn clear_video_surface(&self, surface: VideoSurface) {
        if self.surface.get() == Some(surface) {
            self.surface.set(None);
        }
    }
}

/// Host side state, built only from [`ViewCommand`]s.
#[derive(Default)]
struct Chrome {
    shutter: bool,
    artwork: Option<egui::TextureHandle>,
    buffering: bool,
    error: Option<String>,
    aspect_ratio: f32,
    controller: bool,
}

struct App {
    player: Rc<DemoPlayer>,
    view: PlayerView,
    commands: UiInbox<ViewCommand>,
    chrome: Chrome,
}

impl Default for App {
    fn default() -> Self {
        let options = ViewOptions {
            show_buffering: ShowBuffering::WhenPlaying,
            default_artwork: Some(Artwork::solid([16, 16], Color32::DARK_BLUE)),
            ..Default::default()
        };
        let (mut view, commands) = PlayerView::new(Id::new("demo"), options, ViewElements::ALL);
        view.set_error_message_provider(Some(Box::new(|e: &PlaybackError| {
            format!("Playback failed: {e}")
        })));
        let player = Rc::new(DemoPlayer::new());
        view.set_player(Some(player.clone()));
        Self {
            player,
            view,
            commands,
            chrome: Chrome {
                shutter: true,
                ..Default::default()
            },
        }
    }
}

impl App {
    fn apply(&mut self, ctx: &egui::Context) {
        for cmd in self.commands.read(ctx) {
            match cmd {
                ViewCommand::SetShutterVisible(v) => self.chrome.shutter = v,
                ViewCommand::SetArtwork(a) => {
                    self.chrome.artwork = a.map(|a| {
                        ctx.load_texture("artwork", a.image, egui::TextureOptions::LINEAR)
                    })
                }
                ViewCommand::SetBufferingVisible(v) => self.chrome.buffering = v,
                ViewCommand::SetErrorMessage(e) => self.chrome.error = e,
                ViewCommand::SetAspectRatio(r) => self.chrome.aspect_ratio = r,
                ViewCommand::ShowController { .. } => self.chrome.controller = true,
                ViewCommand::HideController => self.chrome.controller = false,
                _ => {}
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.view.process_events(ctx);
        self.apply(ctx);

        TopBottomPanel::top("player").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("load video").clicked() {
                    self.player.load(true);
                }
                if ui.button("load audio").clicked() {
                    self.player.load(false);
                }
                if ui.button("ready").clicked() {
                    self.player.set_state(PlaybackState::Ready);
                }
                if ui.button("buffer").clicked() {
                    self.player.set_state(PlaybackState::Buffering);
                }
                let play = self.player.play_when_ready();
                if ui.button(if play { "pause" } else { "play" }).clicked() {
                    self.player.set_play_when_ready(!play);
                }
                if ui.button("end").clicked() {
                    self.player.set_state(PlaybackState::Ended);
                }
                if ui.button("fail").clicked() {
                    self.player.fail("decoder error");
                }
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let size = if self.chrome.aspect_ratio > 0.0 {
                let w = avail.x.min(avail.y * self.chrome.aspect_ratio);
                egui::vec2(w, w / self.chrome.aspect_ratio)
            } else {
                avail
            };
            let (rect, response) = ui.allocate_exact_size(size, Sense::click());
            self.view.on_layout_changed(rect.size());
            if response.clicked() {
                self.view.on_tap();
            }
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, Color32::from_gray(40));
            if let Some(artwork) = &self.chrome.artwork {
                painter.image(
                    artwork.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            if self.chrome.shutter {
                painter.rect_filled(rect, 0.0, self.view.shutter_color());
            }
            let mut notes = Vec::new();
            if self.chrome.buffering {
                notes.push("buffering...".to_string());
            }
            if let Some(e) = &self.chrome.error {
                notes.push(e.clone());
            }
            if self.chrome.controller {
                notes.push("[controls]".to_string());
            }
            ui.put(rect, egui::Label::new(RichText::new(notes.join("\n")).color(Color32::WHITE)));
        });
    }
}
