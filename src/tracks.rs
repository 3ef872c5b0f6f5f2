use crate::{PeriodUid, Timeline};
use log::debug;

/// What to do with a tracks-changed notification.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TrackUpdate {
    /// Apply the new tracks
    Reconcile,
    /// Moving into an unprepared period of the media item that last had tracks.
    Suppress,
}

/// Remembers the last period that had tracks so that period transitions inside one media item
/// do not blank the video or artwork.
#[derive(Clone, Debug, Default)]
pub struct PeriodTracker {
    last_period_with_tracks: Option<PeriodUid>,
}

impl PeriodTracker {
    /// Forget the remembered period.
    pub fn reset(&mut self) {
        self.last_period_with_tracks = None;
    }

    /// Period that last had tracks.
    pub fn last_period_with_tracks(&self) -> Option<PeriodUid> {
        self.last_period_with_tracks
    }

    /// Decide whether a tracks change is applied, remembering the current period when it has tracks.
    pub fn on_tracks_changed(
        &mut self,
        timeline: &Timeline,
        tracks_empty: bool,
        current_period_index: usize,
        current_media_item_index: usize,
    ) -> TrackUpdate {
        if timeline.is_empty() {
            self.last_period_with_tracks = None;
        } else if !tracks_empty {
            self.last_period_with_tracks = timeline.period(current_period_index).map(|p| p.uid);
        } else if let Some(uid) = self.last_period_with_tracks {
            let same_item = timeline
                .index_of_period(uid)
                .and_then(|i| timeline.period(i))
                .is_some_and(|p| p.window_index == current_media_item_index);
            if same_item {
                debug!("Tracks cleared within media item {current_media_item_index}, keeping content");
                return TrackUpdate::Suppress;
            }
            self.last_period_with_tracks = None;
        }
        TrackUpdate::Reconcile
    }
}
