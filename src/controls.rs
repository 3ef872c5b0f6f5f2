use crate::{PlaybackState, PlayerSnapshot, ViewOptions};

/// Visibility of the control bar as last requested.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum ControllerState {
    /// Not shown
    #[default]
    Hidden,
    /// Shown, auto hidden by the host after the timeout
    VisibleTimed(i32),
    /// Shown until hidden explicitly
    VisibleIndefinite,
}

impl ControllerState {
    /// Shown in any form.
    pub fn is_visible(&self) -> bool {
        !matches!(self, ControllerState::Hidden)
    }

    /// Shown without a timeout.
    pub fn is_indefinite(&self) -> bool {
        matches!(self, ControllerState::VisibleIndefinite)
    }

    /// Timeout the host applies for this state, `0` meaning no timeout.
    pub fn show_timeout_ms(&self) -> i32 {
        match self {
            ControllerState::VisibleTimed(ms) => *ms,
            _ => 0,
        }
    }
}

/// Request for the host's control bar.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ControllerAction {
    /// Show the bar, `timeout_ms == 0` meaning no auto hide
    Show { timeout_ms: i32 },
    /// Hide the bar
    Hide,
}

/// The controller should stay up until the user hides it: nothing attached, playback not started,
/// paused or ended.
pub fn should_show_indefinitely(player: Option<&PlayerSnapshot>, auto_show: bool) -> bool {
    let Some(player) = player else {
        return true;
    };
    let timeline_allows = player.timeline.as_ref().map_or(true, |t| !t.is_empty());
    auto_show
        && timeline_allows
        && (matches!(
            player.playback_state,
            PlaybackState::Idle | PlaybackState::Ended
        ) || !player.play_when_ready)
}

/// Controller visibility policy.
#[derive(Clone, Debug, Default)]
pub struct ControllerVisibility {
    state: ControllerState,
}

impl ControllerVisibility {
    /// Current state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    fn hidden_for_ad(player: Option<&PlayerSnapshot>, options: &ViewOptions) -> bool {
        options.controller_hide_during_ads && player.is_some_and(|p| p.is_playing_ad())
    }

    /// Shows the controller, indefinitely if `indefinitely` or the timeout is not positive.
    pub fn show(&mut self, indefinitely: bool, options: &ViewOptions) -> Option<ControllerAction> {
        if !options.use_controller {
            return None;
        }
        self.state = if indefinitely || options.controller_show_timeout_ms <= 0 {
            ControllerState::VisibleIndefinite
        } else {
            ControllerState::VisibleTimed(options.controller_show_timeout_ms)
        };
        Some(ControllerAction::Show {
            timeout_ms: self.state.show_timeout_ms(),
        })
    }

    /// Hides the controller unconditionally.
    pub fn hide(&mut self) -> ControllerAction {
        self.state = ControllerState::Hidden;
        ControllerAction::Hide
    }

    /// Shows the controller only if forced or it should be (or already is) up indefinitely.
    pub fn maybe_show(
        &mut self,
        forced: bool,
        player: Option<&PlayerSnapshot>,
        options: &ViewOptions,
    ) -> Option<ControllerAction> {
        if Self::hidden_for_ad(player, options) || !options.use_controller {
            return None;
        }
        let was_indefinite = self.state.is_indefinite();
        let indefinitely = should_show_indefinitely(player, options.controller_auto_show);
        if forced || was_indefinite || indefinitely {
            self.show(indefinitely, options)
        } else {
            None
        }
    }

    /// Reaction to playback state or play-when-ready changes.
    pub fn update(
        &mut self,
        player: Option<&PlayerSnapshot>,
        options: &ViewOptions,
    ) -> Option<ControllerAction> {
        if Self::hidden_for_ad(player, options) {
            Some(self.hide())
        } else {
            self.maybe_show(false, player, options)
        }
    }

    /// Position jumped, e.g. into an ad break.
    pub fn on_discontinuity(
        &mut self,
        player: Option<&PlayerSnapshot>,
        options: &ViewOptions,
    ) -> Option<ControllerAction> {
        Self::hidden_for_ad(player, options).then(|| self.hide())
    }

    /// User tapped the view.
    pub fn toggle(
        &mut self,
        player: Option<&PlayerSnapshot>,
        options: &ViewOptions,
    ) -> Option<ControllerAction> {
        if !options.use_controller || player.is_none() {
            return None;
        }
        if !self.state.is_visible() {
            self.maybe_show(true, player, options)
        } else if options.controller_hide_on_touch {
            Some(self.hide())
        } else {
            None
        }
    }

    /// The host hid the controller on its own, e.g. when the timeout elapsed.
    pub fn on_host_hidden(&mut self) {
        self.state = ControllerState::Hidden;
    }

    /// The host showed the controller on its own, with the configured timeout.
    pub fn on_host_shown(&mut self, options: &ViewOptions) {
        self.state = if options.controller_show_timeout_ms <= 0 {
            ControllerState::VisibleIndefinite
        } else {
            ControllerState::VisibleTimed(options.controller_show_timeout_ms)
        };
    }
}
