#[cfg(feature = "subtitles")]
use crate::subtitle::Subtitle;
use crate::{
    Artwork, ContentDescription, KeyCode, ProjectionResult, TextureTransform, ViewElements,
};
use egui::Color32;

/// Instructions for the host, which owns the concrete child elements.
#[derive(PartialEq, Clone, Debug)]
pub enum ViewCommand {
    /// Show the given artwork, or hide the artwork element
    SetArtwork(Option<Artwork>),
    /// Cover or uncover the video surface
    SetShutterVisible(bool),
    /// Color of the shutter, sent whenever it is configured
    SetShutterColor(Color32),
    /// Show or hide the buffering spinner
    SetBufferingVisible(bool),
    /// Show the error banner with this text, or hide it
    SetErrorMessage(Option<String>),
    /// Aspect ratio of the content frame, `0` to stop forcing one
    SetAspectRatio(f32),
    /// Install or remove the hook reporting surface size changes to
    /// [`crate::PlayerView::on_layout_changed`]
    SetLayoutHook(bool),
    /// Transform for the texture surface, identity when nothing is rotated
    ApplyTextureTransform(TextureTransform),
    /// Show the control bar, auto hiding after `timeout_ms` unless it is `0`
    ShowController { timeout_ms: i32 },
    /// Hide the control bar
    HideController,
    /// Forward a media key to the control bar
    DispatchMediaKey(KeyCode),
    /// Accessibility label of the view
    SetContentDescription(Option<ContentDescription>),
    /// Replace the subtitles on screen
    #[cfg(feature = "subtitles")]
    SetSubtitles(Vec<Subtitle>),
    /// Full projection after any of the above changed
    ProjectionChanged(ProjectionResult),
}

/// Commands turning `before` into `after`, limited to elements the host has.
pub(crate) fn diff(
    before: &ProjectionResult,
    after: &ProjectionResult,
    elements: &ViewElements,
) -> Vec<ViewCommand> {
    let mut cmds = Vec::new();
    if elements.artwork && before.artwork != after.artwork {
        cmds.push(ViewCommand::SetArtwork(
            after.artwork.as_ref().map(|a| a.artwork.clone()),
        ));
    }
    if elements.shutter && before.shutter_visible != after.shutter_visible {
        cmds.push(ViewCommand::SetShutterVisible(after.shutter_visible));
    }
    if elements.buffering && before.buffering_visible != after.buffering_visible {
        cmds.push(ViewCommand::SetBufferingVisible(after.buffering_visible));
    }
    if elements.error_message && before.error_message != after.error_message {
        cmds.push(ViewCommand::SetErrorMessage(after.error_message.clone()));
    }
    if before.content_aspect_ratio != after.content_aspect_ratio {
        cmds.push(ViewCommand::SetAspectRatio(after.content_aspect_ratio));
    }
    if before.content_description != after.content_description {
        cmds.push(ViewCommand::SetContentDescription(after.content_description));
    }
    if before != after {
        cmds.push(ViewCommand::ProjectionChanged(after.clone()));
    }
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change_no_commands() {
        let p = ProjectionResult::default();
        assert!(diff(&p, &p.clone(), &ViewElements::ALL).is_empty());
    }

    #[test]
    fn test_missing_elements_are_skipped() {
        let before = ProjectionResult::default();
        let after = ProjectionResult {
            shutter_visible: false,
            buffering_visible: true,
            ..Default::default()
        };
        let cmds = diff(&before, &after, &ViewElements::NONE);
        assert_eq!(cmds, vec![ViewCommand::ProjectionChanged(after.clone())]);

        let cmds = diff(&before, &after, &ViewElements::ALL);
        assert_eq!(
            cmds,
            vec![
                ViewCommand::SetShutterVisible(false),
                ViewCommand::SetBufferingVisible(true),
                ViewCommand::ProjectionChanged(after),
            ]
        );
    }
}
