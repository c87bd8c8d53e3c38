//! The contract between the lightbox controller and whatever actually draws
//! the modal. The controller only ever talks to a [`RenderingSurface`], so
//! tests can drive it with a fake.

use crate::core::gallery::Item;

/// Identifies one display request. A load notification only applies to the
/// request it was issued for; anything else is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayToken {
    pub index: usize,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOutcome {
    Loaded,
    Failed,
}

pub trait RenderingSurface {
    /// Handle to a focusable element. Used for lookups only.
    type Focus: Clone + PartialEq + std::fmt::Debug;

    /// Shows the item's full image and title. Must later report back through
    /// `LightboxController::display_finished` with the same token.
    fn display_item(&mut self, token: DisplayToken, item: &Item);

    fn clear_display(&mut self);

    /// Replaces the caption and alt text of the displayed image.
    fn set_caption(&mut self, text: &str);

    fn set_visible(&mut self, visible: bool);

    /// Enables or locks scrolling of the content behind the modal.
    fn set_background_scroll(&mut self, enabled: bool);

    fn set_navigation_enabled(&mut self, can_go_previous: bool, can_go_next: bool);

    fn focus_panel(&mut self);

    /// Starts fetching `source` without showing it. No notification follows.
    fn preload(&mut self, source: &str);

    fn focused(&self) -> Option<Self::Focus>;

    fn focus(&mut self, target: &Self::Focus);

    /// Focuses `target` if it still exists and can take focus. Returns whether
    /// focus moved.
    fn restore_focus(&mut self, target: &Self::Focus) -> bool;

    /// Enabled focusable elements of the panel, in tab order.
    fn panel_focusables(&self) -> Vec<Self::Focus>;
}
