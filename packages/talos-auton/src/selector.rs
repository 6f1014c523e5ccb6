//! Route selection.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::registry::RouteId;

/// The driver's current route choice.
///
/// One selector is shared between the selection UI and the autonomous
/// entrypoint. The choice is read exactly once, when the period starts;
/// selecting after that does not redirect a routine already running.
#[derive(Debug)]
pub struct RouteSelector {
    active: AtomicU8,
}

impl RouteSelector {
    /// Creates a selector with `initial` pre-chosen, for matches where
    /// nobody touches the screen.
    #[must_use]
    pub const fn new(initial: RouteId) -> Self {
        Self {
            active: AtomicU8::new(initial.0),
        }
    }

    /// Chooses `slot` as the route to run.
    pub fn select(&self, slot: RouteId) {
        self.active.store(slot.0, Ordering::Relaxed);
        log::info!("auton route {slot} selected");
    }

    /// The currently chosen slot.
    #[must_use]
    pub fn active(&self) -> RouteId {
        RouteId(self.active.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn keeps_its_default_until_told_otherwise() {
        let selector = RouteSelector::new(RouteId(2));
        assert_eq!(selector.active(), RouteId(2));

        selector.select(RouteId(1));
        assert_eq!(selector.active(), RouteId(1));
    }

    #[test]
    fn selection_is_visible_through_shared_handles() {
        let selector = Arc::new(RouteSelector::new(RouteId(2)));
        let ui_handle = Arc::clone(&selector);

        ui_handle.select(RouteId(3));

        assert_eq!(selector.active(), RouteId(3));
    }
}
