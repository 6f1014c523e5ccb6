//! The route registry.

use core::fmt;
use std::collections::BTreeMap;

use crate::route::Route;

/// Identifier of a route slot, as shown on the selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(pub u8);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// A table of selectable routes, keyed by slot.
///
/// Slots without a registered route are still legal to select; running one
/// logs and leaves the robot idle. That makes "no autonomous" an ordinary
/// table entry rather than a special case in the runner.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: BTreeMap<RouteId, Route>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `route` in `slot`, replacing any previous occupant.
    pub fn insert(&mut self, slot: RouteId, route: Route) {
        if let Some(previous) = self.routes.insert(slot, route) {
            log::warn!("slot {slot} re-registered, dropping {}", previous.name());
        }
    }

    /// The route registered in `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: RouteId) -> Option<&Route> {
        self.routes.get(&slot)
    }

    /// Iterates over registered slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &Route)> {
        self.routes.iter().map(|(slot, route)| (*slot, route))
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slots_are_ordered_and_replaceable() {
        let mut table = RouteTable::new();
        table.insert(RouteId(2), Route::builder("offense").build());
        table.insert(RouteId(1), Route::builder("launching").build());

        let slots: Vec<_> = table.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, [RouteId(1), RouteId(2)]);

        table.insert(RouteId(2), Route::builder("offense v2").build());
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(RouteId(2)).map(Route::name), Some("offense v2"));
        assert!(table.get(RouteId(3)).is_none());
    }

    #[test]
    fn ids_display_like_the_selection_ui() {
        assert_eq!(RouteId(2).to_string(), "[2]");
    }
}
