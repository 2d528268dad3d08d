//! Navigation state machine.
//!
//! A session is either at the root, where only the navigation tool is
//! visible, or inside exactly one domain. There is no history: navigating
//! replaces the active domain and going back always lands on the root.

use super::Domain;

/// Where a session currently sits in the tool tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    Root,
    InDomain(Domain),
}

/// The only ways a session can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Navigate(Domain),
    Back,
}

impl NavigationState {
    /// Apply a transition. Both transitions are valid from every state.
    pub fn apply(self, transition: Transition) -> Self {
        match (self, transition) {
            (_, Transition::Navigate(domain)) => NavigationState::InDomain(domain),
            (NavigationState::Root, Transition::Back)
            | (NavigationState::InDomain(_), Transition::Back) => NavigationState::Root,
        }
    }

    /// The active domain, if any.
    pub fn current_domain(self) -> Option<Domain> {
        match self {
            NavigationState::Root => None,
            NavigationState::InDomain(domain) => Some(domain),
        }
    }

    pub fn is_root(self) -> bool {
        matches!(self, NavigationState::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_root() {
        assert_eq!(NavigationState::default(), NavigationState::Root);
        assert!(NavigationState::default().is_root());
    }

    #[test]
    fn test_navigate_from_root() {
        let state = NavigationState::Root.apply(Transition::Navigate(Domain::Quotes));
        assert_eq!(state, NavigationState::InDomain(Domain::Quotes));
        assert_eq!(state.current_domain(), Some(Domain::Quotes));
    }

    #[test]
    fn test_navigate_replaces_active_domain() {
        let state = NavigationState::Root
            .apply(Transition::Navigate(Domain::Companies))
            .apply(Transition::Navigate(Domain::Contacts));
        assert_eq!(state, NavigationState::InDomain(Domain::Contacts));

        // A single back returns to the root, not to the previous domain.
        assert_eq!(state.apply(Transition::Back), NavigationState::Root);
    }

    #[test]
    fn test_back_is_idempotent() {
        let once = NavigationState::Root.apply(Transition::Back);
        let twice = once.apply(Transition::Back);
        assert_eq!(once, NavigationState::Root);
        assert_eq!(twice, NavigationState::Root);
    }

    #[test]
    fn test_navigate_to_same_domain_is_stable() {
        let state = NavigationState::InDomain(Domain::Products)
            .apply(Transition::Navigate(Domain::Products));
        assert_eq!(state, NavigationState::InDomain(Domain::Products));
    }
}
