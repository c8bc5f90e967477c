//! Per-connection subscription manager.
//!
//! Tracks which event topics a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::BTreeSet;

use crate::domain::booking_event::{TOPIC_BOOKINGS, TOPIC_METRICS};

/// Topics a client may subscribe to by name.
pub const KNOWN_TOPICS: [&str; 2] = [TOPIC_BOOKINGS, TOPIC_METRICS];

/// Manages the set of topic subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed topics. If `subscribe_all` is true, this set is ignored.
    topics: BTreeSet<&'static str>,
    /// Whether the client subscribes to every topic (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the subscription set. `"*"` enables the wildcard.
    ///
    /// Returns the names that were not recognized.
    pub fn subscribe(&mut self, names: &[String]) -> Vec<String> {
        let mut rejected = Vec::new();
        for name in names {
            let name = name.trim();
            if name == "*" {
                self.subscribe_all = true;
            } else if let Some(topic) = known_topic(name) {
                self.topics.insert(topic);
            } else {
                rejected.push(name.to_string());
            }
        }
        rejected
    }

    /// Removes topics from the subscription set. `"*"` clears the wildcard.
    pub fn unsubscribe(&mut self, names: &[String]) {
        for name in names {
            let name = name.trim();
            if name == "*" {
                self.subscribe_all = false;
            } else if let Some(topic) = known_topic(name) {
                self.topics.remove(topic);
            }
        }
    }

    /// Returns `true` if events on `topic` should be forwarded.
    #[must_use]
    pub fn matches(&self, topic: &str) -> bool {
        self.subscribe_all || self.topics.contains(topic)
    }

    /// Returns the explicitly subscribed topics.
    #[must_use]
    pub fn topics(&self) -> Vec<&'static str> {
        self.topics.iter().copied().collect()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

fn known_topic(name: &str) -> Option<&'static str> {
    KNOWN_TOPICS
        .into_iter()
        .find(|topic| topic.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(TOPIC_BOOKINGS));
        assert!(!mgr.matches(TOPIC_METRICS));
    }

    #[test]
    fn subscribe_specific_topic() {
        let mut mgr = SubscriptionManager::new();
        let rejected = mgr.subscribe(&names(&["Metrics", "weather"]));
        assert_eq!(rejected, vec!["weather"]);
        assert!(mgr.matches(TOPIC_METRICS));
        assert!(!mgr.matches(TOPIC_BOOKINGS));
        assert_eq!(mgr.topics(), vec!["metrics"]);
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&names(&["*"]));
        assert!(mgr.matches(TOPIC_BOOKINGS));
        assert!(mgr.is_subscribed_all());
        mgr.unsubscribe(&names(&["*"]));
        assert!(!mgr.matches(TOPIC_BOOKINGS));
    }

    #[test]
    fn unsubscribe_removes_topic() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&names(&["bookings", "metrics"]));
        mgr.unsubscribe(&names(&["bookings"]));
        assert!(!mgr.matches(TOPIC_BOOKINGS));
        assert!(mgr.matches(TOPIC_METRICS));
    }
}
