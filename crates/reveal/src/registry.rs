use std::{collections::HashMap, fmt::Debug, hash::Hash, time::Instant};

use crate::{DetectorConfig, Rect, VisibilityDetector};

/// A revealed-flag change for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealChange<K> {
    pub key: K,
    pub revealed: bool,
}

/// Every element currently on the page that animates in on scroll.
///
/// Mounting registers a detector; unmounting drops it together with any
/// pending delayed reveal, so nothing fires for an element that is gone.
#[derive(Debug)]
pub struct RevealRegistry<K> {
    detectors: HashMap<K, VisibilityDetector>,
}

impl<K> Default for RevealRegistry<K> {
    fn default() -> Self {
        Self {
            detectors: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + Debug> RevealRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key`. Remounting resets the element to hidden.
    pub fn mount(&mut self, key: K, config: DetectorConfig) {
        tracing::trace!(?key, "Reveal element mounted");
        self.detectors.insert(key, VisibilityDetector::new(config));
    }

    pub fn unmount(&mut self, key: &K) -> bool {
        let Some(mut detector) = self.detectors.remove(key) else {
            return false;
        };
        detector.cancel();
        tracing::trace!(?key, "Reveal element unmounted");
        true
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn is_revealed(&self, key: &K) -> bool {
        self.detectors
            .get(key)
            .is_some_and(VisibilityDetector::is_revealed)
    }

    pub fn detector(&self, key: &K) -> Option<&VisibilityDetector> {
        self.detectors.get(key)
    }

    /// Elements that still need intersection updates.
    pub fn observed(&self) -> impl Iterator<Item = &K> {
        self.detectors
            .iter()
            .filter(|(_, detector)| !detector.is_done())
            .map(|(key, _)| key)
    }

    pub fn observe(
        &mut self,
        key: &K,
        intersecting: bool,
        now: Instant,
    ) -> Option<RevealChange<K>> {
        let detector = self.detectors.get_mut(key)?;
        detector
            .observe(intersecting, now)
            .map(|revealed| RevealChange {
                key: key.clone(),
                revealed,
            })
    }

    /// Runs one layout pass: every observed element against the viewport.
    pub fn observe_layout<F>(
        &mut self,
        viewport: Rect,
        now: Instant,
        mut layout: F,
    ) -> Vec<RevealChange<K>>
    where
        F: FnMut(&K) -> Option<Rect>,
    {
        let mut changes = Vec::new();
        for (key, detector) in self.detectors.iter_mut() {
            if detector.is_done() {
                continue;
            }
            let Some(target) = layout(key) else {
                continue;
            };
            if let Some(revealed) = detector.observe_layout(target, viewport, now) {
                changes.push(RevealChange {
                    key: key.clone(),
                    revealed,
                });
            }
        }
        changes
    }

    /// Fires every delayed reveal that is due.
    pub fn tick(&mut self, now: Instant) -> Vec<RevealChange<K>> {
        self.detectors
            .iter_mut()
            .filter_map(|(key, detector)| {
                detector.tick(now).map(|revealed| RevealChange {
                    key: key.clone(),
                    revealed,
                })
            })
            .collect()
    }

    /// Earliest pending deadline, for scheduling the next tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.detectors
            .values()
            .filter_map(VisibilityDetector::deadline)
            .min()
    }
}
