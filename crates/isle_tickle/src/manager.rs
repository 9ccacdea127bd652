//! Tickle manager: the registered-client list and the per-frame pass.
//!
//! Removal during a pass is deferred: the client is flagged, skipped for the
//! rest of the pass, and purged once the pass finishes. Clients never move
//! while a pass is walking the list, so a client unregistering itself (or
//! anyone else) cannot cause another client to be skipped or ticked twice.

use std::fmt::Debug;

use tracing::{debug, trace, warn};

use crate::error::TickleError;

/// Interval, in frames, given to newly registered clients.
pub const DEFAULT_INTERVAL: u32 = 1;

#[derive(Debug, Clone)]
struct TickleClient<K> {
    key: K,
    /// Frames between two tickles.
    interval: u32,
    /// Frame of the last tickle, or of registration if never ticked.
    last_frame: u64,
    /// Set by `unregister` while a pass is running.
    pending_removal: bool,
}

impl<K> TickleClient<K> {
    fn is_due(&self, frame: u64) -> bool {
        !self.pending_removal && frame.saturating_sub(self.last_frame) >= u64::from(self.interval)
    }
}

/// Cooperative scheduler calling back registered clients once per pass.
///
/// `K` is the client key; the scheduler stores keys only, the caller
/// resolves them to the actual clients inside the pass callback.
#[derive(Debug)]
pub struct TickleManager<K> {
    /// Clients in registration order.
    clients: Vec<TickleClient<K>>,
    /// Number of passes started so far.
    frame: u64,
    /// Whether `tickle_all` is currently walking the list.
    in_pass: bool,
}

impl<K: Copy + Eq + Debug> TickleManager<K> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
            frame: 0,
            in_pass: false,
        }
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Add a client to the active set.
    ///
    /// Registering an active client is a no-op. A client registered during a
    /// pass is first ticked on the next pass. Returns `true` if the client
    /// was not active before the call.
    pub fn register(&mut self, key: K) -> bool {
        if let Some(client) = self.clients.iter_mut().find(|c| c.key == key) {
            if client.pending_removal {
                trace!(?key, "tickle client re-registered before purge");
                client.pending_removal = false;
                return true;
            }
            return false;
        }

        trace!(?key, frame = self.frame, "tickle client registered");
        self.clients.push(TickleClient {
            key,
            interval: DEFAULT_INTERVAL,
            last_frame: self.frame,
            pending_removal: false,
        });
        true
    }

    /// Remove a client from the active set.
    ///
    /// Safe to call from inside a pass, including by the client currently
    /// being ticked. Returns `true` if the client was active.
    pub fn unregister(&mut self, key: K) -> bool {
        let Some(pos) = self
            .clients
            .iter()
            .position(|c| c.key == key && !c.pending_removal)
        else {
            return false;
        };

        trace!(?key, in_pass = self.in_pass, "tickle client unregistered");
        if self.in_pass {
            self.clients[pos].pending_removal = true;
        } else {
            self.clients.remove(pos);
        }
        true
    }

    /// Returns `true` if the client is in the active set.
    #[must_use]
    pub fn is_registered(&self, key: K) -> bool {
        self.clients
            .iter()
            .any(|c| c.key == key && !c.pending_removal)
    }

    /// Set how many frames pass between two tickles of a client.
    ///
    /// # Errors
    ///
    /// Returns [`TickleError::ZeroInterval`] for an interval of zero and
    /// [`TickleError::NotRegistered`] if the client is not active.
    pub fn set_interval(&mut self, key: K, frames: u32) -> Result<(), TickleError> {
        if frames == 0 {
            return Err(TickleError::ZeroInterval);
        }
        let client = self
            .clients
            .iter_mut()
            .find(|c| c.key == key && !c.pending_removal)
            .ok_or_else(|| TickleError::NotRegistered(format!("{key:?}")))?;
        client.interval = frames;
        Ok(())
    }

    /// Returns the tickle interval of an active client.
    #[must_use]
    pub fn interval(&self, key: K) -> Option<u32> {
        self.clients
            .iter()
            .find(|c| c.key == key && !c.pending_removal)
            .map(|c| c.interval)
    }

    /// Returns the active client keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.clients
            .iter()
            .filter(|c| !c.pending_removal)
            .map(|c| c.key)
    }

    /// Returns the number of active clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    /// Returns `true` if no client is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one pass: call `tickle` once for every due client.
    ///
    /// The callback receives the scheduler itself so clients can register or
    /// unregister (themselves included) while the pass is running. Nested
    /// calls are ignored. Returns the number of clients ticked.
    pub fn tickle_all<F>(&mut self, mut tickle: F) -> usize
    where
        F: FnMut(&mut Self, K),
    {
        if self.in_pass {
            warn!(frame = self.frame, "nested tickle pass ignored");
            return 0;
        }

        self.frame += 1;
        self.in_pass = true;
        let frame = self.frame;
        let mut ticked = 0;

        // Index walk: callbacks may push new clients, which are not due yet.
        let mut index = 0;
        while index < self.clients.len() {
            let client = &mut self.clients[index];
            if client.is_due(frame) {
                client.last_frame = frame;
                let key = client.key;
                tickle(self, key);
                ticked += 1;
            }
            index += 1;
        }

        self.in_pass = false;
        let before = self.clients.len();
        self.clients.retain(|c| !c.pending_removal);

        debug!(
            frame,
            ticked,
            purged = before - self.clients.len(),
            remaining = self.clients.len(),
            "tickle pass complete"
        );
        ticked
    }
}

impl<K: Copy + Eq + Debug> Default for TickleManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_pass(manager: &mut TickleManager<u32>) -> Vec<u32> {
        let mut log = Vec::new();
        manager.tickle_all(|_, key| log.push(key));
        log
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut manager = TickleManager::new();
        assert!(manager.register(1));
        assert!(!manager.register(1));
        assert_eq!(manager.len(), 1);
        assert_eq!(run_pass(&mut manager), vec![1]);
    }

    #[test]
    fn test_registration_order_is_stable() {
        let mut manager = TickleManager::new();
        for key in [3, 1, 2] {
            manager.register(key);
        }
        assert_eq!(run_pass(&mut manager), vec![3, 1, 2]);
        assert_eq!(run_pass(&mut manager), vec![3, 1, 2]);
    }

    #[test]
    fn test_unregister_outside_pass() {
        let mut manager = TickleManager::new();
        manager.register(1);
        manager.register(2);
        assert!(manager.unregister(1));
        assert!(!manager.unregister(1));
        assert_eq!(run_pass(&mut manager), vec![2]);
    }

    #[test]
    fn test_self_unregister_mid_pass() {
        let mut manager = TickleManager::new();
        for key in 1..=4 {
            manager.register(key);
        }

        let mut log = Vec::new();
        let ticked = manager.tickle_all(|mgr, key| {
            log.push(key);
            if key == 2 {
                assert!(mgr.unregister(key));
            }
        });
        assert_eq!(ticked, 4);
        assert_eq!(log, vec![1, 2, 3, 4]);
        assert!(!manager.is_registered(2));
        assert_eq!(run_pass(&mut manager), vec![1, 3, 4]);
    }

    #[test]
    fn test_unregister_later_client_mid_pass_skips_it() {
        let mut manager = TickleManager::new();
        for key in 1..=3 {
            manager.register(key);
        }

        let mut log = Vec::new();
        manager.tickle_all(|mgr, key| {
            log.push(key);
            if key == 1 {
                mgr.unregister(3);
            }
        });
        assert_eq!(log, vec![1, 2]);
    }

    #[test]
    fn test_register_mid_pass_joins_next_pass() {
        let mut manager = TickleManager::new();
        manager.register(1);

        let mut log = Vec::new();
        manager.tickle_all(|mgr, key| {
            log.push(key);
            mgr.register(9);
        });
        assert_eq!(log, vec![1]);
        assert_eq!(run_pass(&mut manager), vec![1, 9]);
    }

    #[test]
    fn test_reregister_mid_pass_does_not_double_tick() {
        let mut manager = TickleManager::new();
        manager.register(1);
        manager.register(2);

        let mut log = Vec::new();
        manager.tickle_all(|mgr, key| {
            log.push(key);
            if key == 2 {
                mgr.unregister(1);
                mgr.register(1);
            }
        });
        assert_eq!(log, vec![1, 2]);
        assert!(manager.is_registered(1));
        assert_eq!(run_pass(&mut manager), vec![1, 2]);
    }

    #[test]
    fn test_interleaved_sequence_ticks_each_active_client_once() {
        let mut manager = TickleManager::new();
        let mut expected: Vec<u32> = Vec::new();

        for step in 0u32..20 {
            if step % 3 == 0 {
                manager.register(step);
                expected.push(step);
            }
            if step % 5 == 0
                && let Some(&first) = expected.first()
            {
                manager.unregister(first);
                expected.remove(0);
            }

            let mut log = Vec::new();
            manager.tickle_all(|mgr, key| {
                log.push(key);
                if key % 2 == 1 {
                    mgr.unregister(key);
                }
            });
            assert_eq!(log, expected, "step {step}");
            expected.retain(|key| key % 2 == 0);
        }
    }

    #[test]
    fn test_interval_skips_frames() {
        let mut manager = TickleManager::new();
        manager.register(1);
        manager.register(2);
        manager.set_interval(2, 3).unwrap();
        assert_eq!(manager.interval(2), Some(3));

        let passes: Vec<Vec<u32>> = (0..6).map(|_| run_pass(&mut manager)).collect();
        assert_eq!(passes[0], vec![1]);
        assert_eq!(passes[2], vec![1, 2]);
        assert_eq!(passes[5], vec![1, 2]);
    }

    #[test]
    fn test_interval_errors() {
        let mut manager: TickleManager<u32> = TickleManager::new();
        assert_eq!(manager.set_interval(1, 2), Err(TickleError::NotRegistered("1".into())));
        manager.register(1);
        assert_eq!(manager.set_interval(1, 0), Err(TickleError::ZeroInterval));
    }

    #[test]
    fn test_nested_pass_is_ignored() {
        let mut manager = TickleManager::new();
        manager.register(1);
        let mut nested = usize::MAX;
        manager.tickle_all(|mgr, _| nested = mgr.tickle_all(|_, _| {}));
        assert_eq!(nested, 0);
        assert_eq!(manager.frame(), 1);
    }
}
