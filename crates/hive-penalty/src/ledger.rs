//! The penalty ledger.
//!
//! Each agent moves through `idle -> serving -> satisfied -> removed`.
//! The caller polls [`PenaltyLedger::is_satisfied`] every timestep; there
//! is no timer. Completions of exclusive keys are spread so that no two
//! land on the same timestep.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hive_core::Timestep;
use tracing::{debug, info, trace};

use crate::error::PenaltyError;
use crate::key::PenaltyKey;
use crate::waveform::Waveform;

/// One agent's active penalty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PenaltyRecord<A, K> {
    agent: A,
    key: K,
    start: Timestep,
    duration: u64,
}

impl<A: Copy, K: Copy> PenaltyRecord<A, K> {
    /// The penalized agent.
    pub fn agent(&self) -> A {
        self.agent
    }

    /// The resource the penalty is served against.
    pub fn key(&self) -> K {
        self.key
    }

    /// Timestep the penalty began.
    pub fn start(&self) -> Timestep {
        self.start
    }

    /// Length of the penalty in timesteps (at least 1).
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// First timestep at which the penalty is satisfied.
    pub fn completes_at(&self) -> Timestep {
        self.start + self.duration
    }

    /// `true` once `now - start >= duration`.
    pub fn is_satisfied(&self, now: Timestep) -> bool {
        now.since(self.start) >= self.duration
    }
}

/// Insertion-ordered set of active penalties for one resource class.
///
/// Every operation holds the ledger lock for its whole read-then-mutate
/// sequence.
pub struct PenaltyLedger<A, K> {
    name: String,
    waveform: Waveform,
    records: Mutex<Vec<PenaltyRecord<A, K>>>,
}

impl<A, K> fmt::Debug for PenaltyLedger<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PenaltyLedger")
            .field("name", &self.name)
            .field("waveform", &self.waveform)
            .finish_non_exhaustive()
    }
}

impl<A, K> PenaltyLedger<A, K>
where
    A: Copy + Eq + fmt::Display,
    K: PenaltyKey,
{
    /// Empty ledger. `name` tags log lines.
    pub fn new(name: impl Into<String>, waveform: Waveform) -> Self {
        Self {
            name: name.into(),
            waveform,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The penalty waveform.
    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PenaltyRecord<A, K>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw penalty at `now`, before deconfliction. Never 0.
    pub fn penalty_calc(&self, now: Timestep) -> u64 {
        self.waveform.duration(now).max(1)
    }

    /// Start a penalty for `agent` and return its duration.
    ///
    /// # Panics
    ///
    /// Panics if `agent` already has an active penalty.
    pub fn begin(&self, agent: A, key: K, now: Timestep) -> u64 {
        match self.try_begin(agent, key, now) {
            Ok(duration) => duration,
            Err(err) => panic!("{}: {err}", self.name),
        }
    }

    /// Start a penalty for `agent` and return its duration.
    ///
    /// For exclusive keys the duration is lengthened one step at a time
    /// until no other exclusive record completes on the same timestep.
    ///
    /// # Errors
    ///
    /// Returns `Err(PenaltyError::DoubleBooking)` if `agent` already has
    /// an active penalty. The ledger is unchanged.
    pub fn try_begin(&self, agent: A, key: K, now: Timestep) -> Result<u64, PenaltyError> {
        let mut records = self.lock();
        if records.iter().any(|r| r.agent == agent) {
            return Err(PenaltyError::DoubleBooking {
                agent: agent.to_string(),
            });
        }
        let raw = self.penalty_calc(now);
        let duration = if key.requires_exclusion() {
            deconflict(&records, now, raw)
        } else {
            raw
        };
        records.push(PenaltyRecord {
            agent,
            key,
            start: now,
            duration,
        });
        debug!(
            ledger = %self.name,
            %agent,
            %key,
            start = now.0,
            raw,
            duration,
            "penalty begun"
        );
        Ok(duration)
    }

    /// `true` if `agent` is serving a penalty that is satisfied at `now`.
    pub fn is_satisfied(&self, agent: A, now: Timestep) -> bool {
        self.lock()
            .iter()
            .find(|r| r.agent == agent)
            .is_some_and(|r| r.is_satisfied(now))
    }

    /// `true` if `agent` has an active penalty.
    pub fn is_serving(&self, agent: A) -> bool {
        self.lock().iter().any(|r| r.agent == agent)
    }

    /// The active penalty of `agent`.
    pub fn find(&self, agent: A) -> Option<PenaltyRecord<A, K>> {
        self.lock().iter().find(|r| r.agent == agent).copied()
    }

    /// The oldest active penalty.
    pub fn next(&self) -> Option<PenaltyRecord<A, K>> {
        self.lock().first().copied()
    }

    /// Remove `record`. Returns `false` if it was no longer present.
    pub fn complete(&self, record: &PenaltyRecord<A, K>) -> bool {
        let mut records = self.lock();
        match records.iter().position(|r| r == record) {
            Some(i) => {
                records.remove(i);
                trace!(ledger = %self.name, agent = %record.agent, "penalty completed");
                true
            }
            None => false,
        }
    }

    /// Remove and return the penalty of `agent` if it is satisfied at
    /// `now`.
    pub fn take_satisfied(&self, agent: A, now: Timestep) -> Option<PenaltyRecord<A, K>> {
        let mut records = self.lock();
        let i = records
            .iter()
            .position(|r| r.agent == agent && r.is_satisfied(now))?;
        Some(records.remove(i))
    }

    /// Like [`take_satisfied`](Self::take_satisfied), but checks that the
    /// record's resource still exists.
    ///
    /// # Errors
    ///
    /// Returns `Err(PenaltyError::StaleResourceReference)` if `is_live`
    /// rejects the key. The record is removed either way.
    pub fn take_satisfied_live(
        &self,
        agent: A,
        now: Timestep,
        is_live: impl FnOnce(&K) -> bool,
    ) -> Result<Option<PenaltyRecord<A, K>>, PenaltyError> {
        let Some(record) = self.take_satisfied(agent, now) else {
            return Ok(None);
        };
        if is_live(&record.key) {
            Ok(Some(record))
        } else {
            debug!(ledger = %self.name, %agent, key = %record.key, "penalty resource vanished");
            Err(PenaltyError::StaleResourceReference {
                resource: record.key.to_string(),
            })
        }
    }

    /// Drop the penalty of `agent`, if any. Returns `true` if one was
    /// removed.
    pub fn abort(&self, agent: A) -> bool {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.agent != agent);
        let removed = records.len() != before;
        if removed {
            info!(ledger = %self.name, %agent, "penalty aborted");
        }
        debug_assert!(!records.iter().any(|r| r.agent == agent));
        removed
    }

    /// Number of active penalties.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` if no penalty is active.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of all active penalties, oldest first.
    pub fn snapshot(&self) -> Vec<PenaltyRecord<A, K>> {
        self.lock().clone()
    }
}

/// Lengthen `duration` until `now + duration` collides with no exclusive
/// record. Each bump rescans from the start.
fn deconflict<A, K: PenaltyKey>(
    records: &[PenaltyRecord<A, K>],
    now: Timestep,
    mut duration: u64,
) -> u64 {
    'scan: loop {
        let candidate = now + duration;
        for r in records.iter().filter(|r| r.key.requires_exclusion()) {
            if r.start + r.duration == candidate {
                duration += 1;
                continue 'scan;
            }
        }
        return duration;
    }
}

// Compile-time assertion: PenaltyLedger must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<PenaltyLedger<hive_core::AgentId, crate::key::ResourceKey>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ResourceKey;
    use crate::waveform::WaveformConfig;
    use hive_core::{AgentId, BlockId, CacheId};

    type Ledger = PenaltyLedger<AgentId, ResourceKey>;

    fn ledger(value: f64) -> Ledger {
        PenaltyLedger::new("cache", Waveform::new(WaveformConfig::constant(value)).unwrap())
    }

    #[test]
    fn zero_waveform_is_forced_to_one() {
        let l = PenaltyLedger::<AgentId, ResourceKey>::new("nest", Waveform::null());
        assert_eq!(l.penalty_calc(Timestep(0)), 1);
        assert_eq!(l.begin(AgentId(0), ResourceKey::Nest, Timestep(3)), 1);
    }

    #[test]
    fn same_step_arrivals_are_spread() {
        let l = ledger(4.0);
        let key = ResourceKey::Cache(CacheId(0));
        let d: Vec<u64> = (0..4).map(|i| l.begin(AgentId(i), key, Timestep(10))).collect();
        assert_eq!(d, vec![4, 5, 6, 7]);
    }

    #[test]
    fn rescan_catches_earlier_records() {
        let l = ledger(2.0);
        let key = ResourceKey::Nest;
        // completes at 12
        assert_eq!(l.begin(AgentId(0), key, Timestep(10)), 2);
        // 11 + 2 = 13, free
        assert_eq!(l.begin(AgentId(1), key, Timestep(11)), 2);
        // 10 + 2 = 12 taken, 13 taken, 14 free
        assert_eq!(l.begin(AgentId(2), key, Timestep(10)), 4);
    }

    #[test]
    fn non_exclusive_keys_skip_deconfliction() {
        let l = ledger(3.0);
        let a = l.begin(AgentId(0), ResourceKey::Block(BlockId(0)), Timestep(0));
        let b = l.begin(AgentId(1), ResourceKey::Block(BlockId(1)), Timestep(0));
        assert_eq!((a, b), (3, 3));
        // Exclusive records ignore non-exclusive completions.
        assert_eq!(l.begin(AgentId(2), ResourceKey::Nest, Timestep(0)), 3);
    }

    #[test]
    fn try_begin_rejects_double_booking() {
        let l = ledger(5.0);
        l.begin(AgentId(7), ResourceKey::Nest, Timestep(0));
        match l.try_begin(AgentId(7), ResourceKey::Nest, Timestep(1)) {
            Err(PenaltyError::DoubleBooking { agent }) => assert_eq!(agent, "fb7"),
            other => panic!("expected DoubleBooking, got {other:?}"),
        }
        assert_eq!(l.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already serving")]
    fn begin_panics_on_double_booking() {
        let l = ledger(5.0);
        l.begin(AgentId(1), ResourceKey::Nest, Timestep(0));
        l.begin(AgentId(1), ResourceKey::Nest, Timestep(0));
    }

    #[test]
    fn abort_is_idempotent() {
        let l = ledger(5.0);
        l.begin(AgentId(1), ResourceKey::Nest, Timestep(0));
        l.begin(AgentId(2), ResourceKey::Nest, Timestep(0));
        assert!(l.abort(AgentId(1)));
        assert!(!l.abort(AgentId(1)));
        assert!(!l.is_serving(AgentId(1)));
        assert!(l.is_serving(AgentId(2)));
        assert!(!l.abort(AgentId(99)));
    }

    #[test]
    fn next_find_complete() {
        let l = ledger(1.0);
        l.begin(AgentId(3), ResourceKey::Nest, Timestep(0));
        l.begin(AgentId(4), ResourceKey::Nest, Timestep(0));
        let first = l.next().unwrap();
        assert_eq!(first.agent(), AgentId(3));
        assert_eq!(l.find(AgentId(4)).unwrap().completes_at(), Timestep(2));
        assert!(!l.is_satisfied(AgentId(9), Timestep(100)));
        assert!(l.complete(&first));
        assert!(!l.complete(&first));
        assert_eq!(l.next().unwrap().agent(), AgentId(4));
    }

    #[test]
    fn take_satisfied_only_when_done() {
        let l = ledger(3.0);
        l.begin(AgentId(0), ResourceKey::Cache(CacheId(2)), Timestep(0));
        assert!(l.take_satisfied(AgentId(0), Timestep(2)).is_none());
        let r = l.take_satisfied(AgentId(0), Timestep(3)).unwrap();
        assert_eq!(r.key(), ResourceKey::Cache(CacheId(2)));
        assert!(l.is_empty());
    }

    #[test]
    fn vanished_resource_is_reported_and_dropped() {
        let l = ledger(1.0);
        l.begin(AgentId(0), ResourceKey::Cache(CacheId(5)), Timestep(0));
        match l.take_satisfied_live(AgentId(0), Timestep(1), |_| false) {
            Err(PenaltyError::StaleResourceReference { resource }) => {
                assert_eq!(resource, "cache5")
            }
            other => panic!("expected StaleResourceReference, got {other:?}"),
        }
        assert!(!l.is_serving(AgentId(0)));
        assert_eq!(l.take_satisfied_live(AgentId(0), Timestep(1), |_| true), Ok(None));
    }
}
