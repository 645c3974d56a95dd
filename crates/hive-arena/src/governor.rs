//! Switch that stops block redistribution partway through a run.

use hive_core::Timestep;
use tracing::info;

/// When to stop redistributing collected blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedistTrigger {
    /// Never stop.
    #[default]
    Null,
    /// Stop once this timestep is reached.
    Timestep(Timestep),
    /// Stop once this many blocks have been collected.
    BlockCount(u64),
}

/// Tracks whether redistribution is still enabled. Once disabled it
/// stays disabled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedistGovernor {
    trigger: RedistTrigger,
    disabled: bool,
}

impl RedistGovernor {
    /// Governor firing on `trigger`.
    pub fn new(trigger: RedistTrigger) -> Self {
        Self {
            trigger,
            disabled: false,
        }
    }

    /// The configured trigger.
    pub fn trigger(&self) -> RedistTrigger {
        self.trigger
    }

    /// `true` while blocks should still be redistributed.
    pub fn enabled(&self) -> bool {
        !self.disabled
    }

    /// Evaluate the trigger.
    pub fn update(&mut self, now: Timestep, blocks_collected: u64) {
        if self.disabled {
            return;
        }
        let fire = match self.trigger {
            RedistTrigger::Null => false,
            RedistTrigger::Timestep(t) => now >= t,
            RedistTrigger::BlockCount(n) => blocks_collected >= n,
        };
        if fire {
            self.disabled = true;
            info!(
                trigger = ?self.trigger,
                timestep = now.0,
                blocks_collected,
                "block redistribution disabled"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_never_fires() {
        let mut g = RedistGovernor::default();
        g.update(Timestep(u64::MAX), u64::MAX);
        assert!(g.enabled());
    }

    #[test]
    fn timestep_trigger_latches() {
        let mut g = RedistGovernor::new(RedistTrigger::Timestep(Timestep(100)));
        g.update(Timestep(99), 0);
        assert!(g.enabled());
        g.update(Timestep(100), 0);
        assert!(!g.enabled());
        g.update(Timestep(0), 0);
        assert!(!g.enabled());
    }

    #[test]
    fn block_count_trigger() {
        let mut g = RedistGovernor::new(RedistTrigger::BlockCount(5));
        g.update(Timestep(1), 4);
        assert!(g.enabled());
        g.update(Timestep(2), 5);
        assert!(!g.enabled());
    }
}
