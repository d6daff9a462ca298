use chrono::{DateTime, Utc};

use crate::action::DenialKind;

/// Where change records get their timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The wall clock.
    #[default]
    System,
    /// One fixed instant, so replays produce identical histories.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// The time to stamp on the next applied change.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(at) => *at,
        }
    }
}

/// Which denial kinds still count as a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPolicy {
    /// No handler claims the verb.
    pub no_handler: bool,
    /// No syntax rule fits the command.
    pub no_matching_syntax: bool,
    /// The player is in the dark.
    pub area_dark: bool,
    /// A required object was not given.
    pub target_missing: bool,
    /// An object is out of reach.
    pub target_not_in_scope: bool,
    /// The handler rejected the object.
    pub semantically_invalid: bool,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            no_handler: false,
            no_matching_syntax: false,
            area_dark: false,
            target_missing: false,
            target_not_in_scope: false,
            semantically_invalid: true,
        }
    }
}

impl TurnPolicy {
    /// Whether a denial of this kind consumes a move.
    pub fn consumes(&self, kind: DenialKind) -> bool {
        match kind {
            DenialKind::NoHandlerForVerb => self.no_handler,
            DenialKind::NoMatchingSyntax => self.no_matching_syntax,
            DenialKind::AreaDark => self.area_dark,
            DenialKind::TargetMissing => self.target_missing,
            DenialKind::TargetNotInScope => self.target_not_in_scope,
            DenialKind::SemanticallyInvalidTarget => self.semantically_invalid,
        }
    }

    /// Override the rule for one denial kind.
    pub fn with(mut self, kind: DenialKind, consumes: bool) -> Self {
        let slot = match kind {
            DenialKind::NoHandlerForVerb => &mut self.no_handler,
            DenialKind::NoMatchingSyntax => &mut self.no_matching_syntax,
            DenialKind::AreaDark => &mut self.area_dark,
            DenialKind::TargetMissing => &mut self.target_missing,
            DenialKind::TargetNotInScope => &mut self.target_not_in_scope,
            DenialKind::SemanticallyInvalidTarget => &mut self.semantically_invalid,
        };
        *slot = consumes;
        self
    }
}

/// Configuration for an engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Seed for response variation. Combined with the move counter so the
    /// same state always yields the same text.
    pub seed: u64,
    /// Move accounting for denied commands.
    pub turn_policy: TurnPolicy,
    /// Maximum side-effect log size (oldest dropped when exceeded). 0 = unlimited.
    pub max_effect_log: usize,
    /// Timestamp source for the change history.
    pub clock: Clock,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            turn_policy: TurnPolicy::default(),
            max_effect_log: 0,
            clock: Clock::System,
        }
    }
}

impl EngineConfig {
    /// Set the variation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the turn policy.
    pub fn with_turn_policy(mut self, policy: TurnPolicy) -> Self {
        self.turn_policy = policy;
        self
    }

    /// Set the maximum side-effect log size (0 = unlimited).
    pub fn with_max_effect_log(mut self, max: usize) -> Self {
        self.max_effect_log = max;
        self
    }

    /// Set the timestamp source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_spares_pre_process_failures() {
        let policy = TurnPolicy::default();
        assert!(!policy.consumes(DenialKind::AreaDark));
        assert!(!policy.consumes(DenialKind::TargetMissing));
        assert!(!policy.consumes(DenialKind::TargetNotInScope));
        assert!(!policy.consumes(DenialKind::NoHandlerForVerb));
        assert!(policy.consumes(DenialKind::SemanticallyInvalidTarget));
    }

    #[test]
    fn policy_override() {
        let policy = TurnPolicy::default()
            .with(DenialKind::AreaDark, true)
            .with(DenialKind::SemanticallyInvalidTarget, false);
        assert!(policy.consumes(DenialKind::AreaDark));
        assert!(!policy.consumes(DenialKind::SemanticallyInvalidTarget));
    }

    #[test]
    fn config_builder_chain() {
        let config = EngineConfig::default().with_seed(7).with_max_effect_log(10);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_effect_log, 10);
        assert_eq!(config.turn_policy, TurnPolicy::default());
        assert_eq!(config.clock, Clock::System);
    }

    #[test]
    fn fixed_clock_never_moves() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = Clock::Fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }
}
