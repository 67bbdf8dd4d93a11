//! Action selection.
//!
//! Rules are evaluated top to bottom against a snapshot of the world; the
//! first one that applies picks this tick's action. Nothing here talks to the
//! server, so the order can be checked in isolation.

use strum::Display;

/// What the engine does this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    DoEvent,
    AcceptTask,
    FarmResource,
    DoTask,
    FarmXp,
    KillAll,
}

/// Everything selection depends on, captured once per tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tick: u64,
    /// An active event hosts a monster the character can beat
    pub event_beatable: bool,
    pub has_task: bool,
    /// Current task targets a monster beatable with available gear
    pub task_beatable: bool,
    pub farm_live: bool,
    pub level: u32,
    pub level_cap: u32,
    pub is_crafter: bool,
}

pub struct Rule {
    pub action: ActionKind,
    pub applies: fn(&Snapshot) -> bool,
}

pub const RULES: &[Rule] = &[
    Rule {
        action: ActionKind::DoEvent,
        applies: |s| s.event_beatable,
    },
    Rule {
        action: ActionKind::AcceptTask,
        applies: |s| !s.has_task && !s.is_crafter,
    },
    Rule {
        action: ActionKind::FarmResource,
        applies: |s| s.farm_live,
    },
    Rule {
        action: ActionKind::DoTask,
        applies: |s| !s.is_crafter && s.has_task && s.task_beatable,
    },
    Rule {
        action: ActionKind::FarmXp,
        applies: |s| !s.is_crafter && s.level < s.level_cap,
    },
    Rule {
        action: ActionKind::KillAll,
        applies: |_| true,
    },
];

/// Bank run happens before selection on every Nth tick, including tick 0
pub fn is_banking_tick(tick: u64, every: u64) -> bool {
    every > 0 && tick % every == 0
}

pub fn select(snapshot: &Snapshot) -> Option<ActionKind> {
    RULES
        .iter()
        .find(|rule| (rule.applies)(snapshot))
        .map(|rule| rule.action)
}
