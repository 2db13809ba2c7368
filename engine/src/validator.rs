// ═══════════════════════════════════════════════════════════════════════
// Validator — pre-flight admission check before any allocation runs
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{DrawError, Result};
use crate::types::{Configuration, Player, Role};

/// Required vs. available players for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub required: usize,
    pub available: usize,
}

impl Shortfall {
    pub fn missing(&self) -> usize {
        self.required.saturating_sub(self.available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    /// Only roles that cannot be filled appear here.
    pub shortfalls: BTreeMap<Role, Shortfall>,
    pub available: BTreeMap<Role, usize>,
    pub total_required: usize,
    pub total_available: usize,
}

impl ValidationReport {
    /// Turn a failed report into `DrawError::InsufficientRoster`.
    pub fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(DrawError::InsufficientRoster(self))
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ok {
            return write!(
                f,
                "roster ok ({} players for {} seats)",
                self.total_available, self.total_required
            );
        }
        let parts: Vec<String> = self
            .shortfalls
            .iter()
            .map(|(role, s)| format!("need {} {} but only have {}", s.required, role, s.available))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Players available per role. Every role is present, possibly with 0.
pub fn count_by_role(roster: &[Player]) -> BTreeMap<Role, usize> {
    let mut counts: BTreeMap<Role, usize> = Role::ALL.iter().map(|&r| (r, 0)).collect();
    for p in roster {
        *counts.entry(p.role).or_insert(0) += 1;
    }
    counts
}

/// Check that every role can fill `capacity × team_count` seats.
/// Pure; the caller must not allocate when `ok` is false.
pub fn validate(roster: &[Player], config: &Configuration) -> ValidationReport {
    let available = count_by_role(roster);

    let shortfalls: BTreeMap<Role, Shortfall> = Role::ALL
        .iter()
        .map(|&role| {
            let required = config.capacity.get(role) * config.team_count;
            let have = available.get(&role).copied().unwrap_or(0);
            (role, Shortfall { required, available: have })
        })
        .filter(|(_, s)| s.available < s.required)
        .collect();

    ValidationReport {
        ok: shortfalls.is_empty(),
        shortfalls,
        available,
        total_required: config.capacity.total() * config.team_count,
        total_available: roster.len(),
    }
}
