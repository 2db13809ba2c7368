// ═══════════════════════════════════════════════════════════════════════
// Capacity-bounded allocator — seats one shuffled (role, tier) group
//
// Entity i is offered to team `order[i mod T]`. What happens when that
// team is already full for the role depends on the seating policy:
//   Modulo — the entity goes straight to overflow (legacy behaviour)
//   Probe  — the rotation is first ordered by seats already held for
//            the role (stable, so ties keep their random order), then
//            the following teams are tried; overflow only when every
//            team is full
// Either way nothing is dropped silently.
//
// Ordering by fill keeps a role's running total within one seat across
// teams, so under Probe every group is dealt pure round-robin and its
// per-team spread is at most one.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatingPolicy {
    /// Least-filled teams first, then probe along the rotation before giving up.
    #[default]
    Probe,
    /// Single candidate per entity; compatible with older draw output.
    Modulo,
}

impl std::fmt::Display for SeatingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatingPolicy::Probe => write!(f, "probe"),
            SeatingPolicy::Modulo => write!(f, "modulo"),
        }
    }
}

impl std::str::FromStr for SeatingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "probe" => Ok(SeatingPolicy::Probe),
            "modulo" => Ok(SeatingPolicy::Modulo),
            other => Err(format!("unknown seating policy {:?} (expected probe or modulo)", other)),
        }
    }
}

/// Outcome of seating one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAllocation<T> {
    /// `seats[t]` = entities placed on team position `t` (0-based), in seating order.
    pub seats: Vec<Vec<T>>,
    pub overflow: Vec<T>,
}

impl<T> GroupAllocation<T> {
    pub fn seated(&self) -> usize {
        self.seats.iter().map(Vec::len).sum()
    }
}

/// Seat `group` (already shuffled) against the team rotation `order`.
///
/// `filled[t]` is how many seats of this role team `t` already holds; it is
/// updated in place so consecutive tiers of one role share the same budget.
/// `order` must be a permutation of `0..filled.len()`; the same rotation is
/// used for every entity of the group. Under `Probe` it is reordered by
/// `filled` before the first entity is seated.
pub fn allocate<T>(
    group: Vec<T>,
    order: &[usize],
    capacity: usize,
    filled: &mut [usize],
    policy: SeatingPolicy,
) -> GroupAllocation<T> {
    debug_assert!(order.iter().all(|&t| t < filled.len()));

    let mut order = order.to_vec();
    if policy == SeatingPolicy::Probe {
        order.sort_by_key(|&team| filled[team]);
    }

    let mut seats: Vec<Vec<T>> = (0..filled.len()).map(|_| Vec::new()).collect();
    let mut overflow = Vec::new();

    for (i, entity) in group.into_iter().enumerate() {
        match pick_team(i, &order, capacity, filled, policy) {
            Some(team) => {
                filled[team] += 1;
                seats[team].push(entity);
            }
            None => overflow.push(entity),
        }
    }

    GroupAllocation { seats, overflow }
}

fn pick_team(
    i: usize,
    order: &[usize],
    capacity: usize,
    filled: &[usize],
    policy: SeatingPolicy,
) -> Option<usize> {
    if order.is_empty() {
        return None;
    }
    let attempts = match policy {
        SeatingPolicy::Modulo => 1,
        SeatingPolicy::Probe => order.len(),
    };
    (0..attempts)
        .map(|k| order[(i + k) % order.len()])
        .find(|&team| filled[team] < capacity)
}
