// ═══════════════════════════════════════════════════════════════════════
// Fairness audit — many seeded draws in parallel, summarised
// ═══════════════════════════════════════════════════════════════════════

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::draw::draw;
use crate::error::{DrawError, Result};
use crate::types::*;
use crate::validator::validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub runs: usize,
    pub runs_with_overflow: usize,
    pub overflow_entities: usize,
    /// Largest (max − min) per-team count of any single (role, tier) group.
    pub max_group_spread: usize,
    /// Mean number of tier-1 players per run, indexed by team position (team 1 first).
    pub top_tier_share: Vec<f64>,
}

/// Statistics of one draw.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunStats {
    overflow: usize,
    max_group_spread: usize,
    top_tier: Vec<usize>,
}

impl RunStats {
    fn of(partition: &Partition) -> Self {
        let team_count = partition.teams.len();
        let mut groups: BTreeMap<(Role, u32), Vec<usize>> = BTreeMap::new();
        for (t, team) in partition.teams.iter().enumerate() {
            for p in team.roster.values().flatten() {
                groups.entry((p.role, p.tier)).or_insert_with(|| vec![0; team_count])[t] += 1;
            }
        }
        let max_group_spread = groups
            .values()
            .map(|counts| {
                let max = counts.iter().max().copied().unwrap_or(0);
                let min = counts.iter().min().copied().unwrap_or(0);
                max - min
            })
            .max()
            .unwrap_or(0);

        let top_tier = partition
            .teams
            .iter()
            .map(|t| t.roster.values().flatten().filter(|p| p.tier == 1).count())
            .collect();

        RunStats {
            overflow: partition.overflow.len(),
            max_group_spread,
            top_tier,
        }
    }
}

/// Run `runs` draws with seeds `base_seed, base_seed + 1, …` and summarise.
/// Each run owns its generator, so the result does not depend on thread scheduling.
pub fn audit(roster: &[Player], config: &Configuration, runs: usize, base_seed: u64) -> Result<AuditSummary> {
    if runs == 0 {
        return Err(DrawError::InvalidConfiguration("audit needs at least one run".into()));
    }
    check_roster(roster)?;
    validate(roster, config).into_result()?;

    let stats: Vec<RunStats> = (0..runs)
        .into_par_iter()
        .map(|run| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(run as u64));
            RunStats::of(&draw(roster, config, &mut rng))
        })
        .collect();

    let mut top_tier_totals = vec![0usize; config.team_count];
    for s in &stats {
        for (total, n) in top_tier_totals.iter_mut().zip(&s.top_tier) {
            *total += n;
        }
    }

    let summary = AuditSummary {
        runs,
        runs_with_overflow: stats.iter().filter(|s| s.overflow > 0).count(),
        overflow_entities: stats.iter().map(|s| s.overflow).sum(),
        max_group_spread: stats.iter().map(|s| s.max_group_spread).max().unwrap_or(0),
        top_tier_share: top_tier_totals.iter().map(|&n| n as f64 / runs as f64).collect(),
    };
    info!(runs, overflow_runs = summary.runs_with_overflow, spread = summary.max_group_spread, "audit complete");
    Ok(summary)
}
