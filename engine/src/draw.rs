// ═══════════════════════════════════════════════════════════════════════
// Draw — runs the per-(role, tier) allocations and assembles the Partition
//
// Flow:
//   1. Validate the roster against capacity × team count (hard stop)
//   2. For each role in GK/DEF/MID/FW order, for each tier ascending:
//        shuffle the group, draw a fresh team order, allocate
//   3. Merge group results into one roster per team
//   4. Optionally shuffle the colour palette onto the teams
// ═══════════════════════════════════════════════════════════════════════

use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::allocator::allocate;
use crate::error::Result;
use crate::shuffle::{draw_rng, shuffled, team_order};
use crate::types::*;
use crate::validator::validate;

/// Validate, then draw with the generator implied by `config.seed`.
/// A failed validation is returned as `DrawError::InsufficientRoster`
/// and no allocation takes place.
pub fn run_draw(roster: &[Player], config: &Configuration) -> Result<Partition> {
    check_roster(roster)?;
    validate(roster, config).into_result()?;

    let mut rng = draw_rng(config.seed);
    let partition = draw(roster, config, &mut rng);
    info!(
        teams = config.team_count,
        seed = ?config.seed,
        seated = partition.seated_count(),
        overflow = partition.overflow.len(),
        "draw complete"
    );
    Ok(partition)
}

/// Draw a partition using `rng`. Does not validate; players that cannot be
/// seated end up in `Partition::overflow`.
pub fn draw<R: Rng + ?Sized>(roster: &[Player], config: &Configuration, rng: &mut R) -> Partition {
    let mut teams: Vec<Team> = (1..=config.team_count).map(Team::empty).collect();
    let mut overflow = Vec::new();

    for role in Role::ALL {
        let capacity = config.capacity.get(role);
        // Seat budget for this role, shared by all of its tiers.
        let mut filled = vec![0usize; config.team_count];

        for (tier, group) in tier_groups(roster, role) {
            let group = shuffled(group, rng);
            let order = team_order(config.team_count, rng);
            let size = group.len();

            let alloc = allocate(group, &order, capacity, &mut filled, config.seating);
            debug!(%role, tier, size, seated = alloc.seated(), overflow = alloc.overflow.len(), "group seated");
            if !alloc.overflow.is_empty() {
                warn!(%role, tier, count = alloc.overflow.len(), policy = %config.seating, "players could not be seated");
            }

            for (team, seated) in teams.iter_mut().zip(alloc.seats) {
                team.roster.entry(role).or_default().extend(seated);
            }
            overflow.extend(alloc.overflow);
        }
    }

    if config.assign_colors {
        assign_colors(&mut teams, &config.palette, rng);
    }

    Partition { teams, overflow }
}

/// Players of one role, bucketed by tier in ascending order.
fn tier_groups(roster: &[Player], role: Role) -> BTreeMap<u32, Vec<Player>> {
    let mut groups: BTreeMap<u32, Vec<Player>> = BTreeMap::new();
    for p in roster.iter().filter(|p| p.role == role) {
        groups.entry(p.tier).or_default().push(p.clone());
    }
    groups
}

/// The first `teams.len()` distinct palette colours, shuffled onto the teams.
/// Teams beyond the palette size get no colour.
fn assign_colors<R: Rng + ?Sized>(teams: &mut [Team], palette: &[String], rng: &mut R) {
    let mut distinct: Vec<String> = Vec::with_capacity(teams.len());
    for c in palette {
        if distinct.len() == teams.len() {
            break;
        }
        if !distinct.contains(c) {
            distinct.push(c.clone());
        }
    }
    if distinct.len() < teams.len() {
        warn!(colors = distinct.len(), teams = teams.len(), "palette too small; some teams left without a colour");
    }

    let colors = shuffled(distinct, rng);
    for (team, color) in teams.iter_mut().zip(colors) {
        team.color = Some(color);
    }
}
