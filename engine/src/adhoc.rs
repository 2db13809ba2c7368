// ═══════════════════════════════════════════════════════════════════════
// Ad-hoc draw — quick one-off draws from pre-grouped name lists
//
// Every group (one label inside one pot, plus the colour and goalkeeper
// lists) puts at most one name on each team. This is the allocator with
// capacity 1 and a fresh seat budget per group; names beyond the team
// count are truncated and reported as warnings.
// ═══════════════════════════════════════════════════════════════════════

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::allocator::{allocate, SeatingPolicy};
use crate::error::{DrawError, Result};
use crate::shuffle::{shuffled, team_order};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocConfig {
    pub team_count: usize,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub goalkeepers: Vec<String>,
    #[serde(default)]
    pub pots: Vec<Pot>,
}

/// One skill pot: label (e.g. "DEF") → names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub name: String,
    #[serde(default)]
    pub players: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocTeam {
    pub team_id: usize,
    pub color: Option<String>,
    pub goalkeeper: Option<String>,
    pub players: BTreeMap<String, Vec<String>>,
}

/// Names left out because their group was larger than the team count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    pub group: String,
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocDraw {
    pub teams: Vec<AdhocTeam>,
    pub warnings: Vec<Truncation>,
}

pub fn draw_adhoc<R: Rng + ?Sized>(config: &AdhocConfig, rng: &mut R) -> Result<AdhocDraw> {
    let team_count = config.team_count;
    if team_count < 2 {
        return Err(DrawError::InvalidConfiguration(format!(
            "team count must be at least 2, got {}",
            team_count
        )));
    }

    let mut teams: Vec<AdhocTeam> = (1..=team_count)
        .map(|team_id| AdhocTeam {
            team_id,
            color: None,
            goalkeeper: None,
            players: BTreeMap::new(),
        })
        .collect();
    let mut warnings = Vec::new();

    for pot in &config.pots {
        for (label, names) in &pot.players {
            let group = format!("{}/{}", pot.name, label);
            let seats = seat_one_per_team(&group, names, team_count, rng, &mut warnings);
            for (team, seated) in teams.iter_mut().zip(seats) {
                team.players.entry(label.clone()).or_default().extend(seated);
            }
        }
    }

    let colors = seat_one_per_team("colors", &config.colors, team_count, rng, &mut warnings);
    let keepers = seat_one_per_team("goalkeepers", &config.goalkeepers, team_count, rng, &mut warnings);
    for ((team, mut color), mut keeper) in teams.iter_mut().zip(colors).zip(keepers) {
        team.color = color.pop();
        team.goalkeeper = keeper.pop();
    }

    info!(teams = team_count, truncated_groups = warnings.len(), "ad-hoc draw complete");
    Ok(AdhocDraw { teams, warnings })
}

fn seat_one_per_team<R: Rng + ?Sized>(
    group: &str,
    names: &[String],
    team_count: usize,
    rng: &mut R,
    warnings: &mut Vec<Truncation>,
) -> Vec<Vec<String>> {
    let names: Vec<String> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect();

    let names = shuffled(names, rng);
    let order = team_order(team_count, rng);
    let mut filled = vec![0usize; team_count];
    let alloc = allocate(names, &order, 1, &mut filled, SeatingPolicy::Modulo);

    if !alloc.overflow.is_empty() {
        warn!(group, dropped = alloc.overflow.len(), "more names than teams; extra names left out");
        warnings.push(Truncation {
            group: group.to_string(),
            dropped: alloc.overflow,
        });
    }
    alloc.seats
}
