// ═══════════════════════════════════════════════════════════════════════
// Core types — roster entities, capacities, teams and the partition
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::allocator::SeatingPolicy;
use crate::error::{DrawError, Result};

// ── Role ───────────────────────────────────────────────────────────────

/// Playing role. Declaration order is the canonical iteration order,
/// so `BTreeMap<Role, _>` always walks GK, DEF, MID, FW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FW")]
    Forward,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Goalkeeper,
        Role::Defender,
        Role::Midfielder,
        Role::Forward,
    ];

    /// Short code used in files and the database.
    pub fn code(self) -> &'static str {
        match self {
            Role::Goalkeeper => "GK",
            Role::Defender => "DEF",
            Role::Midfielder => "MID",
            Role::Forward => "FW",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('#').to_ascii_uppercase().as_str() {
            "GK" => Ok(Role::Goalkeeper),
            "DEF" => Ok(Role::Defender),
            "MID" => Ok(Role::Midfielder),
            "FW" => Ok(Role::Forward),
            other => Err(DrawError::InvalidConfiguration(format!("unknown role {:?}", other))),
        }
    }
}

// ── Player ─────────────────────────────────────────────────────────────

/// One rated roster entry. Tier 1 is the strongest pot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub role: Role,
    pub tier: u32,
}

impl Player {
    pub fn new(id: u64, name: impl Into<String>, role: Role, tier: u32) -> Self {
        Player { id, name: name.into(), role, tier }
    }
}

/// Reject rosters the engine cannot reason about: tier 0 or a repeated id.
pub fn check_roster(roster: &[Player]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(roster.len());
    for p in roster {
        if p.tier == 0 {
            return Err(DrawError::InvalidConfiguration(format!(
                "player {} ({}) has tier 0; tiers start at 1",
                p.id, p.name
            )));
        }
        if !seen.insert(p.id) {
            return Err(DrawError::InvalidConfiguration(format!(
                "player id {} appears more than once in the roster",
                p.id
            )));
        }
    }
    Ok(())
}

// ── Capacities ─────────────────────────────────────────────────────────

/// Per-team seat count for each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoleCapacity {
    #[serde(rename = "GK")]
    pub goalkeepers: usize,
    #[serde(rename = "DEF")]
    pub defenders: usize,
    #[serde(rename = "MID")]
    pub midfielders: usize,
    #[serde(rename = "FW")]
    pub forwards: usize,
}

impl RoleCapacity {
    pub fn new(goalkeepers: usize, defenders: usize, midfielders: usize, forwards: usize) -> Self {
        RoleCapacity { goalkeepers, defenders, midfielders, forwards }
    }

    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Goalkeeper => self.goalkeepers,
            Role::Defender => self.defenders,
            Role::Midfielder => self.midfielders,
            Role::Forward => self.forwards,
        }
    }

    /// Seats per team across all roles.
    pub fn total(&self) -> usize {
        Role::ALL.iter().map(|&r| self.get(r)).sum()
    }
}

// ── Configuration ──────────────────────────────────────────────────────

/// Standard team colours, in display order.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "white", "black", "grey",
];

/// Everything one draw needs besides the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub team_count: usize,
    pub capacity: RoleCapacity,
    /// Fixed seed for reproducible draws; `None` draws from entropy.
    pub seed: Option<u64>,
    pub assign_colors: bool,
    pub palette: Vec<String>,
    pub seating: SeatingPolicy,
}

impl Configuration {
    pub fn new(team_count: usize, capacity: RoleCapacity) -> Result<Self> {
        if team_count < 2 {
            return Err(DrawError::InvalidConfiguration(format!(
                "team count must be at least 2, got {}",
                team_count
            )));
        }
        Ok(Configuration {
            team_count,
            capacity,
            seed: None,
            assign_colors: true,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            seating: SeatingPolicy::default(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_colors(mut self, assign_colors: bool) -> Self {
        self.assign_colors = assign_colors;
        self
    }

    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_seating(mut self, seating: SeatingPolicy) -> Self {
        self.seating = seating;
        self
    }
}

// ── Team / Partition ───────────────────────────────────────────────────

/// One drawn team. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub index: usize,
    pub color: Option<String>,
    pub roster: BTreeMap<Role, Vec<Player>>,
}

impl Team {
    /// Empty team with a slot for every role.
    pub fn empty(index: usize) -> Self {
        Team {
            index,
            color: None,
            roster: Role::ALL.iter().map(|&r| (r, Vec::new())).collect(),
        }
    }

    pub fn players(&self, role: Role) -> &[Player] {
        self.roster.get(&role).map_or(&[], |v| v.as_slice())
    }

    pub fn count(&self, role: Role) -> usize {
        self.players(role).len()
    }

    pub fn size(&self) -> usize {
        self.roster.values().map(Vec::len).sum()
    }
}

/// Result of one draw: every input player is either on exactly one team
/// or in `overflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub teams: Vec<Team>,
    pub overflow: Vec<Player>,
}

impl Partition {
    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }

    pub fn team(&self, index: usize) -> Option<&Team> {
        self.teams.iter().find(|t| t.index == index)
    }

    pub fn seated_count(&self) -> usize {
        self.teams.iter().map(Team::size).sum()
    }

    /// All players, seated first (team by team), then overflow.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.teams
            .iter()
            .flat_map(|t| t.roster.values().flatten())
            .chain(self.overflow.iter())
    }
}
