// ═══════════════════════════════════════════════════════════════════════
// Settings — JSON draw configuration and roster files
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::allocator::SeatingPolicy;
use crate::error::{DrawError, Result};
use crate::formation::Formation;
use crate::types::*;

/// On-disk form of a draw configuration. Counts are signed so that a
/// negative value is reported instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSettings {
    pub team_count: i64,
    #[serde(default)]
    pub formation: Option<String>,
    #[serde(default)]
    pub capacity_by_role: Option<BTreeMap<Role, i64>>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_assign_colors")]
    pub assign_colors: bool,
    #[serde(default)]
    pub palette: Option<Vec<String>>,
    #[serde(default)]
    pub seating: SeatingPolicy,
}

fn default_assign_colors() -> bool {
    true
}

impl TryFrom<DrawSettings> for Configuration {
    type Error = DrawError;

    fn try_from(s: DrawSettings) -> Result<Self> {
        let capacity = match (&s.formation, &s.capacity_by_role) {
            (Some(descriptor), None) => descriptor.parse::<Formation>()?.capacity(),
            (None, Some(map)) => capacity_from_map(map)?,
            (Some(_), Some(_)) => {
                return Err(DrawError::InvalidConfiguration(
                    "give either formation or capacity_by_role, not both".into(),
                ))
            }
            (None, None) => {
                return Err(DrawError::InvalidConfiguration(
                    "one of formation or capacity_by_role is required".into(),
                ))
            }
        };

        let team_count = usize::try_from(s.team_count).map_err(|_| {
            DrawError::InvalidConfiguration(format!("team count must be at least 2, got {}", s.team_count))
        })?;

        let mut config = Configuration::new(team_count, capacity)?
            .with_colors(s.assign_colors)
            .with_seating(s.seating);
        if let Some(seed) = s.seed {
            config = config.with_seed(seed);
        }
        if let Some(palette) = s.palette {
            config = config.with_palette(palette);
        }
        Ok(config)
    }
}

fn capacity_from_map(map: &BTreeMap<Role, i64>) -> Result<RoleCapacity> {
    let get = |role: Role| -> Result<usize> {
        let n = map.get(&role).copied().unwrap_or(0);
        usize::try_from(n).map_err(|_| {
            DrawError::InvalidConfiguration(format!("capacity for {} must not be negative, got {}", role, n))
        })
    };
    Ok(RoleCapacity::new(
        get(Role::Goalkeeper)?,
        get(Role::Defender)?,
        get(Role::Midfielder)?,
        get(Role::Forward)?,
    ))
}

/// Parse a draw configuration from JSON.
pub fn parse_settings(json: &str) -> Result<Configuration> {
    let settings: DrawSettings = serde_json::from_str(json)
        .map_err(|e| DrawError::InvalidConfiguration(format!("draw settings: {}", e)))?;
    Configuration::try_from(settings)
}

/// Parse a roster (JSON array of players) and check it.
pub fn parse_roster(json: &str) -> Result<Vec<Player>> {
    let roster: Vec<Player> = serde_json::from_str(json)
        .map_err(|e| DrawError::InvalidConfiguration(format!("roster: {}", e)))?;
    check_roster(&roster)?;
    Ok(roster)
}
