// ═══════════════════════════════════════════════════════════════════════
// Formation — "D-M-F" descriptors and the per-team capacities they imply
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DrawError, Result};
use crate::types::RoleCapacity;

/// Outfield shape of one team. The goalkeeper is implicit and always 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

/// A named entry in the formation catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub descriptor: &'static str,
    pub label: &'static str,
}

const PRESETS: [Preset; 9] = [
    Preset { descriptor: "3-5-2", label: "Defensive" },
    Preset { descriptor: "4-4-2", label: "Balanced" },
    Preset { descriptor: "4-3-3", label: "Attacking" },
    Preset { descriptor: "3-4-3", label: "Attacking" },
    Preset { descriptor: "5-3-2", label: "Very Defensive" },
    Preset { descriptor: "4-5-1", label: "Defensive" },
    Preset { descriptor: "3-3-4", label: "Ultra Attacking" },
    Preset { descriptor: "2-3-1", label: "7v7" },
    Preset { descriptor: "2-2-1", label: "6v6" },
];

impl Formation {
    pub const GOALKEEPERS: usize = 1;

    pub fn new(defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Formation { defenders, midfielders, forwards }
    }

    /// Players per team, goalkeeper included.
    pub fn total(&self) -> usize {
        Self::GOALKEEPERS + self.defenders + self.midfielders + self.forwards
    }

    pub fn capacity(&self) -> RoleCapacity {
        RoleCapacity::new(Self::GOALKEEPERS, self.defenders, self.midfielders, self.forwards)
    }

    pub fn presets() -> &'static [Preset] {
        &PRESETS
    }
}

impl FromStr for Formation {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DrawError::InvalidFormationFormat(s.to_string());

        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut counts = [0usize; 3];
        for (slot, part) in counts.iter_mut().zip(&parts) {
            let part = part.trim();
            // usize parsing accepts a leading '+'; a descriptor should not
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Ok(Formation::new(counts[0], counts[1], counts[2]))
    }
}

impl std::fmt::Display for Formation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// Parse a descriptor straight into per-team capacities.
pub fn resolve(descriptor: &str) -> Result<RoleCapacity> {
    descriptor.parse::<Formation>().map(|f| f.capacity())
}
