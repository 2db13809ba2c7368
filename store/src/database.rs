// ═══════════════════════════════════════════════════════════════════════
// Database — SQLite storage for saved draws
//
// A context (an event, a match day…) holds at most one draw. Saving a new
// partition replaces the previous one inside a single transaction, so a
// half-written draw is never visible.
// ═══════════════════════════════════════════════════════════════════════

use rusqlite::{params, Connection, OptionalExtension};
use teamdraw_engine::{Partition, Player, Role, Team};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no saved draw for context {0:?}")]
    UnknownContext(String),

    #[error("corrupt row: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Summary row for one saved draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub context: String,
    pub team_count: usize,
    pub seed: Option<u64>,
    pub drawn_at: String,
    pub seated: usize,
    pub overflow: usize,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a database at the given path.
    pub fn open(path: &str) -> Result<Self> {
        let store = Store { conn: Connection::open(path)? };
        store.create_schema()?;
        Ok(store)
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Result<Self> {
        let store = Store { conn: Connection::open_in_memory()? };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch("
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS draws (
                context     TEXT PRIMARY KEY,
                team_count  INTEGER NOT NULL,
                seed        INTEGER,
                drawn_at    TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS teams (
                context     TEXT NOT NULL REFERENCES draws(context) ON DELETE CASCADE,
                team_number INTEGER NOT NULL,
                color       TEXT,
                PRIMARY KEY (context, team_number)
            );

            -- team_number NULL = player left in overflow
            CREATE TABLE IF NOT EXISTS assignments (
                id          INTEGER PRIMARY KEY,
                context     TEXT NOT NULL REFERENCES draws(context) ON DELETE CASCADE,
                player_id   INTEGER NOT NULL,
                player_name TEXT NOT NULL,
                role        TEXT NOT NULL,
                tier        INTEGER NOT NULL,
                team_number INTEGER,
                UNIQUE (context, player_id)
            );
        ")?;
        debug!("schema ready");
        Ok(())
    }

    /// Replace the saved draw for `context` with `partition`.
    /// Returns the number of assignment rows written.
    pub fn save_partition(&mut self, context: &str, partition: &Partition, seed: Option<u64>) -> Result<usize> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM assignments WHERE context = ?1", params![context])?;
        tx.execute("DELETE FROM teams WHERE context = ?1", params![context])?;
        tx.execute(
            "INSERT INTO draws (context, team_count, seed) VALUES (?1, ?2, ?3)
             ON CONFLICT(context) DO UPDATE SET
                team_count = excluded.team_count,
                seed = excluded.seed,
                drawn_at = datetime('now')",
            params![context, partition.teams.len() as i64, seed.map(|s| s as i64)],
        )?;

        let mut rows = 0;
        {
            let mut team_stmt = tx.prepare(
                "INSERT INTO teams (context, team_number, color) VALUES (?1, ?2, ?3)",
            )?;
            let mut player_stmt = tx.prepare(
                "INSERT INTO assignments (context, player_id, player_name, role, tier, team_number)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for team in &partition.teams {
                team_stmt.execute(params![context, team.index as i64, team.color])?;
                for p in team.roster.values().flatten() {
                    player_stmt.execute(params![
                        context,
                        p.id as i64,
                        p.name,
                        p.role.code(),
                        p.tier,
                        Some(team.index as i64),
                    ])?;
                    rows += 1;
                }
            }
            for p in &partition.overflow {
                player_stmt.execute(params![
                    context,
                    p.id as i64,
                    p.name,
                    p.role.code(),
                    p.tier,
                    None::<i64>,
                ])?;
                rows += 1;
            }
        }

        tx.commit()?;
        info!(context, rows, overflow = partition.overflow.len(), "draw saved");
        Ok(rows)
    }

    /// Rebuild the saved partition for `context`, seating order preserved.
    pub fn load_partition(&self, context: &str) -> Result<Partition> {
        let team_count: i64 = self
            .conn
            .query_row(
                "SELECT team_count FROM draws WHERE context = ?1",
                params![context],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::UnknownContext(context.to_string()))?;

        let mut teams: Vec<Team> = (1..=count(team_count, "team_count")?).map(Team::empty).collect();

        let mut stmt = self.conn.prepare(
            "SELECT team_number, color FROM teams WHERE context = ?1 ORDER BY team_number",
        )?;
        let colors = stmt.query_map(params![context], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })?;
        for row in colors {
            let (number, color) = row?;
            let team = team_slot(&mut teams, number)?;
            team.color = color;
        }

        let mut stmt = self.conn.prepare(
            "SELECT player_id, player_name, role, tier, team_number
             FROM assignments WHERE context = ?1 ORDER BY id",
        )?;
        let players = stmt.query_map(params![context], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, Option<i64>>(4)?,
            ))
        })?;

        let mut overflow = Vec::new();
        for row in players {
            let (id, name, role, tier, team_number) = row?;
            let role: Role = role
                .parse()
                .map_err(|_| StoreError::Encoding(format!("unknown role {:?} for player {}", role, id)))?;
            let player = Player::new(id as u64, name, role, tier);
            match team_number {
                Some(n) => team_slot(&mut teams, n)?.roster.entry(role).or_default().push(player),
                None => overflow.push(player),
            }
        }

        Ok(Partition { teams, overflow })
    }

    /// All saved draws, most recent first.
    pub fn contexts(&self) -> Result<Vec<DrawRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.context, d.team_count, d.seed, d.drawn_at,
                    COUNT(a.team_number), COUNT(a.id) - COUNT(a.team_number)
             FROM draws d LEFT JOIN assignments a ON a.context = d.context
             GROUP BY d.context
             ORDER BY d.drawn_at DESC, d.context",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let records = rows
            .into_iter()
            .map(|(context, team_count, seed, drawn_at, seated, overflow)| {
                Ok(DrawRecord {
                    team_count: count(team_count, "team_count")?,
                    seed: seed.map(|s| s as u64),
                    seated: count(seated, "seated")?,
                    overflow: count(overflow, "overflow")?,
                    context,
                    drawn_at,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Remove a saved draw. Returns false when there was nothing to remove.
    pub fn delete(&mut self, context: &str) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM draws WHERE context = ?1", params![context])?;
        Ok(removed > 0)
    }
}

fn count(value: i64, column: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| StoreError::Encoding(format!("{} is {}", column, value)))
}

fn team_slot(teams: &mut [Team], number: i64) -> Result<&mut Team> {
    usize::try_from(number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| teams.get_mut(i))
        .ok_or_else(|| StoreError::Encoding(format!("team number {} out of range", number)))
}
