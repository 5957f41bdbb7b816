//! Teams and membership. The owner is created as a member and stays one
//! for the team's lifetime.

use super::users::ensure_user_internal;
use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::{Team, TeamMember};
use anyhow::Result;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_MEMBER: &str = "member";

fn parse_team_row(row: &Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get("id")?,
        name: row.get("name")?,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_member_row(row: &Row) -> rusqlite::Result<TeamMember> {
    Ok(TeamMember {
        team_id: row.get("team_id")?,
        user_id: row.get("user_id")?,
        role: row.get("role")?,
        joined_at: row.get("joined_at")?,
    })
}

fn get_team_internal(conn: &Connection, team_id: &str) -> Result<Option<Team>> {
    let mut stmt = conn.prepare("SELECT * FROM teams WHERE id = ?1")?;

    let result = stmt.query_row(params![team_id], parse_team_row);

    match result {
        Ok(team) => Ok(Some(team)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn is_member_internal(conn: &Connection, team_id: &str, user_id: &str) -> Result<bool> {
    let member: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM team_members WHERE team_id = ?1 AND user_id = ?2)",
        params![team_id, user_id],
        |row| row.get(0),
    )?;
    Ok(member)
}

impl Database {
    /// Create a team owned by the caller, who joins as owner.
    pub fn create_team(&self, owner_id: &str, name: String) -> Result<Team> {
        let team_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            ensure_user_internal(&tx, owner_id)?;

            tx.execute(
                "INSERT INTO teams (id, name, owner_id, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![&team_id, &name, owner_id, now],
            )?;

            tx.execute(
                "INSERT INTO team_members (team_id, user_id, role, joined_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&team_id, owner_id, ROLE_OWNER, now],
            )?;

            tx.commit()?;

            Ok(Team {
                id: team_id,
                name,
                owner_id: owner_id.to_string(),
                created_at: now,
            })
        })
    }

    /// Get a team the caller belongs to.
    pub fn get_team(&self, team_id: &str, user_id: &str) -> Result<Option<Team>> {
        self.with_conn(|conn| {
            let Some(team) = get_team_internal(conn, team_id)? else {
                return Ok(None);
            };
            if !is_member_internal(conn, team_id, user_id)? {
                // Non-members cannot observe the team's existence.
                return Ok(None);
            }
            Ok(Some(team))
        })
    }

    /// List the teams the user belongs to.
    pub fn list_teams(&self, user_id: &str) -> Result<Vec<Team>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT t.* FROM teams t
                 INNER JOIN team_members m ON t.id = m.team_id
                 WHERE m.user_id = ?1
                 ORDER BY t.created_at",
            )?;
            let teams = stmt
                .query_map(params![user_id], parse_team_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(teams)
        })
    }

    /// Delete a team. Only the owner may do this.
    pub fn delete_team(&self, team_id: &str, user_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let team = get_team_internal(conn, team_id)?
                .ok_or_else(|| ApiError::team_not_found(team_id))?;

            if team.owner_id != user_id {
                return Err(
                    ApiError::not_owner("Only the team owner can delete a team").into(),
                );
            }

            conn.execute("DELETE FROM teams WHERE id = ?1", params![team_id])?;
            Ok(())
        })
    }

    /// Add a member. Only the owner may invite; the target user must be
    /// registered.
    pub fn add_team_member(
        &self,
        team_id: &str,
        caller_id: &str,
        user_id: &str,
    ) -> Result<TeamMember> {
        let now = now_ms();

        self.with_conn(|conn| {
            let team = get_team_internal(conn, team_id)?
                .ok_or_else(|| ApiError::team_not_found(team_id))?;

            if team.owner_id != caller_id {
                return Err(
                    ApiError::not_owner("Only the team owner can add members").into(),
                );
            }

            let user_exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
                params![user_id],
                |row| row.get(0),
            )?;
            if !user_exists {
                return Err(ApiError::user_not_found(user_id).into());
            }

            let inserted = conn.execute(
                "INSERT OR IGNORE INTO team_members (team_id, user_id, role, joined_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![team_id, user_id, ROLE_MEMBER, now],
            )?;

            if inserted == 0 {
                return Err(ApiError::already_exists(format!(
                    "User {} is already a member of team {}",
                    user_id, team_id
                ))
                .into());
            }

            Ok(TeamMember {
                team_id: team_id.to_string(),
                user_id: user_id.to_string(),
                role: ROLE_MEMBER.to_string(),
                joined_at: now,
            })
        })
    }

    /// Remove a member. The owner can remove anyone but themselves;
    /// members can remove themselves (leave).
    pub fn remove_team_member(
        &self,
        team_id: &str,
        caller_id: &str,
        user_id: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let team = get_team_internal(conn, team_id)?
                .ok_or_else(|| ApiError::team_not_found(team_id))?;

            if user_id == team.owner_id {
                return Err(ApiError::invalid_state(
                    "The team owner cannot leave; delete the team instead",
                )
                .into());
            }

            if caller_id != team.owner_id && caller_id != user_id {
                return Err(
                    ApiError::not_owner("Only the team owner can remove other members").into(),
                );
            }

            let deleted = conn.execute(
                "DELETE FROM team_members WHERE team_id = ?1 AND user_id = ?2",
                params![team_id, user_id],
            )?;

            if deleted == 0 {
                return Err(ApiError::user_not_found(user_id).into());
            }

            Ok(())
        })
    }

    /// List members of a team the caller belongs to.
    pub fn list_team_members(&self, team_id: &str, caller_id: &str) -> Result<Vec<TeamMember>> {
        self.with_conn(|conn| {
            if get_team_internal(conn, team_id)?.is_none()
                || !is_member_internal(conn, team_id, caller_id)?
            {
                return Err(ApiError::team_not_found(team_id).into());
            }

            let mut stmt = conn.prepare(
                "SELECT * FROM team_members WHERE team_id = ?1 ORDER BY joined_at",
            )?;
            let members = stmt
                .query_map(params![team_id], parse_member_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(members)
        })
    }
}
