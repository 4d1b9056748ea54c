// ==========================================
// 人力排班系统 - 技能短班模式仓储
// ==========================================
// 职责: 管理 skill_pattern 表 (短班长度白名单)
// ==========================================

use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::db::open_sqlite_connection;
use crate::domain::demand::SkillPattern;
use crate::domain::types::{weekday_code, weekday_from_code};
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct SkillPatternRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SkillPatternRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS skill_pattern (
              pattern_id TEXT PRIMARY KEY,
              skill_id TEXT NOT NULL,
              day_of_week TEXT,
              start_min INTEGER NOT NULL,
              end_min INTEGER NOT NULL,
              allowed_length_hours INTEGER NOT NULL,
              active INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_skill_pattern_skill
              ON skill_pattern(skill_id, active);
            "#,
        )?;
        Ok(())
    }

    pub fn save(&self, pattern: &SkillPattern) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO skill_pattern (
              pattern_id, skill_id, day_of_week, start_min, end_min,
              allowed_length_hours, active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(pattern_id) DO UPDATE SET
              skill_id = ?2, day_of_week = ?3, start_min = ?4, end_min = ?5,
              allowed_length_hours = ?6, active = ?7
            "#,
            params![
                pattern.pattern_id,
                pattern.skill_id,
                pattern.day_of_week.map(weekday_code),
                pattern.start_min,
                pattern.end_min,
                pattern.allowed_length_hours,
                pattern.active,
            ],
        )?;
        Ok(())
    }

    /// 读取全部启用模式
    pub fn list_active(&self) -> RepositoryResult<Vec<SkillPattern>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT pattern_id, skill_id, day_of_week, start_min, end_min,
                   allowed_length_hours, active
            FROM skill_pattern
            WHERE active = 1
            ORDER BY skill_id ASC, pattern_id ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SkillPattern {
                pattern_id: row.get(0)?,
                skill_id: row.get(1)?,
                day_of_week: row
                    .get::<_, Option<String>>(2)?
                    .as_deref()
                    .and_then(weekday_from_code),
                start_min: row.get(3)?,
                end_min: row.get(4)?,
                allowed_length_hours: row.get(5)?,
                active: row.get(6)?,
            })
        })?;

        let mut patterns = Vec::new();
        for row in rows {
            patterns.push(row?);
        }
        Ok(patterns)
    }
}
