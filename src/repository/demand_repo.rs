// ==========================================
// 人力排班系统 - 需求声明仓储
// ==========================================
// 职责: 管理 demand_declaration 表
// 红线: 无技能需求在入库时拒绝 (历史"全局需求"已废弃)
// ==========================================

use chrono::{NaiveDate, Weekday};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::db::open_sqlite_connection;
use crate::domain::demand::DemandDeclaration;
use crate::domain::types::{weekday_code, weekday_from_code};
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct DemandRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DemandRepository {
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
            CREATE TABLE IF NOT EXISTS demand_declaration (
              demand_id TEXT PRIMARY KEY,
              skill_id TEXT NOT NULL,
              demand_date TEXT,
              day_of_week TEXT,
              start_min INTEGER NOT NULL,
              end_min INTEGER NOT NULL,
              required_seats INTEGER NOT NULL,
              active INTEGER NOT NULL DEFAULT 1,
              sort_order INTEGER NOT NULL DEFAULT 0,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              CHECK (demand_date IS NOT NULL OR day_of_week IS NOT NULL)
            );

            CREATE INDEX IF NOT EXISTS idx_demand_date
              ON demand_declaration(demand_date);
            CREATE INDEX IF NOT EXISTS idx_demand_dow
              ON demand_declaration(day_of_week);
            "#,
        )?;
        Ok(())
    }

    /// 保存需求声明
    ///
    /// 入库校验: 必须携带技能; date 与 day_of_week 恰好一个
    pub fn save(&self, decl: &DemandDeclaration) -> RepositoryResult<()> {
        if decl.skill_id.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "需求声明必须指定技能 (无技能的全局需求已废弃)".to_string(),
            ));
        }
        if decl.date.is_some() == decl.day_of_week.is_some() {
            return Err(RepositoryError::ValidationError(
                "需求声明的 date 与 day_of_week 必须恰好指定一个".to_string(),
            ));
        }
        if decl.required_seats < 0 {
            return Err(RepositoryError::FieldValueError {
                field: "required_seats".to_string(),
                message: "席位数不能为负".to_string(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO demand_declaration (
              demand_id, skill_id, demand_date, day_of_week,
              start_min, end_min, required_seats, active, sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(demand_id) DO UPDATE SET
              skill_id = ?2, demand_date = ?3, day_of_week = ?4,
              start_min = ?5, end_min = ?6, required_seats = ?7,
              active = ?8, sort_order = ?9
            "#,
            params![
                decl.demand_id,
                decl.skill_id,
                decl.date.map(|d| d.to_string()),
                decl.day_of_week.map(weekday_code),
                decl.start_min,
                decl.end_min,
                decl.required_seats,
                decl.active,
                decl.sort_order,
            ],
        )?;
        Ok(())
    }

    /// 读取某日生效的启用需求声明
    ///
    /// 命中条件: demand_date == day 或 (demand_date 为空且 day_of_week 命中)
    /// 排序: sort_order, demand_id (稳定输入顺序)
    pub fn list_active_for_day(
        &self,
        day: NaiveDate,
        weekday: Weekday,
    ) -> RepositoryResult<Vec<DemandDeclaration>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT demand_id, skill_id, demand_date, day_of_week,
                   start_min, end_min, required_seats, active, sort_order
            FROM demand_declaration
            WHERE active = 1
              AND (demand_date = ?1 OR (demand_date IS NULL AND day_of_week = ?2))
            ORDER BY sort_order ASC, demand_id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![day.to_string(), weekday_code(weekday)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, i32>(4)?,
                row.get::<_, i32>(5)?,
                row.get::<_, i32>(6)?,
                row.get::<_, bool>(7)?,
                row.get::<_, i32>(8)?,
            ))
        })?;

        let mut declarations = Vec::new();
        for row in rows {
            let (demand_id, skill_id, date_raw, dow_raw, start_min, end_min, seats, active, sort) =
                row?;
            let date = match date_raw {
                Some(s) => Some(s.parse::<NaiveDate>().map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "demand_date".to_string(),
                        message: e.to_string(),
                    }
                })?),
                None => None,
            };
            declarations.push(DemandDeclaration {
                demand_id,
                skill_id,
                date,
                day_of_week: dow_raw.as_deref().and_then(weekday_from_code),
                start_min,
                end_min,
                required_seats: seats,
                active,
                sort_order: sort,
            });
        }
        Ok(declarations)
    }
}
