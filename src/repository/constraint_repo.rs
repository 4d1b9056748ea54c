// ==========================================
// 人力排班系统 - 员工约束仓储
// ==========================================
// 职责: 管理 employee_constraint / holiday 表
// 说明: 约束按日期范围批量读取, 引擎内分组为快照映射
// ==========================================

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::db::open_sqlite_connection;
use crate::domain::constraint::{ConstraintKind, EmployeeConstraint};
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct ConstraintRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ConstraintRepository {
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
            CREATE TABLE IF NOT EXISTS employee_constraint (
              constraint_id TEXT PRIMARY KEY,
              employee_id TEXT NOT NULL,
              constraint_date TEXT NOT NULL,
              constraint_type TEXT NOT NULL,
              start_min INTEGER,
              end_min INTEGER,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS holiday (
              holiday_date TEXT PRIMARY KEY,
              holiday_name TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_constraint_date
              ON employee_constraint(constraint_date);
            CREATE INDEX IF NOT EXISTS idx_constraint_employee
              ON employee_constraint(employee_id, constraint_date);
            "#,
        )?;
        Ok(())
    }

    /// 保存约束记录
    pub fn save(&self, constraint: &EmployeeConstraint) -> RepositoryResult<()> {
        let (type_code, start_min, end_min) = match constraint.kind {
            ConstraintKind::Unavailable => ("UNAVAILABLE", None, None),
            ConstraintKind::Vacation => ("VACATION", None, None),
            ConstraintKind::SickLeave => ("SICK_LEAVE", None, None),
            ConstraintKind::Personal => ("PERSONAL", None, None),
            ConstraintKind::Limited { start_min, end_min } => {
                ("LIMITED", Some(start_min), Some(end_min))
            }
            ConstraintKind::Preferred { start_min, end_min } => {
                ("PREFERRED", Some(start_min), Some(end_min))
            }
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employee_constraint (
              constraint_id, employee_id, constraint_date, constraint_type, start_min, end_min
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(constraint_id) DO UPDATE SET
              employee_id = ?2, constraint_date = ?3, constraint_type = ?4,
              start_min = ?5, end_min = ?6
            "#,
            params![
                constraint.constraint_id,
                constraint.employee_id,
                constraint.constraint_date.to_string(),
                type_code,
                start_min,
                end_min,
            ],
        )?;
        Ok(())
    }

    /// 批量读取日期范围内的约束（闭区间）
    pub fn list_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<EmployeeConstraint>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT constraint_id, employee_id, constraint_date, constraint_type, start_min, end_min
            FROM employee_constraint
            WHERE constraint_date >= ?1 AND constraint_date <= ?2
            ORDER BY constraint_date ASC, employee_id ASC, constraint_id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![from.to_string(), to.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<i32>>(4)?,
                row.get::<_, Option<i32>>(5)?,
            ))
        })?;

        let mut constraints = Vec::new();
        for row in rows {
            let (constraint_id, employee_id, date_raw, type_code, start_min, end_min) = row?;
            let constraint_date =
                date_raw
                    .parse::<NaiveDate>()
                    .map_err(|e| RepositoryError::FieldValueError {
                        field: "constraint_date".to_string(),
                        message: e.to_string(),
                    })?;
            let kind = match type_code.as_str() {
                "UNAVAILABLE" => ConstraintKind::Unavailable,
                "VACATION" => ConstraintKind::Vacation,
                "SICK_LEAVE" => ConstraintKind::SickLeave,
                "PERSONAL" => ConstraintKind::Personal,
                "LIMITED" => ConstraintKind::Limited {
                    start_min: start_min.unwrap_or(0),
                    end_min: end_min.unwrap_or(0),
                },
                "PREFERRED" => ConstraintKind::Preferred {
                    start_min: start_min.unwrap_or(0),
                    end_min: end_min.unwrap_or(0),
                },
                other => {
                    return Err(RepositoryError::FieldValueError {
                        field: "constraint_type".to_string(),
                        message: format!("未知的约束类型: {}", other),
                    })
                }
            };
            constraints.push(EmployeeConstraint {
                constraint_id,
                employee_id,
                constraint_date,
                kind,
            });
        }
        Ok(constraints)
    }

    /// 添加节假日
    pub fn add_holiday(&self, day: NaiveDate, name: Option<&str>) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO holiday (holiday_date, holiday_name) VALUES (?1, ?2)",
            params![day.to_string(), name],
        )?;
        Ok(())
    }

    /// 读取日期范围内的节假日集合（闭区间）
    pub fn list_holidays_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<HashSet<NaiveDate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT holiday_date FROM holiday WHERE holiday_date >= ?1 AND holiday_date <= ?2",
        )?;
        let rows = stmt.query_map(params![from.to_string(), to.to_string()], |row| {
            row.get::<_, String>(0)
        })?;

        let mut holidays = HashSet::new();
        for row in rows {
            let raw = row?;
            let day = raw
                .parse::<NaiveDate>()
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "holiday_date".to_string(),
                    message: e.to_string(),
                })?;
            holidays.insert(day);
        }
        Ok(holidays)
    }
}
