// ==========================================
// 人力排班系统 - 排班结果仓储
// ==========================================
// 职责: 管理 assignment / break_period 表
// 红线: 周期重算 = 整段删除重建 (break_period 级联删除),
//       且删除与写入在同一事务内完成
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use crate::db::open_sqlite_connection;
use crate::domain::assignment::Assignment;
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
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
            CREATE TABLE IF NOT EXISTS assignment (
              assignment_id TEXT PRIMARY KEY,
              employee_id TEXT NOT NULL,
              work_date TEXT NOT NULL,
              label TEXT NOT NULL,
              start_min INTEGER NOT NULL,
              end_min INTEGER NOT NULL,
              created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS break_period (
              break_id TEXT PRIMARY KEY,
              assignment_id TEXT NOT NULL,
              start_min INTEGER NOT NULL,
              end_min INTEGER NOT NULL,
              FOREIGN KEY (assignment_id) REFERENCES assignment(assignment_id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_assignment_date
              ON assignment(work_date);
            CREATE INDEX IF NOT EXISTS idx_assignment_employee
              ON assignment(employee_id, work_date);
            "#,
        )?;
        Ok(())
    }

    /// 整段替换: 删除范围内全部指派 (含依赖的休息时段) 并批量写入新结果
    ///
    /// 单事务完成, 失败时整体回滚, 不留部分写入
    pub fn replace_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        assignments: &[Assignment],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        // break_period 由外键级联删除
        tx.execute(
            "DELETE FROM assignment WHERE work_date >= ?1 AND work_date <= ?2",
            params![from.to_string(), to.to_string()],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO assignment (
                  assignment_id, employee_id, work_date, label, start_min, end_min, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for a in assignments {
                stmt.execute(params![
                    a.assignment_id,
                    a.employee_id,
                    a.work_date.to_string(),
                    a.label,
                    a.start_min,
                    a.end_min,
                    a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 读取日期范围内的指派（闭区间, 稳定排序）
    pub fn list_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT assignment_id, employee_id, work_date, label, start_min, end_min, created_at
            FROM assignment
            WHERE work_date >= ?1 AND work_date <= ?2
            ORDER BY work_date ASC, start_min ASC, employee_id ASC, assignment_id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![from.to_string(), to.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i32>(4)?,
                row.get::<_, i32>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut assignments = Vec::new();
        for row in rows {
            assignments.push(Self::map_row(row?)?);
        }
        Ok(assignments)
    }

    /// 查找严格早于指定日期的最后一条指派
    ///
    /// 用途: 月度轮转偏移的种子
    pub fn find_last_before(&self, day: NaiveDate) -> RepositoryResult<Option<Assignment>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT assignment_id, employee_id, work_date, label, start_min, end_min, created_at
                FROM assignment
                WHERE work_date < ?1
                ORDER BY work_date DESC, start_min DESC, employee_id DESC, assignment_id DESC
                LIMIT 1
                "#,
                params![day.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i32>(4)?,
                        row.get::<_, i32>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some(raw) => Ok(Some(Self::map_row(raw)?)),
            None => Ok(None),
        }
    }

    #[allow(clippy::type_complexity)]
    fn map_row(
        raw: (String, String, String, String, i32, i32, String),
    ) -> RepositoryResult<Assignment> {
        let (assignment_id, employee_id, date_raw, label, start_min, end_min, created_raw) = raw;
        let work_date = date_raw
            .parse::<NaiveDate>()
            .map_err(|e| RepositoryError::FieldValueError {
                field: "work_date".to_string(),
                message: e.to_string(),
            })?;
        let created_at = NaiveDateTime::parse_from_str(&created_raw, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| RepositoryError::FieldValueError {
                field: "created_at".to_string(),
                message: e.to_string(),
            })?;
        Ok(Assignment {
            assignment_id,
            employee_id,
            work_date,
            label,
            start_min,
            end_min,
            created_at,
        })
    }
}
