// ==========================================
// 人力排班系统 - 员工仓储
// ==========================================
// 职责: 管理 employee / employee_skill / availability_window 表
// 说明: 引擎在运行开始时一次性批量读取, 避免 N+1 查询
// ==========================================

use rusqlite::{params, Connection};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::db::open_sqlite_connection;
use crate::domain::employee::{AvailabilityWindow, DailyRule, Employee};
use crate::domain::types::{weekday_code, weekday_from_code};
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
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

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS employee (
              employee_id TEXT PRIMARY KEY,
              display_name TEXT NOT NULL,
              eligible_full INTEGER NOT NULL DEFAULT 1,
              eligible_short_morning INTEGER NOT NULL DEFAULT 0,
              eligible_short_afternoon INTEGER NOT NULL DEFAULT 0,
              daily_max_hours INTEGER NOT NULL DEFAULT 8,
              weekly_max_hours INTEGER NOT NULL DEFAULT 40,
              allow_multiple_shifts_per_day INTEGER NOT NULL DEFAULT 0,
              allow_holiday_work INTEGER NOT NULL DEFAULT 1,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS employee_skill (
              employee_id TEXT NOT NULL,
              skill_id TEXT NOT NULL,
              PRIMARY KEY (employee_id, skill_id),
              FOREIGN KEY (employee_id) REFERENCES employee(employee_id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS availability_window (
              employee_id TEXT NOT NULL,
              day_of_week TEXT NOT NULL,
              start_min INTEGER NOT NULL,
              end_min INTEGER NOT NULL,
              FOREIGN KEY (employee_id) REFERENCES employee(employee_id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_employee_skill_skill
              ON employee_skill(skill_id);
            CREATE INDEX IF NOT EXISTS idx_availability_employee
              ON availability_window(employee_id, day_of_week);
            "#,
        )?;
        Ok(())
    }

    /// 保存员工（含技能集合, 先删后插）
    pub fn save(&self, employee: &Employee) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT INTO employee (
              employee_id, display_name, eligible_full, eligible_short_morning,
              eligible_short_afternoon, daily_max_hours, weekly_max_hours,
              allow_multiple_shifts_per_day, allow_holiday_work
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(employee_id) DO UPDATE SET
              display_name = ?2, eligible_full = ?3, eligible_short_morning = ?4,
              eligible_short_afternoon = ?5, daily_max_hours = ?6,
              weekly_max_hours = ?7, allow_multiple_shifts_per_day = ?8,
              allow_holiday_work = ?9
            "#,
            params![
                employee.employee_id,
                employee.display_name,
                employee.eligible_full,
                employee.eligible_short_morning,
                employee.eligible_short_afternoon,
                employee.daily_rule.daily_max_hours,
                employee.daily_rule.weekly_max_hours,
                employee.daily_rule.allow_multiple_shifts_per_day,
                employee.daily_rule.allow_holiday_work,
            ],
        )?;

        tx.execute(
            "DELETE FROM employee_skill WHERE employee_id = ?1",
            params![employee.employee_id],
        )?;
        for skill_id in &employee.skill_ids {
            tx.execute(
                "INSERT INTO employee_skill (employee_id, skill_id) VALUES (?1, ?2)",
                params![employee.employee_id, skill_id],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 保存一条周可用时段
    pub fn add_availability(&self, window: &AvailabilityWindow) -> RepositoryResult<()> {
        if window.start_min >= window.end_min {
            return Err(RepositoryError::FieldValueError {
                field: "start_min/end_min".to_string(),
                message: "可用时段开始必须早于结束".to_string(),
            });
        }
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO availability_window (employee_id, day_of_week, start_min, end_min)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                window.employee_id,
                weekday_code(window.day_of_week),
                window.start_min,
                window.end_min,
            ],
        )?;
        Ok(())
    }

    /// 批量读取全部员工（含技能集合, 按 employee_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;

        // 技能集合先整表读出, 按员工分组
        let mut skills: HashMap<String, BTreeSet<String>> = HashMap::new();
        {
            let mut stmt =
                conn.prepare("SELECT employee_id, skill_id FROM employee_skill")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (employee_id, skill_id) = row?;
                skills.entry(employee_id).or_default().insert(skill_id);
            }
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT employee_id, display_name, eligible_full, eligible_short_morning,
                   eligible_short_afternoon, daily_max_hours, weekly_max_hours,
                   allow_multiple_shifts_per_day, allow_holiday_work
            FROM employee
            ORDER BY employee_id ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Employee {
                employee_id: row.get(0)?,
                display_name: row.get(1)?,
                skill_ids: BTreeSet::new(),
                eligible_full: row.get(2)?,
                eligible_short_morning: row.get(3)?,
                eligible_short_afternoon: row.get(4)?,
                daily_rule: DailyRule {
                    daily_max_hours: row.get(5)?,
                    weekly_max_hours: row.get(6)?,
                    allow_multiple_shifts_per_day: row.get(7)?,
                    allow_holiday_work: row.get(8)?,
                },
            })
        })?;

        let mut employees = Vec::new();
        for row in rows {
            let mut employee = row?;
            if let Some(skill_ids) = skills.remove(&employee.employee_id) {
                employee.skill_ids = skill_ids;
            }
            employees.push(employee);
        }
        Ok(employees)
    }

    /// 批量读取全部周可用时段
    pub fn list_availability(&self) -> RepositoryResult<Vec<AvailabilityWindow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT employee_id, day_of_week, start_min, end_min FROM availability_window",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i32>(2)?,
                row.get::<_, i32>(3)?,
            ))
        })?;

        let mut windows = Vec::new();
        for row in rows {
            let (employee_id, code, start_min, end_min) = row?;
            let day_of_week =
                weekday_from_code(&code).ok_or_else(|| RepositoryError::FieldValueError {
                    field: "day_of_week".to_string(),
                    message: format!("非法的周几编码: {}", code),
                })?;
            windows.push(AvailabilityWindow {
                employee_id,
                day_of_week,
                start_min,
                end_min,
            });
        }
        Ok(windows)
    }
}
