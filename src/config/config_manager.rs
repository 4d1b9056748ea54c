// ==========================================
// 人力排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询
// 存储: config_kv 表 (key-value, scope_id='global')
// ==========================================

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use crate::config::roster_config_trait::{PairingSetting, RosterConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::types::GatePolicy;

/// 配置键常量
pub mod config_keys {
    pub const GRANULARITY_MINUTES: &str = "roster.granularity_minutes";
    pub const MAX_WINDOW_MINUTES: &str = "roster.max_window_minutes";
    pub const PRIMARY_BLOCK_HOURS: &str = "roster.primary_block_hours";
    pub const SHORT_BLOCK_HOURS: &str = "roster.short_block_hours";
    pub const GATE_POLICY: &str = "roster.gate_policy";
    pub const SKILL_PRIORITIES: &str = "roster.skill_priorities";
    pub const PAIRING_ENABLED: &str = "roster.pairing.enabled";
    pub const PAIRING_FULL_WINDOW: &str = "roster.pairing.full_window";
    pub const PAIRING_MORNING_WINDOW: &str = "roster.pairing.morning_window";
    pub const PAIRING_AFTERNOON_WINDOW: &str = "roster.pairing.afternoon_window";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 确保 config_kv 表存在
    fn ensure_table(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL DEFAULT 'global',
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置值（测试与初始化工具使用）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取 i32 配置, 缺失或非法时回落默认值
    fn get_i32_or(&self, key: &str, default: i32) -> Result<i32, Box<dyn Error + Send + Sync>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(default))
    }

    fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "Y"))
            .unwrap_or(default))
    }
}

#[async_trait]
impl RosterConfigReader for ConfigManager {
    async fn get_granularity_minutes(&self) -> Result<i32, Box<dyn Error + Send + Sync>> {
        let v = self.get_i32_or(config_keys::GRANULARITY_MINUTES, 30)?;
        if v <= 0 || v > 1440 {
            return Ok(30);
        }
        Ok(v)
    }

    async fn get_max_window_minutes(&self) -> Result<i32, Box<dyn Error + Send + Sync>> {
        self.get_i32_or(config_keys::MAX_WINDOW_MINUTES, 540)
    }

    async fn get_primary_block_hours(&self) -> Result<i32, Box<dyn Error + Send + Sync>> {
        self.get_i32_or(config_keys::PRIMARY_BLOCK_HOURS, 8)
    }

    async fn get_short_block_hours(&self) -> Result<Vec<i32>, Box<dyn Error + Send + Sync>> {
        // 逗号分隔, 如 "6,4"
        let raw = self
            .get_config_value(config_keys::SHORT_BLOCK_HOURS)?
            .unwrap_or_else(|| "6,4".to_string());
        let mut hours: Vec<i32> = raw
            .split(',')
            .filter_map(|s| s.trim().parse::<i32>().ok())
            .filter(|h| *h > 0)
            .collect();
        if hours.is_empty() {
            hours = vec![6, 4];
        }
        Ok(hours)
    }

    async fn get_gate_policy(&self) -> Result<GatePolicy, Box<dyn Error + Send + Sync>> {
        let raw = self
            .get_config_value(config_keys::GATE_POLICY)?
            .unwrap_or_else(|| "A_OR_B".to_string());
        Ok(GatePolicy::from_str(&raw))
    }

    async fn get_skill_priorities(&self) -> Result<HashMap<String, i32>, Box<dyn Error + Send + Sync>> {
        // JSON 对象, 如 {"CASHIER": 1, "BARISTA": 2}
        let raw = match self.get_config_value(config_keys::SKILL_PRIORITIES)? {
            Some(v) => v,
            None => return Ok(HashMap::new()),
        };
        match serde_json::from_str::<HashMap<String, i32>>(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(error = %e, "技能优先级配置解析失败, 使用空映射");
                Ok(HashMap::new())
            }
        }
    }

    async fn get_pairing_setting(&self) -> Result<PairingSetting, Box<dyn Error + Send + Sync>> {
        Ok(PairingSetting {
            enabled: self.get_bool_or(config_keys::PAIRING_ENABLED, false)?,
            full_window: self
                .get_config_value(config_keys::PAIRING_FULL_WINDOW)?
                .unwrap_or_default(),
            morning_window: self
                .get_config_value(config_keys::PAIRING_MORNING_WINDOW)?
                .unwrap_or_default(),
            afternoon_window: self
                .get_config_value(config_keys::PAIRING_AFTERNOON_WINDOW)?
                .unwrap_or_default(),
        })
    }
}
