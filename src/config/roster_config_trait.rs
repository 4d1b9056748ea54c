// ==========================================
// 人力排班系统 - 排班配置读取 Trait
// ==========================================
// 职责: 定义排班引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::error::Error;

use crate::domain::types::GatePolicy;

/// 配对班次配置（原始字符串形态, 由引擎在运行开始时解析）
///
/// 三个时间窗均为 "HH:MM-HH:MM"; 任一窗口解析失败时,
/// 配对遍整体退化为非配对路径
#[derive(Debug, Clone, Default)]
pub struct PairingSetting {
    pub enabled: bool,
    pub full_window: String,
    pub morning_window: String,
    pub afternoon_window: String,
}

// ==========================================
// RosterConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait RosterConfigReader: Send + Sync {
    /// 获取时间槽粒度（分钟）
    ///
    /// # 默认值
    /// - 30
    async fn get_granularity_minutes(&self) -> Result<i32, Box<dyn Error + Send + Sync>>;

    /// 获取单个窗口最大时长（分钟）
    ///
    /// # 默认值
    /// - 540 (9 小时)
    async fn get_max_window_minutes(&self) -> Result<i32, Box<dyn Error + Send + Sync>>;

    /// 获取首选班次长度（小时）
    ///
    /// # 默认值
    /// - 8
    async fn get_primary_block_hours(&self) -> Result<i32, Box<dyn Error + Send + Sync>>;

    /// 获取候选短班长度列表（小时, 按尝试顺序）
    ///
    /// # 默认值
    /// - [6, 4]
    async fn get_short_block_hours(&self) -> Result<Vec<i32>, Box<dyn Error + Send + Sync>>;

    /// 获取短班启用判定策略
    ///
    /// # 默认值
    /// - A_OR_B
    async fn get_gate_policy(&self) -> Result<GatePolicy, Box<dyn Error + Send + Sync>>;

    /// 获取技能优先级映射（1 = 最高; 未配置的技能最后处理）
    ///
    /// # 默认值
    /// - 空映射
    async fn get_skill_priorities(&self) -> Result<HashMap<String, i32>, Box<dyn Error + Send + Sync>>;

    /// 获取配对班次配置
    ///
    /// # 默认值
    /// - enabled = false
    async fn get_pairing_setting(&self) -> Result<PairingSetting, Box<dyn Error + Send + Sync>>;
}
