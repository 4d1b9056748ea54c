// ==========================================
// 人力排班系统 - 配置层
// ==========================================
// 职责: 排班参数管理, 运行前解析为不可变快照
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_params;
pub mod roster_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use engine_params::{EngineParams, PairingWindows};
pub use roster_config_trait::{PairingSetting, RosterConfigReader};
