// ==========================================
// 人力排班系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 需求驱动排班引擎 (确定性生成, 人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排班规则
pub mod engine;

// 配置层 - 排班参数
pub mod config;

// 服务层 - 任务编排
pub mod service;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FillPass, GatePolicy, TimeRange, MINUTES_PER_DAY};

// 领域实体
pub use domain::{
    Assignment, AvailabilityWindow, ConstraintKind, DailyRule, DemandDeclaration, Employee,
    EmployeeConstraint, SeatWindow, ShortageRecord, SkillPattern, SubBlock,
};

// 配置
pub use config::{ConfigManager, EngineParams, PairingWindows, RosterConfigReader};

// 引擎
pub use engine::{
    DemandAggregator, EngineError, GenerationResult, PairingEngine, RosterOrchestrator,
    RosterRepositories, WindowScheduler, WindowSynthesizer,
};

// 服务
pub use service::{month_period, GenerateService};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "人力排班系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
