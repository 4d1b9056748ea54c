// ==========================================
// 人力排班系统 - 引擎层错误类型
// ==========================================
// 分级: 前置条件失败 = 致命 (运行中止, 不落库);
//       席位缺口 = 非致命 (随结果返回, 不抛出)
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

use crate::repository::error::RepositoryError;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 前置条件失败 (致命) =====
    #[error("没有可排班的员工, 生成中止")]
    NoEmployees,

    #[error("无效的排班周期: start={start} end={end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    // ===== 配置错误 =====
    #[error("配置读取失败: {0}")]
    Config(String),

    // ===== 下层透传 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 引擎层 Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
