// ==========================================
// 人力排班系统 - 员工约束领域模型
// ==========================================
// 职责: 按员工按日期的硬约束/软偏好
// 红线: 硬约束一票否决, 软偏好只影响排序
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::types::TimeRange;

// ==========================================
// ConstraintKind - 约束类型 (和类型)
// ==========================================
// UNAVAILABLE/VACATION/SICK_LEAVE/PERSONAL: 全天硬阻断
// LIMITED: 班次必须完整落在 [start,end) 内
// PREFERRED: 班次与 [start,end) 重叠时作为排序加分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    Unavailable,
    Vacation,
    SickLeave,
    Personal,
    Limited { start_min: i32, end_min: i32 },
    Preferred { start_min: i32, end_min: i32 },
}

impl ConstraintKind {
    /// 是否为全天硬阻断类型
    pub fn is_hard_block(&self) -> bool {
        matches!(
            self,
            ConstraintKind::Unavailable
                | ConstraintKind::Vacation
                | ConstraintKind::SickLeave
                | ConstraintKind::Personal
        )
    }

    /// 该约束是否阻断指定班次区间
    pub fn blocks(&self, block: &TimeRange) -> bool {
        match self {
            ConstraintKind::Unavailable
            | ConstraintKind::Vacation
            | ConstraintKind::SickLeave
            | ConstraintKind::Personal => true,
            ConstraintKind::Limited { start_min, end_min } => {
                !TimeRange::new(*start_min, *end_min).contains(block)
            }
            ConstraintKind::Preferred { .. } => false,
        }
    }

    /// 该约束是否对指定班次区间构成偏好加分
    pub fn prefers(&self, block: &TimeRange) -> bool {
        match self {
            ConstraintKind::Preferred { start_min, end_min } => {
                TimeRange::new(*start_min, *end_min).overlaps(block)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unavailable => write!(f, "UNAVAILABLE"),
            ConstraintKind::Vacation => write!(f, "VACATION"),
            ConstraintKind::SickLeave => write!(f, "SICK_LEAVE"),
            ConstraintKind::Personal => write!(f, "PERSONAL"),
            ConstraintKind::Limited { .. } => write!(f, "LIMITED"),
            ConstraintKind::Preferred { .. } => write!(f, "PREFERRED"),
        }
    }
}

// ==========================================
// EmployeeConstraint - 员工约束记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeConstraint {
    pub constraint_id: String,     // 约束ID (UUID)
    pub employee_id: String,       // 员工ID
    pub constraint_date: NaiveDate, // 生效日期
    pub kind: ConstraintKind,      // 约束类型
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_block_covers_whole_day() {
        let block = TimeRange::new(540, 1020);
        for kind in [
            ConstraintKind::Unavailable,
            ConstraintKind::Vacation,
            ConstraintKind::SickLeave,
            ConstraintKind::Personal,
        ] {
            assert!(kind.is_hard_block());
            assert!(kind.blocks(&block));
            assert!(!kind.prefers(&block));
        }
    }

    #[test]
    fn test_limited_blocks_only_outside_window() {
        let kind = ConstraintKind::Limited {
            start_min: 540,
            end_min: 900,
        };
        assert!(!kind.blocks(&TimeRange::new(540, 900)));
        assert!(!kind.blocks(&TimeRange::new(600, 840)));
        assert!(kind.blocks(&TimeRange::new(480, 900)));
        assert!(kind.blocks(&TimeRange::new(600, 960)));
    }

    #[test]
    fn test_preferred_is_soft_only() {
        let kind = ConstraintKind::Preferred {
            start_min: 540,
            end_min: 780,
        };
        assert!(!kind.blocks(&TimeRange::new(0, 1440)));
        assert!(kind.prefers(&TimeRange::new(700, 1000)));
        assert!(!kind.prefers(&TimeRange::new(780, 1000)));
    }
}
