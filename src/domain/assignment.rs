// ==========================================
// 人力排班系统 - 排班结果领域模型
// ==========================================
// 职责: 班次指派与缺口记录
// 红线: Assignment 落库后不可变; 周期重算 = 整段删除重建
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::TimeRange;

// ==========================================
// Assignment - 班次指派
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: String,     // 指派ID (UUID)
    pub employee_id: String,       // 员工ID
    pub work_date: NaiveDate,      // 工作日期
    pub label: String,             // 班次标签 (技能 + 窗口)
    pub start_min: i32,            // 班次开始 (当日分钟)
    pub end_min: i32,              // 班次结束 (当日分钟)
    pub created_at: NaiveDateTime, // 创建时间
}

impl Assignment {
    pub fn new(
        employee_id: &str,
        work_date: NaiveDate,
        label: &str,
        range: TimeRange,
    ) -> Self {
        Self {
            assignment_id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            work_date,
            label: label.to_string(),
            start_min: range.start_min,
            end_min: range.end_min,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_min, self.end_min)
    }

    /// 班次时长 (分钟)
    pub fn duration_min(&self) -> i32 {
        self.time_range().duration_min()
    }
}

// ==========================================
// ShortageRecord - 席位缺口记录
// ==========================================
// 非致命: 缺口随结果返回并记日志, 不中断生成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortageRecord {
    pub work_date: NaiveDate,  // 缺口日期
    pub skill_id: String,      // 技能ID
    pub start_min: i32,        // 未覆盖区间开始
    pub end_min: i32,          // 未覆盖区间结束
    pub seats_unfilled: i32,   // 未填席位数
    pub reason: String,        // 缺口原因
}

impl ShortageRecord {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_min, self.end_min)
    }
}
