// ==========================================
// 人力排班系统 - 员工领域模型
// ==========================================
// 职责: 员工主数据、用工规则、周可用时段
// 红线: 引擎只读快照, 不回写员工数据
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::types::TimeRange;

// ==========================================
// DailyRule - 用工规则
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRule {
    pub daily_max_hours: i32,             // 单日最大工时 (小时)
    pub weekly_max_hours: i32,            // 单周最大工时 (小时, 主数据字段)
    pub allow_multiple_shifts_per_day: bool, // 是否允许单日多班
    pub allow_holiday_work: bool,         // 是否允许节假日排班
}

impl Default for DailyRule {
    fn default() -> Self {
        Self {
            daily_max_hours: 8,
            weekly_max_hours: 40,
            allow_multiple_shifts_per_day: false,
            allow_holiday_work: true,
        }
    }
}

// ==========================================
// Employee - 员工主数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,              // 员工ID
    pub display_name: String,             // 姓名
    pub skill_ids: BTreeSet<String>,      // 技能集合
    pub eligible_full: bool,              // 全天班适格
    pub eligible_short_morning: bool,     // 上午短班适格
    pub eligible_short_afternoon: bool,   // 下午短班适格
    pub daily_rule: DailyRule,            // 用工规则
}

impl Employee {
    pub fn has_skill(&self, skill_id: &str) -> bool {
        self.skill_ids.contains(skill_id)
    }
}

// ==========================================
// AvailabilityWindow - 周可用时段
// ==========================================
// 语义: 某员工在某 weekday 存在可用时段记录时, 班次必须
// 完整落在其中一条内; 该 weekday 无记录 = 无限制
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub employee_id: String,
    pub day_of_week: Weekday,
    pub start_min: i32,
    pub end_min: i32,
}

impl AvailabilityWindow {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_min, self.end_min)
    }
}

/// 某 weekday 的可用时段集合中, 最长连续块的时长（分钟）
///
/// 用于短班适格判定: 最长可用块不超过候选长度时, 该员工
/// 天然只能上短班
pub fn longest_availability_block_min(windows: &[TimeRange]) -> i32 {
    windows.iter().map(|w| w.duration_min()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_availability_block() {
        let windows = vec![
            TimeRange::new(540, 780),  // 4h
            TimeRange::new(840, 1200), // 6h
        ];
        assert_eq!(longest_availability_block_min(&windows), 360);
        assert_eq!(longest_availability_block_min(&[]), 0);
    }
}
