// ==========================================
// 人力排班系统 - 运行状态
// ==========================================
// 职责: 单次生成运行内的可变共享状态
// 依据: 每次调用独立持有一份, 运行结束即丢弃 (无全局可变状态)
// ==========================================

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::domain::assignment::{Assignment, ShortageRecord};
use crate::domain::types::TimeRange;

// ==========================================
// RunState - 生成运行状态
// ==========================================
#[derive(Debug, Default)]
pub struct RunState {
    /// 日期 → 当日已指派员工集合
    pub daily_assigned: HashMap<NaiveDate, HashSet<String>>,
    /// 日期 → 员工 → 当日已指派分钟数
    pub daily_minutes: HashMap<NaiveDate, HashMap<String, i32>>,
    /// 员工 → 本期累计指派次数 (含上月种子, 公平性决胜键)
    pub monthly_count: HashMap<String, i64>,
    /// (日期, 员工) → 已指派班次区间 (防重叠)
    pub window_spans: HashMap<(NaiveDate, String), Vec<TimeRange>>,
    /// 已产出的指派
    pub assignments: Vec<Assignment>,
    /// 已记录的席位缺口
    pub shortages: Vec<ShortageRecord>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 员工当日已指派分钟数
    pub fn assigned_minutes(&self, day: NaiveDate, employee_id: &str) -> i32 {
        self.daily_minutes
            .get(&day)
            .and_then(|m| m.get(employee_id))
            .copied()
            .unwrap_or(0)
    }

    /// 员工当日是否已有指派
    pub fn is_assigned_on(&self, day: NaiveDate, employee_id: &str) -> bool {
        self.daily_assigned
            .get(&day)
            .map(|s| s.contains(employee_id))
            .unwrap_or(false)
    }

    /// 新班次是否与该员工当日已有班次重叠
    pub fn overlaps_existing(&self, day: NaiveDate, employee_id: &str, range: &TimeRange) -> bool {
        self.window_spans
            .get(&(day, employee_id.to_string()))
            .map(|spans| spans.iter().any(|s| s.overlaps(range)))
            .unwrap_or(false)
    }

    /// 员工本期累计指派次数
    pub fn monthly_count_of(&self, employee_id: &str) -> i64 {
        self.monthly_count.get(employee_id).copied().unwrap_or(0)
    }

    /// 记录一次成功指派并更新全部计数
    pub fn record_assignment(
        &mut self,
        employee_id: &str,
        day: NaiveDate,
        label: &str,
        range: TimeRange,
    ) {
        self.assignments
            .push(Assignment::new(employee_id, day, label, range));
        self.daily_assigned
            .entry(day)
            .or_default()
            .insert(employee_id.to_string());
        *self
            .daily_minutes
            .entry(day)
            .or_default()
            .entry(employee_id.to_string())
            .or_insert(0) += range.duration_min();
        *self
            .monthly_count
            .entry(employee_id.to_string())
            .or_insert(0) += 1;
        self.window_spans
            .entry((day, employee_id.to_string()))
            .or_default()
            .push(range);
    }

    /// 记录一处席位缺口
    pub fn record_shortage(
        &mut self,
        day: NaiveDate,
        skill_id: &str,
        range: TimeRange,
        seats_unfilled: i32,
        reason: &str,
    ) {
        tracing::warn!(
            work_date = %day,
            skill_id = %skill_id,
            window = %range,
            seats_unfilled,
            reason = %reason,
            "席位缺口"
        );
        self.shortages.push(ShortageRecord {
            work_date: day,
            skill_id: skill_id.to_string(),
            start_min: range.start_min,
            end_min: range.end_min,
            seats_unfilled,
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_assignment_updates_counters() {
        let mut state = RunState::new();
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let range = TimeRange::new(540, 1020);

        state.record_assignment("E1", day, "CASHIER 09:00-17:00", range);

        assert!(state.is_assigned_on(day, "E1"));
        assert_eq!(state.assigned_minutes(day, "E1"), 480);
        assert_eq!(state.monthly_count_of("E1"), 1);
        assert!(state.overlaps_existing(day, "E1", &TimeRange::new(600, 660)));
        assert!(!state.overlaps_existing(day, "E1", &TimeRange::new(1020, 1080)));
        assert_eq!(state.assignments.len(), 1);
    }
}
