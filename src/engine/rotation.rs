// ==========================================
// 人力排班系统 - 月度轮转与公平性种子
// ==========================================
// 职责: 周期生成前计算轮转偏移并预载上月指派计数,
//       使公平性比较跨月连续而非清零
// ==========================================

use chrono::{Datelike, NaiveDate};

use crate::domain::assignment::Assignment;
use crate::domain::employee::Employee;
use tracing::debug;

use super::run_state::RunState;

// ==========================================
// RotationSeeder - 轮转种子
// ==========================================
pub struct RotationSeeder;

impl RotationSeeder {
    /// 由上期最后一条指派计算轮转起点下标
    ///
    /// # 参数
    /// - employees: 按 employee_id 升序的员工列表
    /// - last: 严格早于周期开始的最后一条指派
    ///
    /// # 返回
    /// 轮转起点 = (上期最后员工下标 + 1) mod N; 无历史时为 0
    pub fn rotation_offset(employees: &[Employee], last: Option<&Assignment>) -> usize {
        let n = employees.len();
        if n == 0 {
            return 0;
        }
        match last {
            Some(assignment) => employees
                .iter()
                .position(|e| e.employee_id == assignment.employee_id)
                .map(|idx| (idx + 1) % n)
                .unwrap_or(0),
            None => 0,
        }
    }

    /// 上一自然月的第一天
    pub fn previous_month_start(period_start: NaiveDate) -> NaiveDate {
        let first = period_start
            .with_day(1)
            .unwrap_or(period_start);
        let last_of_prev = first.pred_opt().unwrap_or(first);
        last_of_prev.with_day(1).unwrap_or(last_of_prev)
    }

    /// 用上期指派预载公平性计数
    pub fn seed_monthly_counts(state: &mut RunState, prior_assignments: &[Assignment]) {
        for assignment in prior_assignments {
            *state
                .monthly_count
                .entry(assignment.employee_id.clone())
                .or_insert(0) += 1;
        }
        debug!(
            prior_count = prior_assignments.len(),
            seeded_employees = state.monthly_count.len(),
            "公平性计数种子已加载"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::DailyRule;
    use crate::domain::types::TimeRange;
    use std::collections::BTreeSet;

    fn employee(id: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            display_name: id.to_string(),
            skill_ids: BTreeSet::new(),
            eligible_full: true,
            eligible_short_morning: false,
            eligible_short_afternoon: false,
            daily_rule: DailyRule::default(),
        }
    }

    #[test]
    fn test_rotation_offset_wraps_after_last() {
        let employees = vec![employee("E1"), employee("E2"), employee("E3")];
        let day = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let last = Assignment::new("E3", day, "A", TimeRange::new(540, 1020));
        assert_eq!(
            RotationSeeder::rotation_offset(&employees, Some(&last)),
            0 // E3 是末位, 轮转回 E1
        );
        let last = Assignment::new("E1", day, "A", TimeRange::new(540, 1020));
        assert_eq!(RotationSeeder::rotation_offset(&employees, Some(&last)), 1);
        assert_eq!(RotationSeeder::rotation_offset(&employees, None), 0);
    }

    #[test]
    fn test_rotation_offset_unknown_employee_defaults_to_zero() {
        let employees = vec![employee("E1"), employee("E2")];
        let day = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let last = Assignment::new("GONE", day, "A", TimeRange::new(540, 1020));
        assert_eq!(RotationSeeder::rotation_offset(&employees, Some(&last)), 0);
    }

    #[test]
    fn test_previous_month_start() {
        let march = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(
            RotationSeeder::previous_month_start(march),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
        );
        let january = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            RotationSeeder::previous_month_start(january),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_seed_monthly_counts() {
        let mut state = RunState::new();
        let day = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let prior = vec![
            Assignment::new("E1", day, "A", TimeRange::new(540, 1020)),
            Assignment::new("E1", day, "A", TimeRange::new(540, 1020)),
            Assignment::new("E2", day, "A", TimeRange::new(540, 1020)),
        ];
        RotationSeeder::seed_monthly_counts(&mut state, &prior);
        assert_eq!(state.monthly_count_of("E1"), 2);
        assert_eq!(state.monthly_count_of("E2"), 1);
        assert_eq!(state.monthly_count_of("E3"), 0);
    }
}
