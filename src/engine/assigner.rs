// ==========================================
// 人力排班系统 - 指派引擎
// ==========================================
// 职责: 为单个子块挑选一名适格员工并登记指派
// 红线: 候选排序必须全序确定 (同快照两次运行结果逐位一致);
//       候选池耗尽 = 缺口, 非致命
// ==========================================

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

use crate::config::engine_params::EngineParams;
use crate::domain::employee::{longest_availability_block_min, Employee};
use crate::domain::window::SubBlock;
use tracing::trace;

use super::run_state::RunState;
use super::snapshot::RosterSnapshot;

/// 单次候选搜索的附加要求
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignOptions {
    /// 仅限全天班适格员工 (配对遍使用)
    pub require_full_day: bool,
}

// ==========================================
// AssignmentEngine - 指派引擎
// ==========================================
pub struct AssignmentEngine<'a> {
    snapshot: &'a RosterSnapshot,
    params: &'a EngineParams,
}

impl<'a> AssignmentEngine<'a> {
    pub fn new(snapshot: &'a RosterSnapshot, params: &'a EngineParams) -> Self {
        Self { snapshot, params }
    }

    /// 员工在指定日期对某块长是否短班适格
    ///
    /// 规则: 配对时间窗已配置且子块落在上午/下午窗内时,
    /// 采用对应的适格标志; 否则采用启发式判定
    /// (单日上限不超过块长, 或该 weekday 最长可用块不超过块长)
    pub fn short_eligible_on(
        &self,
        employee: &Employee,
        day: NaiveDate,
        block: &SubBlock,
    ) -> bool {
        if let Some(pairing) = &self.params.pairing {
            if pairing.morning.contains(&block.range) {
                return employee.eligible_short_morning;
            }
            if pairing.afternoon.contains(&block.range) {
                return employee.eligible_short_afternoon;
            }
        }
        if employee.daily_rule.daily_max_hours <= block.length_hours {
            return true;
        }
        if let Some(windows) = self
            .snapshot
            .availability_for(&employee.employee_id, day.weekday())
        {
            return longest_availability_block_min(windows) <= block.length_hours * 60;
        }
        false
    }

    /// 员工对指定子块是否可行 (全部硬性过滤)
    ///
    /// 过滤顺序与语义:
    /// 1) 当日已有指派且规则禁止单日多班
    /// 2) 缺少所需技能
    /// 3) 该 weekday 存在可用时段记录且无一完整包含子块
    /// 4) 指派后超出单日最大工时
    /// 5) 当日存在硬约束 / LIMITED 窗口不包含子块
    /// 6) 节假日且规则禁止节假日排班
    /// 7) (配对) 仅限全天班适格
    /// 8) 与当日已有班次重叠
    pub fn is_feasible(
        &self,
        state: &RunState,
        day: NaiveDate,
        employee: &Employee,
        block: &SubBlock,
        options: AssignOptions,
    ) -> bool {
        let range = &block.range;

        if state.is_assigned_on(day, &employee.employee_id)
            && !employee.daily_rule.allow_multiple_shifts_per_day
        {
            return false;
        }
        if !employee.has_skill(&block.skill_id) {
            return false;
        }
        if let Some(windows) = self
            .snapshot
            .availability_for(&employee.employee_id, day.weekday())
        {
            if !windows.iter().any(|w| w.contains(range)) {
                return false;
            }
        }
        let assigned = state.assigned_minutes(day, &employee.employee_id);
        if assigned + range.duration_min() > employee.daily_rule.daily_max_hours * 60 {
            return false;
        }
        if self
            .snapshot
            .constraints_for(&employee.employee_id, day)
            .iter()
            .any(|kind| kind.blocks(range))
        {
            return false;
        }
        if self.snapshot.is_holiday(day) && !employee.daily_rule.allow_holiday_work {
            return false;
        }
        if options.require_full_day && !employee.eligible_full {
            return false;
        }
        if state.overlaps_existing(day, &employee.employee_id, range) {
            return false;
        }
        true
    }

    /// 为子块挑选员工并登记指派
    ///
    /// 候选排序 (全序):
    /// 1) 短班适格优先 (仅块长 < 首选长度时参与排序)
    /// 2) 窗口 PREFERRED 集合成员优先
    /// 3) 本期累计指派次数升序 (公平性)
    /// 4) 轮转名次升序 (id 序 + 月度轮转偏移)
    ///
    /// # 返回
    /// - Some(employee_id): 指派成功, 状态已更新, 员工已移出 preferred
    /// - None: 候选池耗尽 (调用方记缺口)
    pub fn try_assign(
        &self,
        state: &mut RunState,
        day: NaiveDate,
        block: &SubBlock,
        preferred: &mut HashSet<String>,
        options: AssignOptions,
    ) -> Option<String> {
        let pool = self.snapshot.pool_by_skill.get(&block.skill_id)?;
        let short_block = block.length_hours < self.params.primary_block_hours;

        let mut candidates: Vec<usize> = pool.clone();
        candidates.sort_by_key(|&idx| {
            let employee = &self.snapshot.employees[idx];
            let short_key = if short_block {
                // true 在前
                !self.short_eligible_on(employee, day, block)
            } else {
                false
            };
            let preferred_key = !preferred.contains(&employee.employee_id);
            (
                short_key,
                preferred_key,
                state.monthly_count_of(&employee.employee_id),
                self.snapshot.rank_of(&employee.employee_id),
            )
        });

        for idx in candidates {
            let employee = &self.snapshot.employees[idx];
            if !self.is_feasible(state, day, employee, block, options) {
                trace!(
                    employee_id = %employee.employee_id,
                    block = %block.range,
                    skill_id = %block.skill_id,
                    "候选不可行, 跳过"
                );
                continue;
            }
            let employee_id = employee.employee_id.clone();
            state.record_assignment(&employee_id, day, &block.label(), block.range);
            // 同窗第二席不再重复偏好同一人
            preferred.remove(&employee_id);
            return Some(employee_id);
        }
        None
    }
}
