// ==========================================
// 人力排班系统 - 窗口调度与子块切分
// ==========================================
// 职责: 按三遍启发式排序窗口, 将窗口席位切分为候选长度的
//       子块并逐块交给指派引擎
// 算法: 每席位维护"未覆盖区间表", 左缘/右缘/支点三种填充
//       策略共享消耗该表 (区间减法)
// 红线: 短于首选长度的子块必须通过启用判定 (白名单/适格员工)
// ==========================================

use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use crate::config::engine_params::EngineParams;
use crate::domain::types::{FillPass, GatePolicy, TimeRange};
use crate::domain::window::{SeatWindow, SubBlock};
use tracing::debug;

use super::assigner::{AssignOptions, AssignmentEngine};
use super::run_state::RunState;
use super::snapshot::RosterSnapshot;

/// 从区间表中减去一个区间 (可能切分表项)
pub fn subtract_interval(intervals: &mut Vec<TimeRange>, cut: &TimeRange) {
    let mut out = Vec::with_capacity(intervals.len() + 1);
    for r in intervals.iter() {
        if !r.overlaps(cut) {
            out.push(*r);
            continue;
        }
        if r.start_min < cut.start_min {
            out.push(TimeRange::new(r.start_min, cut.start_min));
        }
        if cut.end_min < r.end_min {
            out.push(TimeRange::new(cut.end_min, r.end_min));
        }
    }
    *intervals = out;
}

/// 单个席位的切分任务: 覆盖完窗口区间即完成
struct SeatTask {
    window_idx: usize,
    skill_id: String,
    remaining: Vec<TimeRange>,
    /// 左缘填充推进到的位置 (支点填充的首选支点)
    left_fill_end: Option<i32>,
}

// ==========================================
// WindowScheduler - 窗口调度器
// ==========================================
pub struct WindowScheduler<'a> {
    snapshot: &'a RosterSnapshot,
    params: &'a EngineParams,
}

impl<'a> WindowScheduler<'a> {
    pub fn new(snapshot: &'a RosterSnapshot, params: &'a EngineParams) -> Self {
        Self { snapshot, params }
    }

    /// 处理一天的全部席位窗口
    ///
    /// 三遍拼接执行; 三遍结束后仍未覆盖的区间记为缺口
    pub fn run_day(&self, state: &mut RunState, day: NaiveDate, windows: &[SeatWindow]) {
        let engine = AssignmentEngine::new(self.snapshot, self.params);

        // 每席位一个任务, 构建顺序确定 (窗口序 × 技能序 × 席位序)
        let mut tasks: Vec<SeatTask> = Vec::new();
        for (window_idx, window) in windows.iter().enumerate() {
            let mut skills: Vec<(&String, &i32)> = window.per_skill_seats.iter().collect();
            skills.sort_by_key(|(skill_id, _)| self.params.skill_order_key(skill_id));
            for (skill_id, &seats) in skills {
                for _ in 0..seats.max(0) {
                    tasks.push(SeatTask {
                        window_idx,
                        skill_id: skill_id.clone(),
                        remaining: vec![windows[window_idx].range],
                        left_fill_end: None,
                    });
                }
            }
        }

        // 窗口级 PREFERRED 集合 (指派成功后移除成员)
        let mut preferred: Vec<HashSet<String>> = windows
            .iter()
            .map(|w| self.snapshot.preferred_set(day, &w.range))
            .collect();

        for pass in [FillPass::First, FillPass::Last, FillPass::Other] {
            for &window_idx in &self.order_windows(windows, pass) {
                // 任务构建顺序已隐含技能优先级, 按原序过滤即可
                for task_idx in 0..tasks.len() {
                    if tasks[task_idx].window_idx != window_idx {
                        continue;
                    }
                    let task = &mut tasks[task_idx];
                    match pass {
                        FillPass::First => {
                            self.fill_from_left(&engine, state, day, task, &mut preferred[window_idx]);
                        }
                        FillPass::Last => {
                            self.fill_from_right(&engine, state, day, task, &mut preferred[window_idx]);
                        }
                        FillPass::Other => {
                            self.fill_from_pivot(
                                &engine,
                                state,
                                day,
                                task,
                                windows[window_idx].range,
                                &mut preferred[window_idx],
                            );
                        }
                    }
                }
            }
        }

        // 缺口汇总: 相同 (技能, 区间) 合并席位数
        let mut gaps: BTreeMap<(String, TimeRange), i32> = BTreeMap::new();
        for task in &tasks {
            for interval in &task.remaining {
                *gaps
                    .entry((task.skill_id.clone(), *interval))
                    .or_insert(0) += 1;
            }
        }
        for ((skill_id, range), seats) in gaps {
            state.record_shortage(day, &skill_id, range, seats, "候选池耗尽, 席位未填");
        }
    }

    /// 三遍窗口排序
    ///
    /// - First: (start, end) 升序
    /// - Last: (end, start) 降序
    /// - Other: 窗口中点距 12:00 的距离升序, 同距按中点升序
    fn order_windows(&self, windows: &[SeatWindow], pass: FillPass) -> Vec<usize> {
        let mut order: Vec<usize> = (0..windows.len()).collect();
        match pass {
            FillPass::First => {
                order.sort_by_key(|&i| (windows[i].range.start_min, windows[i].range.end_min));
            }
            FillPass::Last => {
                order.sort_by_key(|&i| {
                    (
                        Reverse(windows[i].range.end_min),
                        Reverse(windows[i].range.start_min),
                    )
                });
            }
            FillPass::Other => {
                order.sort_by_key(|&i| {
                    let mid = windows[i].range.midpoint();
                    ((mid - 720).abs(), mid, windows[i].range.start_min)
                });
            }
        }
        order
    }

    /// 短班长度启用判定
    ///
    /// a: 技能模式白名单放行该长度
    /// b: 存在对该子块既短班适格又当前可行的池内员工
    fn gate_allows(
        &self,
        engine: &AssignmentEngine<'_>,
        state: &RunState,
        day: NaiveDate,
        skill_id: &str,
        length_hours: i32,
        block_range: &TimeRange,
    ) -> bool {
        let whitelist_hit = || {
            self.snapshot
                .skill_patterns
                .iter()
                .any(|p| p.permits(skill_id, day.weekday(), block_range, length_hours))
        };
        let eligible_employee_available = || {
            let block = SubBlock::new(*block_range, skill_id, length_hours);
            self.snapshot
                .pool_by_skill
                .get(skill_id)
                .map(|pool| {
                    pool.iter().any(|&idx| {
                        let employee = &self.snapshot.employees[idx];
                        engine.short_eligible_on(employee, day, &block)
                            && engine.is_feasible(
                                state,
                                day,
                                employee,
                                &block,
                                AssignOptions::default(),
                            )
                    })
                })
                .unwrap_or(false)
        };
        match self.params.gate_policy {
            GatePolicy::AOrB => whitelist_hit() || eligible_employee_available(),
            GatePolicy::AOnly => whitelist_hit(),
            GatePolicy::BOnly => eligible_employee_available(),
        }
    }

    /// 在指定起点尝试各候选长度并指派
    ///
    /// # 返回
    /// 成功放置的子块区间
    #[allow(clippy::too_many_arguments)]
    fn try_place_at(
        &self,
        engine: &AssignmentEngine<'_>,
        state: &mut RunState,
        day: NaiveDate,
        task: &SeatTask,
        interval: &TimeRange,
        anchor_left: bool,
        preferred: &mut HashSet<String>,
    ) -> Option<TimeRange> {
        for length_hours in self.params.candidate_lengths() {
            let length_min = length_hours * 60;
            if length_min > interval.duration_min() {
                continue;
            }
            let block_range = if anchor_left {
                TimeRange::new(interval.start_min, interval.start_min + length_min)
            } else {
                TimeRange::new(interval.end_min - length_min, interval.end_min)
            };
            if length_hours < self.params.primary_block_hours
                && !self.gate_allows(engine, state, day, &task.skill_id, length_hours, &block_range)
            {
                debug!(
                    skill_id = %task.skill_id,
                    length_hours,
                    block = %block_range,
                    "短班长度未通过启用判定"
                );
                continue;
            }
            let block = SubBlock::new(block_range, &task.skill_id, length_hours);
            if engine
                .try_assign(state, day, &block, preferred, AssignOptions::default())
                .is_some()
            {
                return Some(block_range);
            }
        }
        None
    }

    /// First 遍: 自左缘推进
    fn fill_from_left(
        &self,
        engine: &AssignmentEngine<'_>,
        state: &mut RunState,
        day: NaiveDate,
        task: &mut SeatTask,
        preferred: &mut HashSet<String>,
    ) {
        loop {
            let Some(interval) = task.remaining.iter().min_by_key(|r| r.start_min).copied()
            else {
                break;
            };
            match self.try_place_at(engine, state, day, task, &interval, true, preferred) {
                Some(placed) => {
                    subtract_interval(&mut task.remaining, &placed);
                    task.left_fill_end = Some(
                        task.left_fill_end
                            .map_or(placed.end_min, |e| e.max(placed.end_min)),
                    );
                }
                None => break,
            }
        }
    }

    /// Last 遍: 自右缘回退
    fn fill_from_right(
        &self,
        engine: &AssignmentEngine<'_>,
        state: &mut RunState,
        day: NaiveDate,
        task: &mut SeatTask,
        preferred: &mut HashSet<String>,
    ) {
        loop {
            let Some(interval) = task.remaining.iter().max_by_key(|r| r.end_min).copied() else {
                break;
            };
            match self.try_place_at(engine, state, day, task, &interval, false, preferred) {
                Some(placed) => subtract_interval(&mut task.remaining, &placed),
                None => break,
            }
        }
    }

    /// Other 遍: 自支点向两侧扩展
    ///
    /// 支点: 左缘填充推进位, 否则 start + 首选长度 (窗口内), 否则窗口中点
    fn fill_from_pivot(
        &self,
        engine: &AssignmentEngine<'_>,
        state: &mut RunState,
        day: NaiveDate,
        task: &mut SeatTask,
        window: TimeRange,
        preferred: &mut HashSet<String>,
    ) {
        let primary_end = window.start_min + self.params.primary_block_hours * 60;
        let pivot = task.left_fill_end.unwrap_or(if primary_end < window.end_min {
            primary_end
        } else {
            window.midpoint()
        });

        let mut right = pivot;
        let mut left = pivot;
        loop {
            let mut progressed = false;

            // 向右: 取 right 右侧仍有未覆盖部分的表项,
            // 跨越支点的表项裁剪后从支点起放块
            if let Some(interval) = task
                .remaining
                .iter()
                .filter(|r| r.end_min > right)
                .min_by_key(|r| r.start_min)
                .copied()
            {
                let clipped = TimeRange::new(interval.start_min.max(right), interval.end_min);
                if let Some(placed) =
                    self.try_place_at(engine, state, day, task, &clipped, true, preferred)
                {
                    subtract_interval(&mut task.remaining, &placed);
                    right = placed.end_min;
                    progressed = true;
                }
            }

            // 向左: 镜像处理, 跨越支点的表项裁剪后块尾贴住支点
            if let Some(interval) = task
                .remaining
                .iter()
                .filter(|r| r.start_min < left)
                .max_by_key(|r| r.end_min)
                .copied()
            {
                let clipped = TimeRange::new(interval.start_min, interval.end_min.min(left));
                if let Some(placed) =
                    self.try_place_at(engine, state, day, task, &clipped, false, preferred)
                {
                    subtract_interval(&mut task.remaining, &placed);
                    left = placed.start_min;
                    progressed = true;
                }
            }

            if !progressed {
                break;
            }
        }
    }
}
