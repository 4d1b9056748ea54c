// ==========================================
// 人力排班系统 - 上下午配对遍
// ==========================================
// 职责: 在通用路径消耗席位之前, 将成对的上午+下午需求
//       预指派给同一名全天班适格员工
// 红线: 仅消耗 min(上午席位, 下午席位) 对; 残余席位原样
//       留给通用路径 (上午/下午子窗各自走短班适格判定)
// ==========================================

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::config::engine_params::EngineParams;
use crate::domain::types::TimeRange;
use crate::domain::window::SubBlock;
use tracing::{debug, info};

use super::assigner::{AssignOptions, AssignmentEngine};
use super::demand_aggregator::SkillCurves;
use super::run_state::RunState;
use super::snapshot::RosterSnapshot;

// ==========================================
// PairingEngine - 配对引擎
// ==========================================
pub struct PairingEngine<'a> {
    snapshot: &'a RosterSnapshot,
    params: &'a EngineParams,
}

impl<'a> PairingEngine<'a> {
    pub fn new(snapshot: &'a RosterSnapshot, params: &'a EngineParams) -> Self {
        Self { snapshot, params }
    }

    /// 执行一天的配对遍, 就地扣减已配对的需求曲线
    ///
    /// 未启用配对 (或配置非法已回落) 时不做任何事
    pub fn run_day(&self, state: &mut RunState, day: NaiveDate, curves: &mut SkillCurves) {
        let Some(windows) = self.params.pairing else {
            return;
        };

        let engine = AssignmentEngine::new(self.snapshot, self.params);
        let combined = TimeRange::new(windows.morning.start_min, windows.afternoon.end_min);

        // 技能按配置优先级处理 (与通用路径一致)
        let mut skills: Vec<String> = curves.keys().cloned().collect();
        skills.sort_by_key(|s| self.params.skill_order_key(s));

        for skill_id in skills {
            let (morning_seats, afternoon_seats) = {
                let curve = &curves[&skill_id];
                (
                    self.window_seats(curve, &windows.morning),
                    self.window_seats(curve, &windows.afternoon),
                )
            };
            let pairs = morning_seats.min(afternoon_seats);
            if pairs <= 0 {
                continue;
            }
            debug!(
                skill_id = %skill_id,
                morning_seats,
                afternoon_seats,
                pairs,
                "配对遍: 发现可配对席位"
            );

            let mut preferred = self.snapshot.preferred_set(day, &combined);
            let mut paired = 0;
            for _ in 0..pairs {
                let block = SubBlock::new(
                    combined,
                    &skill_id,
                    combined.duration_min() / 60,
                );
                let assigned = engine.try_assign(
                    state,
                    day,
                    &block,
                    &mut preferred,
                    AssignOptions {
                        require_full_day: true,
                    },
                );
                match assigned {
                    Some(_) => {
                        if let Some(curve) = curves.get_mut(&skill_id) {
                            Self::decrement_window(curve, &windows.morning, self.params);
                            Self::decrement_window(curve, &windows.afternoon, self.params);
                        }
                        paired += 1;
                    }
                    // 全天班候选耗尽, 残余席位交给通用路径
                    None => break,
                }
            }
            if paired > 0 {
                info!(skill_id = %skill_id, paired, work_date = %day, "配对遍完成");
            }
        }
    }

    /// 窗口内可整窗配对的席位数 = 窗口各槽需求的最小值
    fn window_seats(&self, curve: &[i32], window: &TimeRange) -> i32 {
        let (lo, hi) = self.slot_span(curve.len(), window);
        if lo >= hi {
            return 0;
        }
        curve[lo..hi].iter().copied().min().unwrap_or(0)
    }

    fn slot_span(&self, slots: usize, window: &TimeRange) -> (usize, usize) {
        let g = self.params.granularity_minutes;
        let lo = (window.start_min / g).max(0) as usize;
        let hi = (((window.end_min + g - 1) / g) as usize).min(slots);
        (lo.min(slots), hi)
    }

    fn decrement_window(curve: &mut [i32], window: &TimeRange, params: &EngineParams) {
        let g = params.granularity_minutes;
        let lo = (window.start_min / g).max(0) as usize;
        let hi = (((window.end_min + g - 1) / g) as usize).min(curve.len());
        for slot in curve.iter_mut().take(hi).skip(lo) {
            *slot -= 1;
        }
    }
}
