// ==========================================
// 人力排班系统 - 引擎编排器
// ==========================================
// 用途: 协调需求聚合 → 窗口合成 → 配对遍 → 调度指派的
//       完整生成流程
// 红线: 前置校验在任何删除/写入之前完成 (失败不留半成品);
//       缺口随结果返回, 不抛出
// ==========================================

use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::engine_params::EngineParams;
use crate::config::roster_config_trait::RosterConfigReader;
use crate::domain::assignment::{Assignment, ShortageRecord};

use super::demand_aggregator::DemandAggregator;
use super::error::{EngineError, EngineResult};
use super::pairing::PairingEngine;
use super::repositories::RosterRepositories;
use super::rotation::RotationSeeder;
use super::run_state::RunState;
use super::block_splitter::WindowScheduler;
use super::snapshot::RosterSnapshot;
use super::window_synthesizer::WindowSynthesizer;

// ==========================================
// GenerationResult - 生成结果
// ==========================================
#[derive(Debug)]
pub struct GenerationResult {
    /// 已落库的指派 (与持久化内容一致)
    pub assignments: Vec<Assignment>,
    /// 累计的席位缺口
    pub shortages: Vec<ShortageRecord>,
    /// 处理的天数
    pub days_processed: u32,
    /// 有需求但一条指派都未产出的日期 (显著缺口信号)
    pub days_with_unmet_demand: Vec<NaiveDate>,
}

// ==========================================
// RosterOrchestrator - 引擎编排器
// ==========================================
pub struct RosterOrchestrator<C>
where
    C: RosterConfigReader,
{
    config: Arc<C>,
    repos: RosterRepositories,
}

impl<C> RosterOrchestrator<C>
where
    C: RosterConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - repos: 仓储集合
    pub fn new(config: Arc<C>, repos: RosterRepositories) -> Self {
        Self { config, repos }
    }

    /// 生成一个周期的排班 (闭区间 [period_start, period_end])
    ///
    /// 流程:
    /// 1) 前置校验与参数/快照装载 (此前零写入)
    /// 2) 轮转偏移 + 上月公平性计数种子
    /// 3) 逐日: 聚合 → 配对遍 → 合成 → 调度指派
    /// 4) 整段替换落库 (单事务)
    ///
    /// # 返回
    /// 生成结果; 前置条件失败时返回 EngineError, 持久层保持原状
    #[instrument(skip(self), fields(period_start = %period_start, period_end = %period_end))]
    pub async fn generate_period(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> EngineResult<GenerationResult> {
        if period_start > period_end {
            return Err(EngineError::InvalidPeriod {
                start: period_start,
                end: period_end,
            });
        }

        info!("开始生成排班");

        // ==========================================
        // 步骤1: 参数快照与数据快照 (一次性批量读取)
        // ==========================================
        let params = EngineParams::resolve(&*self.config)
            .await
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let employees = self.repos.employee_repo.list_all()?;
        if employees.is_empty() {
            return Err(EngineError::NoEmployees);
        }

        let availability = self.repos.employee_repo.list_availability()?;
        let constraints = self
            .repos
            .constraint_repo
            .list_between(period_start, period_end)?;
        let holidays = self
            .repos
            .constraint_repo
            .list_holidays_between(period_start, period_end)?;
        let patterns = self.repos.skill_pattern_repo.list_active()?;

        // ==========================================
        // 步骤2: 轮转偏移与公平性计数种子
        // ==========================================
        let last_before = self.repos.assignment_repo.find_last_before(period_start)?;
        let rotation_offset =
            RotationSeeder::rotation_offset(&employees, last_before.as_ref());
        debug!(rotation_offset, "轮转偏移已计算");

        let snapshot = RosterSnapshot::build(
            employees,
            availability,
            constraints,
            holidays,
            patterns,
            rotation_offset,
        );

        let mut state = RunState::new();
        let prev_month_start = RotationSeeder::previous_month_start(period_start);
        if let Some(seed_end) = period_start.pred_opt() {
            let prior = self
                .repos
                .assignment_repo
                .list_between(prev_month_start, seed_end)?;
            RotationSeeder::seed_monthly_counts(&mut state, &prior);
        }

        // ==========================================
        // 步骤3: 逐日生成
        // ==========================================
        let pairing = PairingEngine::new(&snapshot, &params);
        let scheduler = WindowScheduler::new(&snapshot, &params);
        let mut days_processed = 0u32;
        let mut days_with_unmet_demand = Vec::new();

        let mut day = period_start;
        loop {
            let weekday = day.weekday();
            let declarations = self.repos.demand_repo.list_active_for_day(day, weekday)?;
            let mut curves = DemandAggregator::aggregate(day, weekday, &declarations, &params);

            let day_has_demand = curves.values().any(|c| c.iter().any(|&v| v > 0));
            let assigned_before = state.assignments.len();

            if day_has_demand {
                pairing.run_day(&mut state, day, &mut curves);
                let windows = WindowSynthesizer::synthesize_day(&curves, &params);
                debug!(work_date = %day, window_count = windows.len(), "窗口合成完成");
                scheduler.run_day(&mut state, day, &windows);
            }

            if day_has_demand && state.assignments.len() == assigned_before {
                // 有需求却零产出, 作为显著缺口信号上报
                tracing::warn!(work_date = %day, "当日有需求但未产出任何指派");
                days_with_unmet_demand.push(day);
            }

            days_processed += 1;
            match day.succ_opt() {
                Some(next) if next <= period_end => day = next,
                _ => break,
            }
        }

        // ==========================================
        // 步骤4: 整段替换落库
        // ==========================================
        self.repos
            .assignment_repo
            .replace_range(period_start, period_end, &state.assignments)?;

        info!(
            assignments = state.assignments.len(),
            shortages = state.shortages.len(),
            days_processed,
            "排班生成完成"
        );

        Ok(GenerationResult {
            assignments: state.assignments,
            shortages: state.shortages,
            days_processed,
            days_with_unmet_demand,
        })
    }
}
