// ==========================================
// 人力排班系统 - 排班生成服务
// ==========================================
// 职责: 管理排班生成任务的提交与并发防护
// 红线: 同一周期同一时刻只允许一个生成任务在执行,
//       重复提交直接拒绝而非排队
// ==========================================

use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::config::roster_config_trait::RosterConfigReader;
use crate::engine::{EngineError, GenerationResult, RosterOrchestrator};

/// 生成任务提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 任务已接受并开始执行
    Accepted,
    /// 同周期已有任务在执行, 本次提交被拒绝
    AlreadyRunning,
}

/// 把 "YYYY-MM" 解析为自然月的闭区间 [首日, 末日]
///
/// # 返回
/// 格式非法或月份越界时返回 None
pub fn month_period(period: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (year_str, month_str) = period.split_once('-')?;
    let year: i32 = year_str.parse().ok()?;
    let month: u32 = month_str.parse().ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_month.pred_opt()?;
    Some((first, last))
}

// ==========================================
// GenerateService - 生成服务
// ==========================================
pub struct GenerateService<C>
where
    C: RosterConfigReader + 'static,
{
    orchestrator: Arc<RosterOrchestrator<C>>,
    in_flight: Arc<Mutex<HashSet<(NaiveDate, NaiveDate)>>>,
}

impl<C> GenerateService<C>
where
    C: RosterConfigReader + 'static,
{
    pub fn new(orchestrator: Arc<RosterOrchestrator<C>>) -> Self {
        Self {
            orchestrator,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// 同步等待一个周期的生成完成
    pub async fn generate(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<GenerationResult, EngineError> {
        let key = (period_start, period_end);
        if !self.try_begin(key) {
            warn!(
                period_start = %period_start,
                period_end = %period_end,
                "同周期生成任务已在执行, 拒绝重复提交"
            );
            return Err(EngineError::Config(format!(
                "周期 {} ~ {} 已有生成任务在执行",
                period_start, period_end
            )));
        }

        let result = self
            .orchestrator
            .generate_period(period_start, period_end)
            .await;
        self.finish(key);
        result
    }

    /// 后台提交一个周期的生成任务 (fire-and-forget)
    ///
    /// 任务结束只记日志; 调用方通过仓储查询落库结果
    pub fn submit(&self, period_start: NaiveDate, period_end: NaiveDate) -> SubmitOutcome {
        let key = (period_start, period_end);
        if !self.try_begin(key) {
            warn!(
                period_start = %period_start,
                period_end = %period_end,
                "同周期生成任务已在执行, 拒绝重复提交"
            );
            return SubmitOutcome::AlreadyRunning;
        }

        let orchestrator = self.orchestrator.clone();
        let in_flight = self.in_flight.clone();
        tokio::spawn(async move {
            match orchestrator.generate_period(period_start, period_end).await {
                Ok(result) => {
                    info!(
                        period_start = %period_start,
                        assignments = result.assignments.len(),
                        shortages = result.shortages.len(),
                        "后台生成任务完成"
                    );
                }
                Err(e) => {
                    error!(
                        period_start = %period_start,
                        error = %e,
                        "后台生成任务失败"
                    );
                }
            }
            if let Ok(mut guard) = in_flight.lock() {
                guard.remove(&key);
            }
        });

        SubmitOutcome::Accepted
    }

    fn try_begin(&self, key: (NaiveDate, NaiveDate)) -> bool {
        match self.in_flight.lock() {
            Ok(mut guard) => guard.insert(key),
            // 锁中毒时宁可拒绝, 不冒双写风险
            Err(_) => false,
        }
    }

    fn finish(&self, key: (NaiveDate, NaiveDate)) {
        if let Ok(mut guard) = self.in_flight.lock() {
            guard.remove(&key);
        }
    }
}
