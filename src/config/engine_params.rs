// ==========================================
// 人力排班系统 - 引擎参数快照
// ==========================================
// 职责: 运行开始时将配置读取器解析为不可变参数快照
// 红线: 运行中途不得重新读取配置 (保证确定性)
// ==========================================

use std::collections::HashMap;
use std::error::Error;

use crate::config::roster_config_trait::RosterConfigReader;
use crate::domain::types::{GatePolicy, TimeRange, MINUTES_PER_DAY};

/// 配对班次时间窗（已解析）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingWindows {
    pub full: TimeRange,
    pub morning: TimeRange,
    pub afternoon: TimeRange,
}

// ==========================================
// EngineParams - 单次生成运行的参数快照
// ==========================================
#[derive(Debug, Clone)]
pub struct EngineParams {
    pub granularity_minutes: i32,          // 时间槽粒度 G
    pub slots: usize,                      // 每日槽数 = ceil(1440/G)
    pub max_window_minutes: i32,           // 窗口最大时长
    pub max_slots_per_shift: i32,          // 窗口最大槽龄 = ceil(max/G)
    pub primary_block_hours: i32,          // 首选班次长度 (小时)
    pub short_block_hours: Vec<i32>,       // 候选短班长度 (小时, 按序)
    pub gate_policy: GatePolicy,           // 短班启用判定策略
    pub skill_priorities: HashMap<String, i32>, // 技能优先级 (1 = 最高)
    pub pairing: Option<PairingWindows>,   // 配对班次时间窗 (启用且合法时)
}

impl EngineParams {
    /// 从配置读取器解析参数快照
    ///
    /// 配对配置不合法时退化为禁用 (记 warn, 不报错)
    pub async fn resolve<C>(config: &C) -> Result<Self, Box<dyn Error + Send + Sync>>
    where
        C: RosterConfigReader + ?Sized,
    {
        let granularity_minutes = config.get_granularity_minutes().await?;
        let max_window_minutes = config.get_max_window_minutes().await?;
        let primary_block_hours = config.get_primary_block_hours().await?;

        // 短班候选仅保留严格短于首选长度的档位
        let short_block_hours: Vec<i32> = config
            .get_short_block_hours()
            .await?
            .into_iter()
            .filter(|h| *h < primary_block_hours)
            .collect();

        let pairing_setting = config.get_pairing_setting().await?;
        let pairing = if pairing_setting.enabled {
            let parsed = (
                TimeRange::parse(&pairing_setting.full_window),
                TimeRange::parse(&pairing_setting.morning_window),
                TimeRange::parse(&pairing_setting.afternoon_window),
            );
            match parsed {
                (Some(full), Some(morning), Some(afternoon))
                    if morning.end_min <= afternoon.start_min =>
                {
                    Some(PairingWindows {
                        full,
                        morning,
                        afternoon,
                    })
                }
                _ => {
                    tracing::warn!(
                        full = %pairing_setting.full_window,
                        morning = %pairing_setting.morning_window,
                        afternoon = %pairing_setting.afternoon_window,
                        "配对班次时间窗配置不合法, 回落为非配对路径"
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            slots: ((MINUTES_PER_DAY + granularity_minutes - 1) / granularity_minutes) as usize,
            max_slots_per_shift: ((max_window_minutes + granularity_minutes - 1)
                / granularity_minutes)
                .max(1),
            granularity_minutes,
            max_window_minutes,
            primary_block_hours,
            short_block_hours,
            gate_policy: config.get_gate_policy().await?,
            skill_priorities: config.get_skill_priorities().await?,
            pairing,
        })
    }

    /// 候选班次长度 (小时, 尝试顺序: 首选在前)
    pub fn candidate_lengths(&self) -> Vec<i32> {
        let mut lengths = Vec::with_capacity(1 + self.short_block_hours.len());
        lengths.push(self.primary_block_hours);
        lengths.extend(self.short_block_hours.iter().copied());
        lengths
    }

    /// 技能处理顺序键: (配置优先级 asc, 未配置最后), 同级按技能ID升序
    pub fn skill_order_key(&self, skill_id: &str) -> (i32, String) {
        let priority = self
            .skill_priorities
            .get(skill_id)
            .copied()
            .unwrap_or(i32::MAX);
        (priority, skill_id.to_string())
    }

    /// 测试用默认参数 (G=60, 9h 窗口上限, 8h 首选 + 6h/4h 短班)
    pub fn for_tests() -> Self {
        Self {
            granularity_minutes: 60,
            slots: 24,
            max_window_minutes: 540,
            max_slots_per_shift: 9,
            primary_block_hours: 8,
            short_block_hours: vec![6, 4],
            gate_policy: GatePolicy::AOrB,
            skill_priorities: HashMap::new(),
            pairing: None,
        }
    }
}
