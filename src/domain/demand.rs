// ==========================================
// 人力排班系统 - 需求声明领域模型
// ==========================================
// 职责: 席位需求的声明式描述 (按周循环 / 按日期特例)
// 红线: date 与 day_of_week 二选一; 无技能需求不受支持
// ==========================================

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TimeRange, MINUTES_PER_DAY};

// ==========================================
// DemandDeclaration - 席位需求声明
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandDeclaration {
    pub demand_id: String,              // 需求ID (UUID)
    pub skill_id: String,               // 技能ID (必填)
    pub date: Option<NaiveDate>,        // 特定日期 (与 day_of_week 互斥)
    pub day_of_week: Option<Weekday>,   // 周几 (周循环需求)
    pub start_min: i32,                 // 开始时间 (当日分钟)
    pub end_min: i32,                   // 结束时间 (当日分钟)
    pub required_seats: i32,            // 所需席位数
    pub active: bool,                   // 是否启用
    pub sort_order: i32,                // 展示排序
}

impl DemandDeclaration {
    /// 该声明是否对指定日期生效
    ///
    /// 生效条件: date == day, 或 date 为空且 day_of_week 命中
    pub fn applies_to(&self, day: NaiveDate, weekday: Weekday) -> bool {
        match self.date {
            Some(d) => d == day,
            None => self.day_of_week == Some(weekday),
        }
    }

    /// 聚合前的有效性检查
    ///
    /// 无效声明（未启用 / 席位数非正 / 时段落在当日之外）直接跳过
    pub fn is_aggregatable(&self) -> bool {
        self.active
            && !self.skill_id.is_empty()
            && self.required_seats > 0
            && self.end_min > 0
            && self.start_min < MINUTES_PER_DAY
            && self.start_min < self.end_min
    }

    /// 声明覆盖的时间区间
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_min.max(0), self.end_min.min(MINUTES_PER_DAY))
    }
}

// ==========================================
// SkillPattern - 技能短班模式白名单
// ==========================================
// 用途: 显式允许某技能在某 weekday/时段使用指定短班长度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillPattern {
    pub pattern_id: String,             // 模式ID (UUID)
    pub skill_id: String,               // 技能ID
    pub day_of_week: Option<Weekday>,   // 周几 (空 = 任意)
    pub start_min: i32,                 // 时段开始
    pub end_min: i32,                   // 时段结束
    pub allowed_length_hours: i32,      // 允许的班次长度 (小时)
    pub active: bool,                   // 是否启用
}

impl SkillPattern {
    /// 该模式是否放行指定的候选子块
    pub fn permits(
        &self,
        skill_id: &str,
        weekday: Weekday,
        block: &TimeRange,
        length_hours: i32,
    ) -> bool {
        self.active
            && self.skill_id == skill_id
            && self.allowed_length_hours == length_hours
            && self.day_of_week.map_or(true, |d| d == weekday)
            && TimeRange::new(self.start_min, self.end_min).contains(block)
    }
}
