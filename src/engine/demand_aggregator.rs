// ==========================================
// 人力排班系统 - 需求聚合器
// ==========================================
// 职责: 将需求声明解析为按技能按时间槽的席位需求曲线
// 红线: 日期特例覆盖周循环 (覆盖, 不叠加);
//       同一快照重复聚合必须产出逐位相同的曲线
// ==========================================

use chrono::{NaiveDate, Weekday};
use std::collections::BTreeMap;

use crate::config::engine_params::EngineParams;
use crate::domain::demand::DemandDeclaration;
use crate::domain::types::MINUTES_PER_DAY;
use tracing::debug;

/// 按技能的席位需求曲线: curve[i] = 第 i 槽所需席位数
pub type SkillCurves = BTreeMap<String, Vec<i32>>;

// ==========================================
// DemandAggregator - 需求聚合器
// ==========================================
pub struct DemandAggregator;

impl DemandAggregator {
    /// 聚合某日的席位需求曲线
    ///
    /// 规则:
    /// 1) 仅纳入对该日生效且可聚合的声明 (无技能声明在入库时已拒绝)
    /// 2) 周循环与日期特例分别累加到独立数组
    /// 3) 有效曲线: dateArr[i] > 0 时取 dateArr[i], 否则取 weeklyArr[i]
    ///
    /// # 返回
    /// 技能 → 曲线 (仅含存在非零需求的技能)
    pub fn aggregate(
        day: NaiveDate,
        weekday: Weekday,
        declarations: &[DemandDeclaration],
        params: &EngineParams,
    ) -> SkillCurves {
        let slots = params.slots;
        let g = params.granularity_minutes;

        let mut weekly: BTreeMap<String, Vec<i32>> = BTreeMap::new();
        let mut dated: BTreeMap<String, Vec<i32>> = BTreeMap::new();

        for decl in declarations {
            if !decl.applies_to(day, weekday) {
                continue;
            }
            if !decl.is_aggregatable() {
                debug!(demand_id = %decl.demand_id, "跳过不可聚合的需求声明");
                continue;
            }

            let range = decl.time_range();
            let lo = (range.start_min / g).max(0) as usize;
            let hi = (((range.end_min.min(MINUTES_PER_DAY) + g - 1) / g) as usize).min(slots);
            if lo >= hi {
                continue;
            }

            let target = if decl.date.is_some() {
                &mut dated
            } else {
                &mut weekly
            };
            let arr = target
                .entry(decl.skill_id.clone())
                .or_insert_with(|| vec![0; slots]);
            for slot in arr.iter_mut().take(hi).skip(lo) {
                *slot += decl.required_seats;
            }
        }

        // 覆盖合并: 该日出现过的全部技能, 逐槽取有效值
        let mut curves: SkillCurves = BTreeMap::new();
        let mut skills: Vec<String> = weekly.keys().chain(dated.keys()).cloned().collect();
        skills.sort();
        skills.dedup();

        for skill_id in skills {
            let weekly_arr = weekly.get(&skill_id);
            let dated_arr = dated.get(&skill_id);
            let mut curve = vec![0; slots];
            let mut any = false;
            for (i, slot) in curve.iter_mut().enumerate() {
                let w = weekly_arr.map(|a| a[i]).unwrap_or(0);
                let d = dated_arr.map(|a| a[i]).unwrap_or(0);
                *slot = if d > 0 { d } else { w };
                any |= *slot > 0;
            }
            if any {
                curves.insert(skill_id, curve);
            }
        }
        curves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> EngineParams {
        EngineParams::for_tests()
    }

    fn decl(
        id: &str,
        skill: &str,
        date: Option<NaiveDate>,
        dow: Option<Weekday>,
        start_min: i32,
        end_min: i32,
        seats: i32,
    ) -> DemandDeclaration {
        DemandDeclaration {
            demand_id: id.to_string(),
            skill_id: skill.to_string(),
            date,
            day_of_week: dow,
            start_min,
            end_min,
            required_seats: seats,
            active: true,
            sort_order: 0,
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_weekly_declaration_fills_slots() {
        let curves = DemandAggregator::aggregate(
            monday(),
            Weekday::Mon,
            &[decl("D1", "A", None, Some(Weekday::Mon), 540, 1080, 2)],
            &params(),
        );
        let curve = &curves["A"];
        assert_eq!(curve[8], 0);
        assert_eq!(curve[9], 2); // 09:00
        assert_eq!(curve[17], 2); // 17:00-18:00
        assert_eq!(curve[18], 0);
    }

    #[test]
    fn test_date_override_beats_weekly_regardless_of_order() {
        let day = monday();
        let weekly = decl("D1", "A", None, Some(Weekday::Mon), 540, 1080, 3);
        let dated = decl("D2", "A", Some(day), None, 540, 1080, 1);

        let forward =
            DemandAggregator::aggregate(day, Weekday::Mon, &[weekly.clone(), dated.clone()], &params());
        let reverse = DemandAggregator::aggregate(day, Weekday::Mon, &[dated, weekly], &params());

        assert_eq!(forward["A"][10], 1);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_date_override_is_per_slot() {
        let day = monday();
        // 周循环 09:00-18:00, 特例仅覆盖 09:00-12:00
        let curves = DemandAggregator::aggregate(
            day,
            Weekday::Mon,
            &[
                decl("D1", "A", None, Some(Weekday::Mon), 540, 1080, 2),
                decl("D2", "A", Some(day), None, 540, 720, 5),
            ],
            &params(),
        );
        let curve = &curves["A"];
        assert_eq!(curve[9], 5); // 特例槽
        assert_eq!(curve[12], 2); // 回落周循环
    }

    #[test]
    fn test_inactive_and_degenerate_rows_skipped() {
        let mut inactive = decl("D1", "A", None, Some(Weekday::Mon), 540, 1080, 2);
        inactive.active = false;
        let zero_seats = decl("D2", "A", None, Some(Weekday::Mon), 540, 1080, 0);
        let out_of_day = decl("D3", "A", None, Some(Weekday::Mon), 1440, 1500, 2);

        let curves = DemandAggregator::aggregate(
            monday(),
            Weekday::Mon,
            &[inactive, zero_seats, out_of_day],
            &params(),
        );
        assert!(curves.is_empty());
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let day = monday();
        let declarations = vec![
            decl("D1", "A", None, Some(Weekday::Mon), 480, 960, 2),
            decl("D2", "B", None, Some(Weekday::Mon), 600, 1200, 1),
            decl("D3", "A", Some(day), None, 480, 720, 4),
        ];
        let first = DemandAggregator::aggregate(day, Weekday::Mon, &declarations, &params());
        let second = DemandAggregator::aggregate(day, Weekday::Mon, &declarations, &params());
        assert_eq!(first, second);
    }
}
