// ==========================================
// 人力排班系统 - 命令行主入口
// ==========================================
// 用法: workforce-roster <数据库路径> <YYYY-MM>
// 行为: 对给定自然月执行一次完整排班生成并打印摘要
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};

use workforce_roster::config::ConfigManager;
use workforce_roster::db::open_sqlite_connection;
use workforce_roster::engine::{RosterOrchestrator, RosterRepositories};
use workforce_roster::service::{month_period, GenerateService};
use workforce_roster::{logging, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 需求驱动排班引擎", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        tracing::error!("用法: {} <数据库路径> <YYYY-MM>", args[0]);
        return Err(anyhow!("参数数量不正确"));
    }
    let db_path = &args[1];
    let (period_start, period_end) = month_period(&args[2])
        .ok_or_else(|| anyhow!("周期格式非法, 需要 YYYY-MM: {}", args[2]))?;

    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("生成周期: {} ~ {}", period_start, period_end);

    let conn = open_sqlite_connection(db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    let conn = Arc::new(Mutex::new(conn));

    let config = Arc::new(ConfigManager::from_connection(conn.clone()).map_err(anyhow::Error::from_boxed).context("配置层初始化失败")?);
    let repos = RosterRepositories::from_connection(conn).context("仓储层初始化失败")?;

    let orchestrator = Arc::new(RosterOrchestrator::new(config, repos));
    let service = GenerateService::new(orchestrator);
    let result = service
        .generate(period_start, period_end)
        .await
        .context("排班生成失败")?;

    tracing::info!("==================================================");
    tracing::info!("生成完成: 指派 {} 条", result.assignments.len());
    tracing::info!("处理天数: {}", result.days_processed);
    if result.shortages.is_empty() {
        tracing::info!("席位缺口: 无");
    } else {
        tracing::warn!("席位缺口: {} 条", result.shortages.len());
        for shortage in &result.shortages {
            tracing::warn!(
                "  {} 技能={} 时段={:02}:{:02}-{:02}:{:02} 缺 {} 席 ({})",
                shortage.work_date,
                shortage.skill_id,
                shortage.start_min / 60,
                shortage.start_min % 60,
                shortage.end_min / 60,
                shortage.end_min % 60,
                shortage.seats_unfilled,
                shortage.reason
            );
        }
    }
    if !result.days_with_unmet_demand.is_empty() {
        tracing::warn!("有需求但零产出的日期: {:?}", result.days_with_unmet_demand);
    }
    tracing::info!("==================================================");

    Ok(())
}
