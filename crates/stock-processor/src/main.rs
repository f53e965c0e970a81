//! 파생 테이블 배치 프로세서 CLI.

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use stock_core::{init_logging, LogConfig, LogFormat};
use stock_data::{Database, PgPriceStore};
use stock_processor::{ProcessorConfig, Scheduler, Task};

/// DB 대기 중 재시도 간격
const DB_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "stock-processor")]
#[command(about = "Stock chart derived table processor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// 데몬 모드: 주기적으로 전체 사이클 실행
    Daemon {
        /// 특정 종목만 처리 (쉼표로 구분, 예: "HPG,FPT")
        #[arg(long)]
        symbols: Option<String>,
    },

    /// 전체 사이클 1회 실행
    RunOnce {
        /// 특정 종목만 처리 (쉼표로 구분)
        #[arg(long)]
        symbols: Option<String>,
    },

    /// 작업 하나만 실행 (trend, distribution, correlation, prediction, clustering)
    Run {
        /// 작업 이름
        task: Task,

        /// 특정 종목만 처리 (쉼표로 구분)
        #[arg(long)]
        symbols: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 로깅 초기화
    let level = format!(
        "stock_processor={0},stock_data={0},stock_analytics={0}",
        cli.log_level
    );
    init_logging(LogConfig::new(level).with_format(cli.log_format))
        .map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;

    tracing::info!("Stock Chart Processor 시작");

    // 설정 로드
    let config = ProcessorConfig::from_env()?;
    tracing::debug!(
        interval_secs = config.schedule.interval_secs,
        cadence = %config.schedule.clustering_cadence,
        raw_table = %config.database.raw_table,
        "설정 로드 완료"
    );

    // DB 연결 (준비될 때까지 대기)
    let db = Database::connect_lazy(&config.database_config())?;
    db.wait_until_ready(config.database.wait_timeout(), DB_POLL_INTERVAL)
        .await?;
    tracing::info!("데이터베이스 연결 성공");

    let store = Arc::new(PgPriceStore::with_raw_table(
        db.clone(),
        config.database.raw_table.clone(),
    ));

    // 명령 실행
    match cli.command {
        Commands::Daemon { symbols } => {
            let mut scheduler = Scheduler::new(store, config).with_symbols(symbols.as_deref());
            scheduler
                .run_daemon(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!("종료 신호 대기 실패: {}", e);
                    }
                })
                .await;
        }
        Commands::RunOnce { symbols } => {
            let mut scheduler = Scheduler::new(store, config).with_symbols(symbols.as_deref());
            let report = scheduler.run_cycle().await;
            report.log_summary();
        }
        Commands::Run { task, symbols } => {
            let mut scheduler = Scheduler::new(store, config).with_symbols(symbols.as_deref());
            scheduler.run_single(task).await?;
        }
    }

    db.close().await;
    tracing::info!("Stock Chart Processor 종료");

    Ok(())
}
