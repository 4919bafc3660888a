// ==========================================
// 风险测试选择系统 - 命令行入口
// ==========================================
// 用法: rbtcs --file testcases.xlsx --budget 2500
// 说明: 命令行参数覆写配置文件；日志写 stderr，摘要写 stdout
// ==========================================

use anyhow::Result;
use clap::Parser;
use rbtcs::config::RunConfig;
use rbtcs::engine::{SelectionEvent, SelectionEventSink};
use rbtcs::{logging, RunSummary, SelectionApi};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "rbtcs",
    about = "Risk-based test case selection under an execution-time budget",
    version
)]
struct Cli {
    /// JSON run configuration (CLI flags override its fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input spreadsheet or CSV file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Risk factor column name
    #[arg(long)]
    risk_col: Option<String>,

    /// Execution time column name
    #[arg(long)]
    time_col: Option<String>,

    /// Selection marker column name
    #[arg(long)]
    selection_col: Option<String>,

    /// Precondition column name (enables dependency-aware selection)
    #[arg(long)]
    precondition_col: Option<String>,

    /// Total execution-time budget
    #[arg(long, allow_negative_numbers = true)]
    budget: Option<i64>,

    /// Output CSV path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// 配置文件 + 命令行覆写
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(file) = &self.file {
            config.filename = file.clone();
        }
        if let Some(col) = &self.risk_col {
            config.risk_factor_col = col.clone();
        }
        if let Some(col) = &self.time_col {
            config.execution_time_col = col.clone();
        }
        if let Some(col) = &self.selection_col {
            config.selection_col = col.clone();
        }
        if let Some(col) = &self.precondition_col {
            config.precondition_col = Some(col.clone());
        }
        if let Some(budget) = self.budget {
            config.time_budget = budget;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }

        Ok(config)
    }
}

/// 建议类诊断直接提示到 stderr
struct AdvisoryPrinter;

impl SelectionEventSink for AdvisoryPrinter {
    fn publish(&self, event: &SelectionEvent) {
        match event {
            SelectionEvent::BudgetAdvisory { budget, threshold } => eprintln!(
                "提示: 预算 {} 超过 {}，精确求解可能耗时较长",
                budget, threshold
            ),
            SelectionEvent::ItemCountAdvisory {
                item_count,
                threshold,
            } => eprintln!(
                "提示: 用例数 {} 超过 {}，精确求解可能耗时较长",
                item_count, threshold
            ),
            SelectionEvent::SolverFallback { from, to, reason } => {
                eprintln!("提示: {} 求解器降级为 {}（{}）", from, to, reason)
            }
            _ => {}
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("求解器:       {}", summary.solver);
    println!("风险覆盖率:   {:.4}", summary.risk_ratio);
    println!("预算:         {}", summary.budget);
    println!("人工预占:     {}", summary.prebooked);
    println!("已选执行时间: {}", summary.selected_cost);
    println!("剩余预算:     {}", summary.remaining_budget);
    println!("已选用例:     {} / {}", summary.selected_count, summary.item_count);
    println!("提示:         {}", summary.advisories().count());
    if let Some(output) = &summary.output_path {
        println!("输出文件:     {}", output);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.run_config()?;

    let api = SelectionApi::with_event_sink(Arc::new(AdvisoryPrinter));
    let summary = api.run_file(&config).map_err(|e| {
        tracing::error!(kind = %e.kind(), error = %e, "选择运行失败");
        anyhow::Error::new(e)
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("风险测试选择系统 v{}", rbtcs::VERSION);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
