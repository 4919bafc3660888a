// ==========================================
// 选择 API 端到端测试
// ==========================================
// 测试目标: 文件读取 → 表头定位 → 选择 → CSV 回写 的完整链路
// 覆盖范围: 说明行、Excel 输入、前置条件回写、配置文件加载、错误分类与无部分输出
// ==========================================

use rbtcs::api::{ErrorKind, SelectionApi};
use rbtcs::config::RunConfig;
use rbtcs::domain::types::SolverKind;
use rbtcs::logging;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ==========================================
// 测试辅助函数
// ==========================================

fn write_file(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(|v| v.to_string()).collect())
        .collect()
}

// ==========================================
// 正常流程
// ==========================================

#[test]
fn test_run_file_with_preconditions() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "cases.csv",
        &[
            "Regression plan,,,,",
            "Name,Risk Factor,Execution Time,Selected,Preconditions",
            "setup,1,1,,",
            "login,2,2,,",
            "checkout,10,1,,\"2,1,\"",
        ],
    );
    let output = dir.path().join("result.csv");
    let config = RunConfig {
        filename: input,
        precondition_col: Some("Preconditions".to_string()),
        time_budget: 4,
        output: Some(output.clone()),
        ..RunConfig::default()
    };

    let summary = SelectionApi::new().run_file(&config).unwrap();

    assert_eq!(summary.solver, SolverKind::PreconditionGreedy);
    assert_eq!(summary.risk_ratio, 1.0);
    assert_eq!(summary.selected_count, 3);
    assert_eq!(summary.remaining_budget, 0);
    assert_eq!(summary.output_path.as_deref(), Some(output.display().to_string().as_str()));

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][0], "Regression plan");
    assert_eq!(rows[2][3], "y");
    assert_eq!(rows[3][3], "y");
    assert_eq!(rows[4][3], "y");
    assert_eq!(rows[4][4], "1,2");
}

#[test]
fn test_run_file_without_preconditions_uses_optimal() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "suite.csv",
        &[
            "Risk Factor,Execution Time,Selected",
            "6,5,",
            "5,4,",
            "5,4,",
            "9,3,N",
        ],
    );
    let config = RunConfig {
        filename: input,
        time_budget: 8,
        ..RunConfig::default()
    };

    let summary = SelectionApi::new().run_file(&config).unwrap();

    assert_eq!(summary.solver, SolverKind::Optimal);
    assert!(!summary.fallback_used);
    assert_eq!(summary.selected_cost, 8);

    // 未指定输出路径时写到 <输入名>.selected.csv
    let rows = read_rows(&dir.path().join("suite.selected.csv"));
    let markers: Vec<&str> = rows[1..].iter().map(|r| r[2].as_str()).collect();
    assert_eq!(markers, vec!["n", "y", "y", "n"]);
}

#[test]
fn test_summary_serializes_to_json() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "cases.csv",
        &["Risk Factor,Execution Time,Selected", "1,1,y", "2,1,"],
    );
    let config = RunConfig {
        filename: input,
        time_budget: 5,
        ..RunConfig::default()
    };

    let summary = SelectionApi::new().run_file(&config).unwrap();
    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["solver"], "OPTIMAL");
    assert_eq!(json["prebooked"], 1);
    assert!(json["run_id"].as_str().is_some());
    assert!(json["events"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["type"] == "BUDGET_PREBOOKED"));
}

#[test]
fn test_run_excel_file_with_numeric_cells() {
    logging::init_test();

    // 工作表: 说明行 + 表头 + 3 个用例；数值单元格均为浮点（如执行时间 3.0、前置条件 2.0）
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("from_excel.csv");
    let config = RunConfig {
        filename: fixture("selection_cases.xlsx"),
        precondition_col: Some("Preconditions".to_string()),
        time_budget: 4,
        output: Some(output.clone()),
        ..RunConfig::default()
    };

    let summary = SelectionApi::new().run_file(&config).unwrap();

    assert_eq!(summary.solver, SolverKind::PreconditionGreedy);
    assert_eq!(summary.item_count, 3);
    assert_eq!(summary.selected_count, 2);
    assert_eq!(summary.selected_cost, 4);
    assert_eq!(summary.remaining_budget, 0);
    assert!((summary.risk_ratio - 12.0 / 13.0).abs() < 1e-9);

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][0], "Regression plan");
    assert_eq!(
        rows[1],
        vec!["Name", "Risk Factor", "Execution Time", "Selected", "Preconditions"]
    );
    // 3 号用例依赖 2 号用例，一并选中；1 号用例超出剩余预算
    let markers: Vec<&str> = rows[2..].iter().map(|r| r[3].as_str()).collect();
    assert_eq!(markers, vec!["n", "y", "y"]);
    assert_eq!(rows[4][4], "2");
    // 未改写的列原样保留
    assert_eq!(rows[3][0], " login ");
    assert_eq!(rows[3][2], "3");
}

#[test]
fn test_untouched_columns_keep_whitespace() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "cases.csv",
        &[
            "Name,Risk Factor,Execution Time,Selected,Notes",
            " login , 2 ,1, ,  keep  ",
        ],
    );
    let output = dir.path().join("out.csv");
    let config = RunConfig {
        filename: input,
        time_budget: 1,
        output: Some(output.clone()),
        ..RunConfig::default()
    };

    let summary = SelectionApi::new().run_file(&config).unwrap();
    assert_eq!(summary.selected_count, 1);

    let rows = read_rows(&output);
    assert_eq!(rows[1], vec![" login ", " 2 ", "1", "y", "  keep  "]);
}

#[test]
fn test_config_file_overrides_defaults() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "cases.csv",
        &["Risk,Time,Pick", "3,2,", "1,1,"],
    );
    let config_path = dir.path().join("run.json");
    let raw = serde_json::json!({
        "filename": input,
        "risk_factor_col": "Risk",
        "execution_time_col": "Time",
        "selection_col": "Pick",
        "time_budget": 2
    });
    fs::write(&config_path, raw.to_string()).unwrap();

    let config = RunConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.header_search_rows, 10);

    let summary = SelectionApi::new().run_file(&config).unwrap();
    assert_eq!(summary.selected_count, 1);
    assert_eq!(summary.selected_cost, 2);
}

// ==========================================
// 错误流程
// ==========================================

#[test]
fn test_malformed_config_file_names_path() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("run.json");
    fs::write(&config_path, r#"{"time_budget": "soon"}"#).unwrap();

    let err = RunConfig::from_json_file(&config_path).unwrap_err();

    assert!(format!("{:#}", err).contains(&config_path.display().to_string()));
}

#[test]
fn test_invalid_cell_fails_without_output() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "cases.csv",
        &["Risk Factor,Execution Time,Selected", "1,1,", "1,1.5,"],
    );
    let output = dir.path().join("out.csv");
    let config = RunConfig {
        filename: input,
        output: Some(output.clone()),
        ..RunConfig::default()
    };

    let err = SelectionApi::new().run_file(&config).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InputValidation);
    assert!(err.to_string().contains("行 3"));
    assert!(!output.exists());
}

#[test]
fn test_contradiction_reported_with_ordinals() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "cases.csv",
        &[
            "Risk Factor,Execution Time,Selected,Pre",
            "1,1,n,",
            "1,1,y,1",
        ],
    );
    let config = RunConfig {
        filename: input,
        precondition_col: Some("Pre".to_string()),
        ..RunConfig::default()
    };

    let err = SelectionApi::new().run_file(&config).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SeedingContradiction);
    let message = err.to_string();
    assert!(message.contains("用例 2"));
    assert!(message.contains("用例 1"));
}

#[test]
fn test_missing_input_file_is_io_error() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let config = RunConfig {
        filename: dir.path().join("absent.csv"),
        ..RunConfig::default()
    };

    let err = SelectionApi::new().run_file(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_zero_risk_table_is_undefined_ratio() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "cases.csv",
        &["Risk Factor,Execution Time,Selected", "0,1,", "0,2,"],
    );
    let config = RunConfig {
        filename: input,
        ..RunConfig::default()
    };

    let err = SelectionApi::new().run_file(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UndefinedRatio);
}
