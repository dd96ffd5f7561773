//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 onboarding-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `content-check`: 检查引导数据 JSON（解码、颜色、卡片内容）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use onboarding_runtime::{ContentError, OnboardingResponse};
use walkdir::WalkDir;

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "onboarding-runtime", "--html"]);
            run("cargo llvm-cov -p onboarding-runtime --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            // workspace 覆盖率只用于趋势观察，排除 xtask 以免稀释信号
            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "--workspace", "--exclude", "xtask", "--html"]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "content-check" => {
            let path = args.next();
            content_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 onboarding-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  content-check   检查引导数据 JSON 文件

CONTENT-CHECK:
  cargo xtask content-check [path]

  不带参数：检查 assets/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - JSON 解码错误
    - 无效的颜色值（#RRGGBB / #AARRGGBB）
    - success == false、空卡片列表、空文案
    - 非正的远端时间间隔（会被忽略）

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo content-check -> cargo xtask content-check
"#
    );
}

//=============================================================================
// content-check 命令实现
//=============================================================================

/// 默认检查目录（相对于 workspace root）
const DEFAULT_CONTENT_DIR: &str = "assets";

/// 单条检查发现
#[derive(Debug, Clone, PartialEq, Eq)]
struct Finding {
    file: String,
    message: String,
}

/// 内容检查结果
#[derive(Debug, Default)]
struct ContentCheckResult {
    /// 检查的文件数量
    files_checked: usize,
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
}

impl ContentCheckResult {
    fn error(&mut self, file: &str, message: impl Into<String>) {
        self.errors.push(Finding {
            file: file.to_string(),
            message: message.into(),
        });
    }

    fn warn(&mut self, file: &str, message: impl Into<String>) {
        self.warnings.push(Finding {
            file: file.to_string(),
            message: message.into(),
        });
    }
}

/// 执行内容检查
fn content_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_json_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_CONTENT_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认内容目录不存在: {}\n请在 workspace 根目录运行，或指定文件路径",
                    dir.display()
                );
            }
            collect_json_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到内容文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个内容文件...\n", files.len());

    let mut result = ContentCheckResult::default();
    for file in &files {
        check_content_file(file, &mut result);
    }

    print_check_result(&result);

    if !result.errors.is_empty() {
        anyhow::bail!("内容检查发现错误");
    }

    Ok(())
}

/// 收集目录下的所有 JSON 文件
fn collect_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 检查单个内容文件
fn check_content_file(file: &Path, result: &mut ContentCheckResult) {
    let id = file.display().to_string();
    result.files_checked += 1;

    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            result.error(&id, format!("无法读取文件 - {e}"));
            return;
        }
    };

    check_content_text(&id, &text, result);
}

fn check_content_text(id: &str, text: &str, result: &mut ContentCheckResult) {
    let response = match OnboardingResponse::from_json(text) {
        Ok(response) => response,
        Err(e) => {
            result.error(id, e.to_string());
            return;
        }
    };

    if !response.success {
        result.warn(id, "success 为 false，宿主将显示错误状态");
    }

    let data = response.data.onboarding_data;
    if data.bottom_to_center_translation_interval <= 0 {
        result.warn(id, "bottomToCenterTranslationInterval 非正，远端上升时长将被忽略");
    }
    if data.expand_card_stay_interval <= 0 {
        result.warn(id, "expandCardStayInterval 非正，远端停留时长将被忽略");
    }

    // 不论 success 如何，都校验描述符能否构造
    let content = match data.into_content() {
        Ok(content) => content,
        Err(ContentError::InvalidColor { field, value }) => {
            result.error(id, format!("颜色值无效 [{field}] '{value}'"));
            return;
        }
        Err(e) => {
            result.error(id, e.to_string());
            return;
        }
    };

    if content.cards.is_empty() {
        result.warn(id, "educationCardList 为空，将直接显示 CTA");
    }
    for (index, card) in content.cards.iter().enumerate() {
        if card.collapsed_text.trim().is_empty() || card.expanded_text.trim().is_empty() {
            result.warn(id, format!("第 {index} 张卡片文案为空"));
        }
        if card.image.trim().is_empty() {
            result.warn(id, format!("第 {index} 张卡片缺少图片"));
        }
    }
    if content.cta.text.trim().is_empty() {
        result.warn(id, "saveButtonCta.text 为空");
    }
}

/// 输出检查结果
fn print_check_result(result: &ContentCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个文件", result.files_checked);
    eprintln!();

    for finding in &result.errors {
        eprintln!("[ERROR] {}: {}", finding.file, finding.message);
    }
    for finding in &result.warnings {
        eprintln!("[WARN] {}: {}", finding.file, finding.message);
    }

    let error_count = result.errors.len();
    let warn_count = result.warnings.len();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
