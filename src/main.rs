// ==========================================
// BoM 转 EPD - 命令行入口
// ==========================================
// 命令:
//   run          完整运行（读取 → 映射 → 载荷 → 落盘 → 提交）
//   preview      仅预览映射结果
//   units        列出可用 EPD 单位
//   init-config  写出默认配置文件
// 密钥: 仅从环境变量读取（见 config::env_keys）
// ==========================================

use anyhow::{Context, Result};
use bom_to_epd::app::{spawn_pipeline, stdin_is_interactive, TerminalConfirmer};
use bom_to_epd::config::{default_config_path, ColumnRef, ConfigLoader, EpdConfig};
use bom_to_epd::domain::EpdUnit;
use bom_to_epd::engine::{EpdPipeline, MissingPolicyKind, ProgressSink};
use bom_to_epd::i18n::{set_locale, t, t_with_args};
use bom_to_epd::logging;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// 缺失物料取消时的退出码
const EXIT_ABORTED: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "bom-to-epd",
    version,
    about = "Map a bill of materials to reference processes and submit an EPD component tree"
)]
struct Cli {
    /// 配置文件路径（默认: $BOM_TO_EPD_CONFIG 或用户配置目录）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 界面语言
    #[arg(long, global = true, default_value = "zh-CN")]
    lang: String,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 完整运行
    Run(RunArgs),
    /// 预览映射结果（不写文件、不提交）
    Preview(SourceArgs),
    /// 列出可用 EPD 单位
    Units,
    /// 写出默认配置文件
    InitConfig {
        /// 目标路径（默认: 配置文件默认路径）
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Skip,
    Abort,
    Confirm,
}

impl From<PolicyArg> for MissingPolicyKind {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Skip => MissingPolicyKind::Skip,
            PolicyArg::Abort => MissingPolicyKind::Abort,
            PolicyArg::Confirm => MissingPolicyKind::Confirm,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
struct SourceArgs {
    /// BoM 表格（.xlsx/.xls/.ods/.csv）
    #[arg(long)]
    bom: Option<PathBuf>,

    /// 工作表名（默认第一个）
    #[arg(long)]
    sheet: Option<String>,

    /// 映射表
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// 跳过的前导行数
    #[arg(long)]
    start_row: Option<usize>,

    /// 物料名列（序号或列字母）
    #[arg(long, value_parser = parse_column_arg)]
    material_column: Option<usize>,

    /// 数量列（序号或列字母）
    #[arg(long, value_parser = parse_column_arg)]
    amount_column: Option<usize>,

    /// CSV 分隔符
    #[arg(long)]
    delimiter: Option<char>,
}

#[derive(Debug, Clone, clap::Args)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// EPD 名称
    #[arg(long)]
    name: Option<String>,

    /// EPD 声明单位
    #[arg(long, value_parser = parse_unit_arg)]
    unit: Option<EpdUnit>,

    /// JSON 输出目录
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// 参考过程仓库
    #[arg(long)]
    root_repository: Option<String>,

    /// 结果仓库
    #[arg(long)]
    target_repository: Option<String>,

    /// 评分服务地址
    #[arg(long)]
    api_url: Option<String>,

    /// 缺失物料策略
    #[arg(long, value_enum)]
    on_missing: Option<PolicyArg>,

    /// 缺失物料自动跳过（等同 --on-missing skip）
    #[arg(long)]
    skip_missing: bool,

    /// 只写 JSON，不提交
    #[arg(long)]
    no_submit: bool,
}

fn parse_column_arg(raw: &str) -> std::result::Result<usize, String> {
    raw.parse::<ColumnRef>()
        .and_then(|column| column.resolve())
        .map_err(|err| err.to_string())
}

fn parse_unit_arg(raw: &str) -> std::result::Result<EpdUnit, String> {
    raw.parse::<EpdUnit>()
}

impl SourceArgs {
    fn apply(&self, config: &mut EpdConfig) {
        let source = &mut config.source;
        if let Some(path) = &self.bom {
            source.bom_path = path.clone();
        }
        if let Some(sheet) = &self.sheet {
            source.sheet_name = Some(sheet.clone());
        }
        if let Some(path) = &self.mapping {
            source.mapping_path = path.clone();
        }
        if let Some(start_row) = self.start_row {
            source.start_row = start_row;
        }
        if let Some(column) = self.material_column {
            source.material_column = ColumnRef::Index(column);
        }
        if let Some(column) = self.amount_column {
            source.amount_column = ColumnRef::Index(column);
        }
        if let Some(delimiter) = self.delimiter {
            source.csv_delimiter = delimiter;
        }
    }
}

impl RunArgs {
    fn apply(&self, config: &mut EpdConfig) {
        self.source.apply(config);
        if let Some(name) = &self.name {
            config.epd.name = name.clone();
        }
        if let Some(unit) = self.unit {
            config.epd.unit = unit;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(url) = &self.root_repository {
            config.repositories.root = url.clone();
        }
        if let Some(url) = &self.target_repository {
            config.repositories.target = url.clone();
        }
        if let Some(url) = &self.api_url {
            config.api.url = url.clone();
        }
        if let Some(policy) = self.on_missing {
            config.missing_policy = Some(policy.into());
        }
        if self.skip_missing {
            config.skip_missing_materials = true;
        }
        if self.no_submit {
            config.api.submit = false;
        }
    }
}

fn stdout_sink() -> Arc<dyn ProgressSink> {
    Arc::new(|message: &str| println!("{message}"))
}

fn run(config: EpdConfig) -> Result<ExitCode> {
    let policy = config
        .effective_missing_policy(stdin_is_interactive())
        .into_policy(TerminalConfirmer);
    let pipeline = EpdPipeline::from_config(config)?.with_policy(policy);

    let handle = spawn_pipeline(pipeline, stdout_sink())?;
    // 结果摘要已由后台线程经进度出口输出
    match handle.join() {
        Ok(Some(_)) => Ok(ExitCode::SUCCESS),
        Ok(None) => Ok(ExitCode::from(EXIT_ABORTED)),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

fn preview(config: EpdConfig) -> Result<ExitCode> {
    let pipeline = EpdPipeline::from_config(config)?.with_progress(Arc::new(
        |message: &str| eprintln!("{message}"),
    ));
    let preview = pipeline.preview()?;
    print!("{}", preview.render());
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    let locale = set_locale(&cli.lang);
    tracing::debug!(version = bom_to_epd::VERSION, lang = locale, "启动");

    match cli.command {
        Command::Units => {
            println!("{}", t("cli.units_title"));
            for unit in EpdUnit::ALL {
                println!("  {}", unit.label());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig { path } => {
            let path = path.or(cli.config).unwrap_or_else(default_config_path);
            ConfigLoader::save(&EpdConfig::default(), &path)
                .with_context(|| path.display().to_string())?;
            println!(
                "{}",
                t_with_args("cli.config_written", &[("path", &path.display().to_string())])
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Preview(args) => {
            let mut config = ConfigLoader::load(cli.config.as_deref())?;
            args.apply(&mut config);
            preview(config)
        }
        Command::Run(args) => {
            let mut config = ConfigLoader::load(cli.config.as_deref())?;
            args.apply(&mut config);
            run(config)
        }
    }
}
