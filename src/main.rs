use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scene_report::cli::{Cli, Commands};
use scene_report::{
    config::Config, scanner, LocationInfo, ProjectInfo, ReportBuilder, ReportRequest,
};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::load()?;

    match cli.command {
        Commands::Report {
            folder,
            project,
            location,
            address,
            category,
            director,
            producer,
            logo,
            output,
        } => {
            println!("🎬 scene-report - 场景报告生成\n");

            // 1. 扫描照片
            println!("[1/2] 扫描照片中...");
            let photos = scanner::scan_folder(&folder)?;
            println!("✔ 检测到{}张照片\n", photos.len());

            let location_name = location.unwrap_or_else(|| {
                folder
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            });

            let logo_bytes = match logo {
                Some(path) => {
                    Some(std::fs::read(&path).with_context(|| format!("读取Logo失败: {}", path.display()))?)
                }
                None => None,
            };

            let request = ReportRequest::SingleLocation {
                project: ProjectInfo {
                    name: project,
                    director,
                    producer,
                    logo: logo_bytes,
                    ..Default::default()
                },
                location: LocationInfo {
                    name: location_name,
                    address,
                    category,
                },
                photos,
            };

            // 2. 生成报告
            println!("[2/2] 生成报告中...");
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner());
            spinner.set_message("渲染页面...");
            spinner.enable_steady_tick(Duration::from_millis(100));

            let mut builder = ReportBuilder::new().with_compression(config.compression.clone());
            if let Some(font) = config.load_font()? {
                builder = builder.with_font(font);
            }
            let report = builder.generate(&request);

            spinner.finish_and_clear();

            match report.bytes {
                Some(bytes) => {
                    let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
                    std::fs::create_dir_all(&output_dir)?;
                    let path = output_dir.join(&report.file_name);
                    std::fs::write(&path, bytes)
                        .with_context(|| format!("写出失败: {}", path.display()))?;
                    println!("✔ 报告已生成: {}\n", path.display());
                    println!("✅ 完成");
                }
                None => {
                    anyhow::bail!("无法生成报告，请检查项目与场地信息");
                }
            }
        }

        Commands::Config { set_font } => {
            let mut config = config;
            if let Some(path) = set_font {
                config.set_font_path(path)?;
                println!("✔ 字体已更新");
            }
            println!("配置文件: {}", Config::config_path()?.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
