use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scene-report")]
#[command(about = "勘景照片管理・场景报告PDF生成工具", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 扫描照片文件夹并生成单场地场景报告
    Report {
        /// 照片文件夹路径
        #[arg(required = true)]
        folder: PathBuf,

        /// 项目名称
        #[arg(short, long)]
        project: String,

        /// 场地名称（默认取文件夹名）
        #[arg(short, long)]
        location: Option<String>,

        /// 场地地址
        #[arg(long)]
        address: Option<String>,

        /// 场地类别
        #[arg(long)]
        category: Option<String>,

        /// 导演
        #[arg(long)]
        director: Option<String>,

        /// 制片
        #[arg(long)]
        producer: Option<String>,

        /// 封面Logo图片路径
        #[arg(long)]
        logo: Option<PathBuf>,

        /// 输出目录（默认当前目录）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 查看或修改配置
    Config {
        /// 设置中文字体文件（TTF）
        #[arg(long)]
        set_font: Option<PathBuf>,
    },
}
