//! # Cheetah CLI
//!
//! mini cheetah 仿真演示的命令行工具。
//!
//! ```bash
//! # 运行演示：2 秒仿真时间后弯曲膝关节和髋关节
//! cheetah run
//!
//! # 无节奏、有限步数运行（脚本/CI）
//! cheetah run --pacing off --max-ticks 500
//!
//! # 查看描述文件中的关节
//! cheetah joints --model assets/mini_cheetah.urdf --json
//! ```
//!
//! 日志级别通过 `RUST_LOG` 控制，默认 `cheetah=info`。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{JointsCommand, RunCommand};

/// Cheetah CLI - 四足机器人仿真命令行工具
#[derive(Parser, Debug)]
#[command(name = "cheetah")]
#[command(about = "Mini cheetah simulation demo", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行演示（加载模型，延时后摆出中立站姿）
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 列出模型的关节信息
    Joints {
        #[command(flatten)]
        args: JointsCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志（写到 stderr，stdout 留给命令输出）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cheetah=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { args } => args.execute(),
        Commands::Joints { args } => args.execute(),
    }
}
