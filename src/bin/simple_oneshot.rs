// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/bin/simple_oneshot.rs - 单次评估程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use url::Url;

use duanzuo::FromUrl;
use duanzuo::alarm::Alarm;
use duanzuo::geometry::Point2D;
use duanzuo::input::ImageFileInput;
use duanzuo::output::{MonitorSink, SaveImageFileOutput};
use duanzuo::posture::SlouchMonitor;
use duanzuo::task::{OneShotTask, Task};
use duanzuo::tracker::{FixedTracker, TrackedPair};

/// Duanzuo 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,

  /// 输出路径
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,

  /// 警报音频文件路径
  #[arg(long, value_name = "SOUND")]
  pub sound: PathBuf,

  /// 颈部跟踪点，格式 x,y
  #[arg(long, value_name = "POINT")]
  pub neck: Point2D,

  /// 髋部跟踪点，格式 x,y
  #[arg(long, value_name = "POINT")]
  pub hip: Point2D,

  /// 弯腰判定距离阈值
  #[arg(long, default_value = "40.0", value_name = "THRESHOLD")]
  pub threshold: f64,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let input = ImageFileInput::from_url(&args.input)?;
  let tracker = FixedTracker::new(TrackedPair {
    neck: args.neck,
    hip: args.hip,
  });

  // 警报音装载失败立即退出
  let alarm = Alarm::load(&args.sound)?;
  let sink = MonitorSink::new(SaveImageFileOutput::from_url(&args.output)?).with_alarm(alarm);

  OneShotTask::new(SlouchMonitor::new(args.threshold)).run_task(input, tracker, sink)?;

  Ok(())
}
