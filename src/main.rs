// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use url::Url;

use duanzuo::FromUrl;
use duanzuo::alarm::Alarm;
use duanzuo::geometry::Point2D;
use duanzuo::input::ImageFileInput;
use duanzuo::output::{MonitorSink, PostureLog, SaveImageFileOutput};
use duanzuo::posture::SlouchMonitor;
use duanzuo::task::{ContinuousTask, Task};
use duanzuo::tracker::{FixedTracker, TrackedPair};

/// Duanzuo 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源（image:///path/to/snapshot.jpg?poll=1000）
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,

  /// 输出路径（image:///path/to/annotated.jpg）
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,

  /// 警报音频文件路径
  #[arg(long, value_name = "SOUND")]
  pub sound: PathBuf,

  /// 姿态记录（record:///path/to/posture.csv）
  #[arg(long, value_name = "RECORD")]
  pub record: Option<Url>,

  /// 颈部跟踪点，格式 x,y
  #[arg(long, value_name = "POINT")]
  pub neck: Point2D,

  /// 髋部跟踪点，格式 x,y
  #[arg(long, value_name = "POINT")]
  pub hip: Point2D,

  /// 弯腰判定距离阈值
  #[arg(long, default_value = "40.0", value_name = "THRESHOLD")]
  pub threshold: f64,

  /// 轻度警告时间（秒）
  #[arg(long, default_value = "60", value_name = "SECS")]
  pub warn_secs: u64,

  /// 严重警告时间（秒）
  #[arg(long, default_value = "120", value_name = "SECS")]
  pub alert_secs: u64,

  /// 最大处理帧数
  #[arg(long, value_name = "FRAME_NUMBER")]
  pub frame_number: Option<usize>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);
  info!("警报音频: {}", args.sound.display());
  info!("距离阈值: {}", args.threshold);

  let input = ImageFileInput::from_url(&args.input)?;
  let tracker = FixedTracker::new(TrackedPair {
    neck: args.neck,
    hip: args.hip,
  });

  // 警报音装载失败立即退出
  let alarm = Alarm::load(&args.sound)?;

  let mut sink = MonitorSink::new(SaveImageFileOutput::from_url(&args.output)?).with_alarm(alarm);
  if let Some(record) = &args.record {
    sink = sink.with_record(PostureLog::from_url(record)?);
  }

  let monitor = SlouchMonitor::new(args.threshold).with_escalation(
    Duration::from_secs(args.warn_secs),
    Duration::from_secs(args.alert_secs),
  );

  ContinuousTask::new(monitor)
    .with_frame_number(args.frame_number)
    .run_task(input, tracker, sink)?;

  Ok(())
}
