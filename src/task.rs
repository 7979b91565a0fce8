// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/task.rs - 监测任务
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::geometry;
use crate::input::Frame;
use crate::output::Render;
use crate::posture::{Observation, SlouchMonitor, SlouchState};
use crate::tracker::Tracker;

pub trait Task<I, T, O>: Sized {
  type Error;
  fn run_task(self, input: I, tracker: T, output: O) -> Result<(), Self::Error>;
}

/// 单次评估任务：取一帧，评估一次，渲染后结束。
///
/// 新进程没有历史状态，单次评估只会得到端正或事件开始两种结果。
pub struct OneShotTask {
  monitor: SlouchMonitor,
}

impl OneShotTask {
  pub fn new(monitor: SlouchMonitor) -> Self {
    Self { monitor }
  }
}

impl<
  FE: std::error::Error + Sync + Send + 'static,
  TE: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<Frame, FE>>,
  T: Tracker<Error = TE>,
  O: Render<Error = RE>,
> Task<I, T, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, mut tracker: T, mut output: O) -> Result<(), Self::Error> {
    info!("开始评估...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入帧"))??;

    let pair = tracker.track(&frame)?;
    let distance = geometry::distance(pair.neck, pair.hip);
    let (_, verdict) = self
      .monitor
      .evaluate(SlouchState::default(), distance, Instant::now());
    info!("距离: {:.2}, 判定: {:?}", distance, verdict);

    output.render_result(&frame, &Observation { distance, verdict })?;
    info!("渲染完成");

    Ok(())
  }
}

/// 连续监测任务：逐帧评估并在帧间传递弯腰状态，
/// Ctrl-C 取消，超过宽限期强制退出。
#[derive(Debug)]
pub struct ContinuousTask {
  monitor: SlouchMonitor,
  frame_number: Option<usize>,
}

impl ContinuousTask {
  pub fn new(monitor: SlouchMonitor) -> Self {
    Self {
      monitor,
      frame_number: None,
    }
  }

  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }
}

impl<
  FE: std::error::Error + Sync + Send + 'static,
  TE: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<Frame, FE>>,
  T: Tracker<Error = TE>,
  O: Render<Error = RE>,
> Task<I, T, O> for ContinuousTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut tracker: T, mut output: O) -> Result<(), Self::Error> {
    info!("开始监测...");
    let (tx, rx) = mpsc::channel();

    ctrlc::set_handler(move || {
      info!("收到中断信号，准备退出...");
      let _ = tx.send(());
      thread::spawn(|| {
        thread::sleep(Duration::from_secs(30));
        warn!("强制退出程序");
        std::process::exit(1);
      });
    })
    .expect("Error setting Ctrl-C handler");

    let mut state = SlouchState::default();
    let mut frame_index = 0;

    for frame in input {
      let frame = frame?;
      frame_index = (frame_index + 1) % usize::MAX;

      let now = Instant::now();
      let pair = tracker.track(&frame)?;
      let distance = geometry::distance(pair.neck, pair.hip);
      let (next, verdict) = self.monitor.evaluate(state, distance, Instant::now());
      state = next;
      info!(
        "处理第 {} 帧图像，距离: {:.2}, 判定: {:?}",
        frame_index, distance, verdict
      );

      output.render_result(&frame, &Observation { distance, verdict })?;
      info!("周期完成，耗时: {:.2?}", now.elapsed());

      if self.frame_number.map(|n| frame_index >= n).unwrap_or(false) {
        info!("达到指定帧数 {}, 退出监测循环", frame_index);
        break;
      }
      if rx.try_recv().is_ok() {
        warn!("中断信号接收，退出监测循环");
        break;
      }
    }

    info!("监测结束，退出");
    Ok(())
  }
}
