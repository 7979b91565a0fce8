// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/posture.rs - 弯腰判定与警告升级
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

use std::time::{Duration, Instant};

use tracing::debug;

/// 判断是否处于弯腰状态。
///
/// 严格大于：距离等于阈值不算弯腰。
pub fn is_slouching(distance: f64, threshold: f64) -> bool {
  distance > threshold
}

/// 警告级别，由当前弯腰事件的持续时间导出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningTier {
  /// 未达到警告时间，不改变画面
  None,
  /// 超过轻度警告时间，黄色边框
  Mild,
  /// 超过严重警告时间，红色边框、提示文字与警报音
  Severe,
}

/// 弯腰事件状态。`started_at` 为 `None` 表示当前没有弯腰事件。
///
/// 进入弯腰的瞬间记录一次起始时间，事件持续期间不再改写；
/// 距离一旦回落到阈值以内立即清零。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlouchState {
  started_at: Option<Instant>,
}

impl SlouchState {
  pub fn started_at(&self) -> Option<Instant> {
    self.started_at
  }
}

/// 单个评估周期的判定结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  /// 坐姿端正，绿色边框
  Upright,
  /// 几何输入无效（哨兵距离），保持原状态，不做任何渲染
  InvalidInput,
  /// 正在弯腰，`tier` 为本周期导出的警告级别
  Slouching { tier: WarningTier, elapsed: Duration },
}

/// 每个评估周期送往输出端的观测值。
#[derive(Debug, Clone, Copy)]
pub struct Observation {
  pub distance: f64,
  pub verdict: Verdict,
}

impl Observation {
  /// 本周期是否判定为弯腰（无效输入视为否）。
  pub fn is_slouching(&self) -> bool {
    matches!(self.verdict, Verdict::Slouching { .. })
  }
}

/// 默认轻度警告时间
pub const DEFAULT_WARN_AFTER: Duration = Duration::from_secs(60);
/// 默认严重警告时间
pub const DEFAULT_ALERT_AFTER: Duration = Duration::from_secs(120);

/// 弯腰监测器：距离阈值与升级时间配置。
///
/// [`SlouchMonitor::evaluate`] 是纯转移函数：传入旧状态，返回新状态
/// 与本周期的判定，计时状态不藏在任何全局变量里。
#[derive(Debug, Clone, Copy)]
pub struct SlouchMonitor {
  threshold: f64,
  warn_after: Duration,
  alert_after: Duration,
}

impl SlouchMonitor {
  pub fn new(threshold: f64) -> Self {
    Self {
      threshold,
      warn_after: DEFAULT_WARN_AFTER,
      alert_after: DEFAULT_ALERT_AFTER,
    }
  }

  pub fn with_escalation(mut self, warn_after: Duration, alert_after: Duration) -> Self {
    self.warn_after = warn_after;
    self.alert_after = alert_after;
    self
  }

  pub fn threshold(&self) -> f64 {
    self.threshold
  }

  /// 执行一个评估周期。
  pub fn evaluate(
    &self,
    state: SlouchState,
    distance: f64,
    now: Instant,
  ) -> (SlouchState, Verdict) {
    // 距离恒为非负，负值只能是哨兵
    if distance < 0.0 {
      debug!("几何输入无效，保持当前状态");
      return (state, Verdict::InvalidInput);
    }

    if !is_slouching(distance, self.threshold) {
      return (SlouchState::default(), Verdict::Upright);
    }

    match state.started_at {
      None => (
        SlouchState {
          started_at: Some(now),
        },
        Verdict::Slouching {
          tier: WarningTier::None,
          elapsed: Duration::ZERO,
        },
      ),
      Some(started_at) => {
        let elapsed = now.saturating_duration_since(started_at);
        // 严格大于；严重级别嵌套在轻度级别之内，保证单调升级
        let tier = if elapsed > self.warn_after {
          if elapsed > self.alert_after {
            WarningTier::Severe
          } else {
            WarningTier::Mild
          }
        } else {
          WarningTier::None
        };
        (state, Verdict::Slouching { tier, elapsed })
      }
    }
  }
}
