// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/geometry.rs - 几何工具
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

use std::str::FromStr;

use thiserror::Error;

/// 无效输入的哨兵距离值。
///
/// 任一坐标为 NaN 时 [`distance`] 返回该值，而不是让 NaN
/// 沿比较链静默传播。距离结果恒为非负或恰好等于该哨兵值。
pub const INVALID_DISTANCE: f64 = -1.0;

/// 图像上被跟踪的关键点坐标。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
  pub x: f64,
  pub y: f64,
}

impl Point2D {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[derive(Error, Debug)]
pub enum PointParseError {
  #[error("坐标格式应为 x,y: {0}")]
  Format(String),
  #[error("坐标数值解析失败: {0}")]
  Number(#[from] std::num::ParseFloatError),
}

impl FromStr for Point2D {
  type Err = PointParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (x, y) = s
      .split_once(',')
      .ok_or_else(|| PointParseError::Format(s.to_string()))?;
    Ok(Point2D::new(x.trim().parse()?, y.trim().parse()?))
  }
}

/// 计算两点之间的欧几里得距离。
///
/// 任一坐标为 NaN 时返回 [`INVALID_DISTANCE`]。
pub fn distance(p1: Point2D, p2: Point2D) -> f64 {
  if p1.x.is_nan() || p1.y.is_nan() || p2.x.is_nan() || p2.y.is_nan() {
    return INVALID_DISTANCE;
  }
  ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}
