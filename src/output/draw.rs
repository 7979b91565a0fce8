// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/output/draw.rs - 监测结果可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::posture::{Observation, Verdict, WarningTier};

// 边框与文字常量
const BORDER_THICKNESS: u32 = 10;
const TEXT_SCALE: f32 = 24.0;
const TEXT_X: i32 = 10;
const DISTANCE_TEXT_Y: i32 = 30;
const ADVISORY_TEXT_Y: i32 = 60;
const ADVISORY_LINE_STEP: i32 = 30;

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 严重警告时叠加的提示文字
const ADVISORY_LINES: [&str; 3] = [
  "Try to develop postural awareness",
  "Adjust your desk, chair and",
  "computer screen",
];

/// 帧标注工具：边框、提示文字与距离读数。
pub struct Draw {
  font: FontArc,
  text_scale: PxScale,
  border_thickness: u32,
}

impl Default for Draw {
  fn default() -> Self {
    // 使用内置的默认字体数据
    let font_data = include_bytes!("../../assets/DejaVuSans.ttf");
    let font = FontArc::try_from_slice(font_data).expect("无法加载字体");

    Self {
      font,
      text_scale: PxScale::from(TEXT_SCALE),
      border_thickness: BORDER_THICKNESS,
    }
  }
}

impl Draw {
  /// 按本周期的判定结果标注一帧图像。
  ///
  /// 端正画绿框；轻度警告画黄框；严重警告画红框并叠加提示文字；
  /// 事件刚开始或输入无效时不改变画面。距离读数每帧都画。
  pub fn annotate(&self, image: &mut RgbImage, observation: &Observation) {
    match observation.verdict {
      Verdict::Upright => self.draw_border(image, GREEN),
      Verdict::InvalidInput => {}
      Verdict::Slouching { tier, .. } => match tier {
        WarningTier::None => {}
        WarningTier::Mild => self.draw_border(image, YELLOW),
        WarningTier::Severe => {
          self.draw_border(image, RED);
          self.draw_advisory(image);
        }
      },
    }

    self.draw_distance(image, observation.distance);
  }

  // 沿图像四边画一圈指定厚度的边框
  fn draw_border(&self, image: &mut RgbImage, color: Rgb<u8>) {
    let (width, height) = image.dimensions();

    for t in 0..self.border_thickness {
      if width <= 2 * t || height <= 2 * t {
        break;
      }
      let rect = Rect::at(t as i32, t as i32).of_size(width - 2 * t, height - 2 * t);
      draw_hollow_rect_mut(image, rect, color);
    }
  }

  fn draw_advisory(&self, image: &mut RgbImage) {
    for (i, line) in ADVISORY_LINES.iter().enumerate() {
      draw_text_mut(
        image,
        RED,
        TEXT_X,
        ADVISORY_TEXT_Y + ADVISORY_LINE_STEP * i as i32,
        self.text_scale,
        &self.font,
        line,
      );
    }
  }

  fn draw_distance(&self, image: &mut RgbImage, distance: f64) {
    let label = format!("Distance: {:.2}", distance);
    draw_text_mut(
      image,
      WHITE,
      TEXT_X,
      DISTANCE_TEXT_Y,
      self.text_scale,
      &self.font,
      &label,
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  fn observation(verdict: Verdict) -> Observation {
    Observation {
      distance: 50.0,
      verdict,
    }
  }

  fn slouching(tier: WarningTier, secs: u64) -> Verdict {
    Verdict::Slouching {
      tier,
      elapsed: Duration::from_secs(secs),
    }
  }

  #[test]
  fn upright_paints_green_border() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(64, 48, Rgb([0, 0, 0]));
    draw.annotate(&mut image, &observation(Verdict::Upright));

    assert_eq!(*image.get_pixel(0, 0), GREEN);
    assert_eq!(*image.get_pixel(63, 47), GREEN);
    assert_eq!(*image.get_pixel(5, 24), GREEN);
    // 边框以内不着色
    assert_eq!(*image.get_pixel(32, 20), Rgb([0, 0, 0]));
  }

  #[test]
  fn mild_paints_yellow_border() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(64, 48, Rgb([0, 0, 0]));
    draw.annotate(&mut image, &observation(slouching(WarningTier::Mild, 61)));

    assert_eq!(*image.get_pixel(0, 0), YELLOW);
    assert_eq!(*image.get_pixel(63, 47), YELLOW);
  }

  #[test]
  fn severe_paints_red_border_and_advisory() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(640, 480, Rgb([0, 0, 0]));
    draw.annotate(&mut image, &observation(slouching(WarningTier::Severe, 121)));

    assert_eq!(*image.get_pixel(0, 0), RED);
    // 提示文字区域必须有红色落笔
    let has_ink = (60..150).any(|y| (10..630).any(|x| image.get_pixel(x, y)[0] > 0));
    assert!(has_ink);
  }

  #[test]
  fn episode_start_leaves_border_untouched() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(64, 48, Rgb([0, 0, 0]));
    draw.annotate(&mut image, &observation(slouching(WarningTier::None, 0)));

    assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
    assert_eq!(*image.get_pixel(63, 47), Rgb([0, 0, 0]));
  }

  #[test]
  fn invalid_input_leaves_border_untouched() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(64, 48, Rgb([0, 0, 0]));
    draw.annotate(
      &mut image,
      &Observation {
        distance: -1.0,
        verdict: Verdict::InvalidInput,
      },
    );

    assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
  }

  #[test]
  fn distance_readout_is_always_drawn() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(320, 240, Rgb([0, 0, 0]));
    draw.annotate(&mut image, &observation(slouching(WarningTier::None, 0)));

    // 读数区域出现白色像素
    let has_ink = (30..60).any(|y| (10..300).any(|x| image.get_pixel(x, y)[0] > 0));
    assert!(has_ink);
  }

  #[test]
  fn tiny_images_do_not_panic() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(4, 3, Rgb([0, 0, 0]));
    draw.annotate(&mut image, &observation(Verdict::Upright));
    draw.annotate(&mut image, &observation(slouching(WarningTier::Severe, 121)));
  }
}
