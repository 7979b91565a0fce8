// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/output/mod.rs - 输出模块
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod draw;
#[cfg(feature = "posture_record")]
mod record;
mod save_image_file;

pub use draw::Draw;
#[cfg(feature = "posture_record")]
pub use record::{PostureLog, PostureLogError};
pub use save_image_file::{SaveImageFileError, SaveImageFileOutput};

use thiserror::Error;

#[cfg(feature = "alarm")]
use crate::alarm::{Alarm, AlarmError};
use crate::input::Frame;
use crate::posture::Observation;
#[cfg(feature = "alarm")]
use crate::posture::{Verdict, WarningTier};

/// 渲染接缝：每个评估周期向输出端送一次观测值。
pub trait Render {
  type Error;

  fn render_result(&mut self, frame: &Frame, observation: &Observation)
  -> Result<(), Self::Error>;
}

#[derive(Error, Debug)]
pub enum MonitorSinkError {
  #[error("图像输出错误: {0}")]
  Image(#[from] SaveImageFileError),
  #[cfg(feature = "posture_record")]
  #[error("姿态记录错误: {0}")]
  Record(#[from] PostureLogError),
  #[cfg(feature = "alarm")]
  #[error("警报播放错误: {0}")]
  Alarm(#[from] AlarmError),
}

/// 监测输出组合：标注图像为主，按需挂接姿态记录与警报音。
pub struct MonitorSink {
  image: SaveImageFileOutput,
  #[cfg(feature = "posture_record")]
  record: Option<PostureLog>,
  #[cfg(feature = "alarm")]
  alarm: Option<Alarm>,
}

impl MonitorSink {
  pub fn new(image: SaveImageFileOutput) -> Self {
    Self {
      image,
      #[cfg(feature = "posture_record")]
      record: None,
      #[cfg(feature = "alarm")]
      alarm: None,
    }
  }

  #[cfg(feature = "posture_record")]
  pub fn with_record(mut self, record: PostureLog) -> Self {
    self.record = Some(record);
    self
  }

  #[cfg(feature = "alarm")]
  pub fn with_alarm(mut self, alarm: Alarm) -> Self {
    self.alarm = Some(alarm);
    self
  }
}

impl Render for MonitorSink {
  type Error = MonitorSinkError;

  fn render_result(
    &mut self,
    frame: &Frame,
    observation: &Observation,
  ) -> Result<(), Self::Error> {
    self.image.render_result(frame, observation)?;

    #[cfg(feature = "posture_record")]
    if let Some(record) = self.record.as_mut() {
      record.render_result(frame, observation)?;
    }

    #[cfg(feature = "alarm")]
    if let Some(alarm) = self.alarm.as_ref()
      && matches!(
        observation.verdict,
        Verdict::Slouching {
          tier: WarningTier::Severe,
          ..
        }
      )
    {
      alarm.play()?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::FromUrl;
  use crate::posture::Verdict;

  #[cfg(feature = "posture_record")]
  #[test]
  fn composite_sink_writes_image_and_record() {
    let dir = std::env::temp_dir().join("duanzuo_sink");
    let image_path = dir.join("annotated.png");
    let record_path = dir.join("posture.csv");
    let _ = std::fs::remove_file(&record_path);

    let image_url = url::Url::parse(&format!("image://{}", image_path.display())).unwrap();
    let record_url = url::Url::parse(&format!("record://{}", record_path.display())).unwrap();

    let mut sink = MonitorSink::new(SaveImageFileOutput::from_url(&image_url).unwrap())
      .with_record(PostureLog::from_url(&record_url).unwrap());

    let frame = Frame {
      image: image::RgbImage::from_pixel(16, 12, image::Rgb([0, 0, 0])),
      index: 0,
      timestamp_ms: 0,
    };
    sink
      .render_result(
        &frame,
        &Observation {
          distance: 30.0,
          verdict: Verdict::Upright,
        },
      )
      .unwrap();

    assert!(image_path.exists());
    let content = std::fs::read_to_string(&record_path).unwrap();
    assert_eq!(content.lines().count(), 2);
  }
}
