// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/output/save_image_file.rs - 保存标注图像
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

use std::path::Path;

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::input::Frame;
use crate::output::{Draw, Render};
use crate::posture::Observation;
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("路径解码错误: {0}")]
  PathDecode(#[from] std::string::FromUtf8Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
}

/// 标注图像输出：把每帧的判定结果画到图像副本上并保存。
pub struct SaveImageFileOutput {
  path: String,
  draw: Draw,
}

impl FromUrlWithScheme for SaveImageFileOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(SaveImageFileOutput {
      path: urlencoding::decode(uri.path())?.into_owned(),
      draw: Draw::default(),
    })
  }
}

impl Render for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(
    &mut self,
    frame: &Frame,
    observation: &Observation,
  ) -> Result<(), Self::Error> {
    if let Some(parent) = Path::new(&self.path).parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let mut image = frame.image.clone();
    self.draw.annotate(&mut image, observation);
    image.save(&self.path)?;

    warn!("保存图像到文件: {}", self.path);

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posture::Verdict;

  #[test]
  fn rejects_other_schemes() {
    let url = Url::parse("folder:///tmp/out.png").unwrap();
    assert!(matches!(
      SaveImageFileOutput::from_url(&url),
      Err(SaveImageFileError::SchemeMismatch(_))
    ));
  }

  #[test]
  fn saves_annotated_copy() {
    let path = std::env::temp_dir().join("duanzuo_save_output/annotated.png");
    let url = Url::parse(&format!("image://{}", path.display())).unwrap();
    let mut output = SaveImageFileOutput::from_url(&url).unwrap();

    let frame = Frame {
      image: image::RgbImage::from_pixel(32, 24, image::Rgb([0, 0, 0])),
      index: 0,
      timestamp_ms: 0,
    };
    let observation = Observation {
      distance: 30.0,
      verdict: Verdict::Upright,
    };
    output.render_result(&frame, &observation).unwrap();

    let saved = image::ImageReader::open(&path)
      .unwrap()
      .decode()
      .unwrap()
      .to_rgb8();
    assert_eq!(saved.dimensions(), (32, 24));
    assert_eq!(*saved.get_pixel(0, 0), image::Rgb([0, 255, 0]));
    // 原始帧不被修改
    assert_eq!(*frame.image.get_pixel(0, 0), image::Rgb([0, 0, 0]));
  }
}
