// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/input/image_file.rs - 图像文件输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::time::{Duration, Instant};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

use crate::input::Frame;
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI scheme mismatch")]
  SchemeMismatch,
  #[error("路径解码错误: {0}")]
  PathDecode(#[from] std::string::FromUtf8Error),
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 图像文件输入源。
///
/// `image:///path/to/snapshot.jpg` 读取一帧后结束；附加 `?poll=<毫秒>`
/// 时按周期重新解码同一路径，把外部进程刷新的快照文件变成帧流。
/// 打开或解码失败在构造时报错，不会静默产出空白帧。
pub struct ImageFileInput {
  path: String,
  poll: Option<Duration>,
  pending: Option<RgbImage>,
  index: u64,
  started: Instant,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemeMismatch);
    }

    let path = urlencoding::decode(url.path())?.into_owned();

    let mut poll = None;
    for (k, v) in url.query_pairs() {
      if k == "poll" {
        match v.parse::<u64>() {
          Ok(ms) => poll = Some(Duration::from_millis(ms)),
          Err(_) => warn!("无法解析 poll 参数: {}, 按单帧输入处理", v),
        }
        break;
      }
    }

    let image = Self::read(&path)?;

    Ok(ImageFileInput {
      path,
      poll,
      pending: Some(image),
      index: 0,
      started: Instant::now(),
    })
  }
}

impl ImageFileInput {
  fn read(path: &str) -> Result<RgbImage, ImageFileInputError> {
    Ok(ImageReader::open(path)?.decode()?.to_rgb8())
  }

  fn frame(&mut self, image: RgbImage) -> Frame {
    let frame = Frame {
      image,
      index: self.index,
      timestamp_ms: self.started.elapsed().as_millis() as u64,
    };
    self.index += 1;
    frame
  }
}

impl Iterator for ImageFileInput {
  type Item = Result<Frame, ImageFileInputError>;

  fn next(&mut self) -> Option<Self::Item> {
    if let Some(image) = self.pending.take() {
      return Some(Ok(self.frame(image)));
    }

    let poll = self.poll?;
    std::thread::sleep(poll);

    match Self::read(&self.path) {
      Ok(image) => Some(Ok(self.frame(image))),
      Err(err) => {
        error!("重新读取图像失败: {}", err);
        Some(Err(err))
      }
    }
  }
}
