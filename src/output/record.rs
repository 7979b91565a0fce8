// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/output/record.rs - 姿态数据记录
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use url::Url;

use crate::input::Frame;
use crate::output::Render;
use crate::posture::Observation;
use crate::{FromUrl, FromUrlWithScheme};

const RECORD_HEADER: &str = "timestamp,distance,slouching";

#[derive(Error, Debug)]
pub enum PostureLogError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("路径解码错误: {0}")]
  PathDecode(#[from] std::string::FromUtf8Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 姿态数据 CSV 记录：每个评估周期追加一行
/// `timestamp,distance,slouching`，表头只在新建文件时写一次。
pub struct PostureLog {
  file: File,
  path: PathBuf,
}

impl PostureLog {
  pub fn create(path: &Path) -> Result<Self, PostureLogError> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let fresh = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if fresh {
      writeln!(file, "{}", RECORD_HEADER)?;
    }

    Ok(PostureLog {
      file,
      path: path.to_path_buf(),
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl FromUrlWithScheme for PostureLog {
  const SCHEME: &'static str = "record";
}

impl FromUrl for PostureLog {
  type Error = PostureLogError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(PostureLogError::SchemeMismatch);
    }
    let path = urlencoding::decode(url.path())?.into_owned();
    Self::create(Path::new(&path))
  }
}

impl Render for PostureLog {
  type Error = PostureLogError;

  fn render_result(
    &mut self,
    _frame: &Frame,
    observation: &Observation,
  ) -> Result<(), Self::Error> {
    writeln!(
      self.file,
      "{},{:.4},{}",
      Local::now().to_rfc3339(),
      observation.distance,
      observation.is_slouching()
    )?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posture::{Verdict, WarningTier};
  use std::time::Duration;

  fn observation(distance: f64) -> Observation {
    Observation {
      distance,
      verdict: Verdict::Upright,
    }
  }

  fn frame() -> Frame {
    Frame {
      image: image::RgbImage::new(2, 2),
      index: 0,
      timestamp_ms: 0,
    }
  }

  #[test]
  fn header_written_once_across_reopen() {
    let path = std::env::temp_dir().join("duanzuo_record_header.csv");
    let _ = std::fs::remove_file(&path);

    let mut log = PostureLog::create(&path).unwrap();
    log.render_result(&frame(), &observation(30.0)).unwrap();
    drop(log);

    let mut log = PostureLog::create(&path).unwrap();
    log.render_result(&frame(), &observation(50.0)).unwrap();
    drop(log);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], RECORD_HEADER);
    assert!(lines[1].ends_with(",30.0000,false"));
    assert!(lines[2].ends_with(",50.0000,false"));
  }

  #[test]
  fn slouching_flag_follows_verdict() {
    let path = std::env::temp_dir().join("duanzuo_record_flag.csv");
    let _ = std::fs::remove_file(&path);

    let mut log = PostureLog::create(&path).unwrap();
    let slouching = Observation {
      distance: 50.0,
      verdict: Verdict::Slouching {
        tier: WarningTier::None,
        elapsed: Duration::ZERO,
      },
    };
    log.render_result(&frame(), &slouching).unwrap();
    drop(log);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.lines().nth(1).unwrap().ends_with(",50.0000,true"));
  }

  #[test]
  fn rejects_other_schemes() {
    let url = Url::parse("image:///tmp/x.csv").unwrap();
    assert!(matches!(
      PostureLog::from_url(&url),
      Err(PostureLogError::SchemeMismatch)
    ));
  }
}
