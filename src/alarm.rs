// 该文件是 Duanzuo （端坐） 项目的一部分。
// src/alarm.rs - 警报音频
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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Source};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AlarmError {
  #[error("无法读取音频文件: {0}")]
  IoError(#[from] std::io::Error),
  #[error("无法解码音频文件: {0}")]
  DecodeError(#[from] rodio::decoder::DecoderError),
  #[error("无法打开音频设备: {0}")]
  StreamError(#[from] rodio::StreamError),
  #[error("音频播放失败: {0}")]
  PlayError(#[from] rodio::PlayError),
}

/// 警报音协作方：启动时装载一次采样，严重警告时触发播放。
///
/// 采样装载失败是致命错误，监测不会在没有警报音的情况下启动。
pub struct Alarm {
  // 输出流存活期间音频设备才保持打开
  _stream: OutputStream,
  handle: OutputStreamHandle,
  sample: Buffered<Decoder<BufReader<File>>>,
}

impl std::fmt::Debug for Alarm {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Alarm").finish_non_exhaustive()
  }
}

impl Alarm {
  /// 装载警报音采样并打开默认音频设备。
  ///
  /// 先读文件再开设备，文件缺失的报错不依赖音频环境。
  pub fn load(path: &Path) -> Result<Self, AlarmError> {
    let file = File::open(path)?;
    let sample = Decoder::new(BufReader::new(file))?.buffered();

    let (stream, handle) = OutputStream::try_default()?;
    info!("警报音已装载: {}", path.display());

    Ok(Alarm {
      _stream: stream,
      handle,
      sample,
    })
  }

  /// 触发一次播放，立即返回。
  pub fn play(&self) -> Result<(), AlarmError> {
    self
      .handle
      .play_raw(self.sample.clone().convert_samples())?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_sample_is_io_error() {
    let err = Alarm::load(Path::new("/no/such/duanzuo-warning.wav")).unwrap_err();
    assert!(matches!(err, AlarmError::IoError(_)));
  }
}
