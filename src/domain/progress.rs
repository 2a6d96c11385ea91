// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use tokio::sync::mpsc;

/// 进度事件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// 百分比 (0-100)
    pub percent: f64,
    /// 说明文字
    pub message: String,
}

/// 进度观察者
///
/// 抓取与写入过程中的里程碑通过它上报，仅作提示用途。
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, event: ProgressEvent);

    fn report(&self, percent: f64, message: &str) {
        self.on_progress(ProgressEvent {
            percent: percent.clamp(0.0, 100.0),
            message: message.to_string(),
        });
    }
}

/// 丢弃所有事件
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _event: ProgressEvent) {}
}

/// 将 0-100 的进度映射到 `[start, end]` 子区间
///
/// 抓取与写入各占进度条的一段，百分比换算只在这里做。
pub struct ScaledProgress<'a> {
    inner: &'a dyn ProgressObserver,
    start: f64,
    end: f64,
}

impl<'a> ScaledProgress<'a> {
    pub fn new(inner: &'a dyn ProgressObserver, start: f64, end: f64) -> Self {
        Self { inner, start, end }
    }

    fn scale(&self, percent: f64) -> f64 {
        self.start + percent.clamp(0.0, 100.0) / 100.0 * (self.end - self.start)
    }
}

impl ProgressObserver for ScaledProgress<'_> {
    fn on_progress(&self, event: ProgressEvent) {
        self.inner.on_progress(ProgressEvent {
            percent: self.scale(event.percent),
            message: event.message,
        });
    }
}

/// 通过通道转发进度事件
pub struct ChannelProgress {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    /// 创建观察者及其接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressObserver for ChannelProgress {
    fn on_progress(&self, event: ProgressEvent) {
        // 接收端已关闭时直接丢弃
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_progress_maps_into_sub_range() {
        let (observer, mut rx) = ChannelProgress::channel();
        let scaled = ScaledProgress::new(&observer, 70.0, 100.0);

        scaled.report(0.0, "start");
        scaled.report(50.0, "half");
        scaled.report(100.0, "done");
        scaled.report(150.0, "overflow");

        let percents: Vec<f64> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.percent)
            .collect();
        assert_eq!(percents, vec![70.0, 85.0, 100.0, 100.0]);
    }

    #[test]
    fn test_nested_scaling() {
        let (observer, mut rx) = ChannelProgress::channel();
        let outer = ScaledProgress::new(&observer, 0.0, 60.0);
        let inner = ScaledProgress::new(&outer, 50.0, 100.0);

        inner.report(0.0, "x");
        assert_eq!(rx.try_recv().unwrap().percent, 30.0);
    }
}
