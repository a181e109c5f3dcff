//! 录制管线指标收集模块
//!
//! 收集合并样本、采样率估计与落盘的运行指标。

use contracts::SensorKind;
use metrics::{counter, gauge, histogram};

/// 记录收到一条传感器事件
pub fn record_event_received(kind: SensorKind) {
    counter!(
        "imu_recorder_events_received_total",
        "sensor" => kind.to_string()
    )
    .increment(1);
}

/// 记录产出一条六轴合并样本
pub fn record_sample_emitted() {
    counter!("imu_recorder_samples_total").increment(1);
}

/// 记录当前估计采样率 (Hz)
pub fn record_rate_hz(hz: f64) {
    gauge!("imu_recorder_rate_hz").set(hz);
    if hz > 0.0 {
        histogram!("imu_recorder_rate_hz_hist").record(hz);
    }
}

/// 记录样本分发结果
pub fn record_sample_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "dropped" };
    counter!(
        "imu_recorder_samples_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录一次 CSV 批量落盘
pub fn record_csv_flush(sink_name: &str, lines: usize) {
    counter!(
        "imu_recorder_csv_flushes_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
    counter!(
        "imu_recorder_csv_lines_total",
        "sink" => sink_name.to_string()
    )
    .increment(lines as u64);
    histogram!("imu_recorder_csv_flush_lines").record(lines as f64);
}

/// 记录 sink 队列深度
pub fn record_sink_queue_depth(sink_name: &str, depth: usize) {
    gauge!(
        "imu_recorder_sink_queue_depth",
        "sink" => sink_name.to_string()
    )
    .set(depth as f64);
}

/// 采样率统计聚合器
///
/// 在内存中聚合估计采样率，便于录制结束时输出摘要。
#[derive(Debug, Clone, Default)]
pub struct RateStatsAggregator {
    /// 总样本数
    pub total_samples: u64,

    /// 采样率统计 (排除冷启动的 0 值)
    pub rate_stats: RunningStats,
}

impl RateStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    ///
    /// 估计器冷启动阶段返回 0.0，不计入统计。
    pub fn update(&mut self, rate_hz: f64) {
        self.total_samples += 1;
        if rate_hz > 0.0 {
            self.rate_stats.push(rate_hz);
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> RateSummary {
        RateSummary {
            total_samples: self.total_samples,
            rate_hz: StatsSummary::from(&self.rate_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 采样率摘要
#[derive(Debug, Clone, Default)]
pub struct RateSummary {
    pub total_samples: u64,
    pub rate_hz: StatsSummary,
}

impl std::fmt::Display for RateSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Recording Summary ===")?;
        writeln!(f, "Total samples: {}", self.total_samples)?;
        writeln!(f, "Estimated rate (Hz): {}", self.rate_hz)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
