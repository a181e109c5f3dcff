//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（无需真实传感器）
//! - 配置到管线的贯通验证

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_rate_presets_match_period_hints() {
        use contracts::RatePreset;

        assert_eq!(RatePreset::Hz50.period_us(), 20_000);
        assert_eq!(RatePreset::Hz100.period_us(), 10_000);
        assert_eq!(RatePreset::default(), RatePreset::Hz100);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use acquisition::{MockImuSource, SensorStreamMerger};
    use contracts::{ImuSample, RatePreset, SinkConfig, SinkType, PARAM_OUTPUT_DIR};
    use dispatcher::{create_dispatcher, CSV_HEADER};
    use estimator::SampleRateEstimator;
    use tokio::sync::mpsc;

    fn mock_merger() -> SensorStreamMerger {
        SensorStreamMerger::new(
            Some(Box::new(MockImuSource::accelerometer())),
            Some(Box::new(MockImuSource::gyroscope())),
        )
    }

    /// End-to-end test: MockImuSource pair -> SensorStreamMerger ->
    /// SampleRateEstimator -> Dispatcher with a csv sink
    ///
    /// 验证完整的数据流：
    /// 1. 两个 MockImuSource 生成加速度计/陀螺仪事件
    /// 2. SensorStreamMerger 合并为六轴样本
    /// 3. 估计采样率并将样本落盘为 CSV
    #[tokio::test]
    async fn test_e2e_mock_recording() {
        let dir = tempfile::tempdir().unwrap();

        // Create dispatcher with a csv sink flushing on shutdown only
        let (sample_tx, sample_rx) = mpsc::channel::<ImuSample>(256);
        let sink_configs = vec![SinkConfig {
            name: "csv".to_string(),
            sink_type: SinkType::Csv,
            queue_capacity: 256,
            params: HashMap::from([
                (
                    PARAM_OUTPUT_DIR.to_string(),
                    dir.path().to_string_lossy().into_owned(),
                ),
                ("flush_threshold".to_string(), "10000".to_string()),
            ]),
        }];

        let dispatcher = create_dispatcher(sink_configs, sample_rx).unwrap();
        let output_files = dispatcher.output_files().to_vec();
        assert_eq!(output_files.len(), 1);
        let dispatcher_handle = dispatcher.spawn();

        // Start recording from the mock pair
        let merger = mock_merger();
        let (forward_tx, mut forward_rx) = mpsc::channel::<ImuSample>(256);

        merger
            .start(
                RatePreset::Hz100,
                Arc::new(move |sample| {
                    let _ = forward_tx.try_send(sample);
                }),
            )
            .unwrap();

        // Drain merged samples through the estimator into the dispatcher
        let pipeline = tokio::spawn(async move {
            let mut estimator = SampleRateEstimator::new(20);
            let mut last_rate = 0.0;
            let mut recorded = 0u64;

            while let Some(sample) = forward_rx.recv().await {
                last_rate = estimator.on_sample(sample.t_ns);
                if sample_tx.send(sample).await.is_err() {
                    break;
                }
                recorded += 1;
                if recorded >= 30 {
                    break;
                }
            }
            (recorded, last_rate)
        });

        let result = tokio::time::timeout(Duration::from_secs(5), pipeline).await;

        merger.stop();
        assert!(!merger.is_recording());

        // Pipeline task dropped its sender; dispatcher drains and closes
        let _ = tokio::time::timeout(Duration::from_secs(2), dispatcher_handle).await;

        let (recorded, last_rate) = result.expect("pipeline timed out").unwrap();
        assert_eq!(recorded, 30);
        // The mock pair honors the 100 Hz period hint loosely; the
        // estimate just has to be in a sane band once warmed up
        assert!(
            last_rate > 10.0 && last_rate < 1000.0,
            "estimated rate out of band: {last_rate}"
        );

        // Every recorded sample reached the file, plus the header
        let content = std::fs::read_to_string(&output_files[0]).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 31);
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 7);
        }
    }

    /// 验证合并器生命周期：start 拒绝二次启动，stop 后可重启
    #[tokio::test]
    async fn test_merger_restart_cycle() {
        let merger = mock_merger();
        let noop: acquisition::SampleCallback = Arc::new(|_sample| {});

        merger.start(RatePreset::Hz50, noop.clone()).unwrap();
        assert!(merger.is_recording());
        assert!(merger.start(RatePreset::Hz50, noop.clone()).is_err());

        merger.stop();
        assert!(!merger.is_recording());

        // A fresh session starts cleanly after stop
        merger.start(RatePreset::Hz100, noop).unwrap();
        merger.stop();
    }

    /// 配置文件 -> Dispatcher 贯通：配置中的 csv sink 参数生效
    #[tokio::test]
    async fn test_config_to_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
[recorder]
rate = "hz50"

[[sinks]]
name = "csv"
sink_type = "csv"
queue_capacity = 32
[sinks.params]
output_dir = "{}"
flush_threshold = "2"
"#,
            dir.path().display()
        );

        let blueprint =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();
        assert_eq!(blueprint.recorder.rate, RatePreset::Hz50);

        let (tx, rx) = mpsc::channel::<ImuSample>(32);
        let dispatcher = create_dispatcher(blueprint.sinks.clone(), rx).unwrap();
        let output = dispatcher.output_files().to_vec();
        let handle = dispatcher.spawn();

        for i in 0..4 {
            let sample = ImuSample::from_axes(
                i * 20_000_000,
                [0.0, 0.0, 9.81],
                [0.0, 0.0, 0.0],
            );
            tx.send(sample).await.unwrap();
        }
        drop(tx);
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;

        let content = std::fs::read_to_string(&output[0]).unwrap();
        assert_eq!(content.lines().count(), 5);
    }
}
