//! 配置校验模块
//!
//! 校验规则：
//! - sink name 唯一且非空
//! - estimator.window_size >= 1
//! - sink queue_capacity >= 1
//! - csv sink 的 flush_threshold 可解析且 >= 1

use std::collections::HashSet;

use contracts::{RecorderBlueprint, RecorderError, SinkType, PARAM_FLUSH_THRESHOLD};

/// 校验 RecorderBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RecorderBlueprint) -> Result<(), RecorderError> {
    validate_estimator(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

/// 校验采样率估计窗口
fn validate_estimator(blueprint: &RecorderBlueprint) -> Result<(), RecorderError> {
    if blueprint.estimator.window_size == 0 {
        return Err(RecorderError::config_validation(
            "estimator.window_size",
            "window_size must be >= 1",
        ));
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(blueprint: &RecorderBlueprint) -> Result<(), RecorderError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(RecorderError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(RecorderError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.queue_capacity == 0 {
            return Err(RecorderError::config_validation(
                format!("sinks[{}].queue_capacity", sink.name),
                "queue_capacity must be >= 1",
            ));
        }
        if sink.sink_type == SinkType::Csv {
            validate_flush_threshold(sink)?;
        }
    }
    Ok(())
}

/// 校验 csv sink 的批量写阈值
fn validate_flush_threshold(sink: &contracts::SinkConfig) -> Result<(), RecorderError> {
    let Some(raw) = sink.params.get(PARAM_FLUSH_THRESHOLD) else {
        return Ok(());
    };
    match raw.parse::<usize>() {
        Ok(0) => Err(RecorderError::config_validation(
            format!("sinks[{}].params.{PARAM_FLUSH_THRESHOLD}", sink.name),
            "flush_threshold must be >= 1",
        )),
        Ok(_) => Ok(()),
        Err(_) => Err(RecorderError::config_validation(
            format!("sinks[{}].params.{PARAM_FLUSH_THRESHOLD}", sink.name),
            format!("expected a positive integer, got '{raw}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, EstimatorConfig, RecorderConfig, SinkConfig, SinkType,
    };
    use std::collections::HashMap;

    fn minimal_blueprint() -> RecorderBlueprint {
        RecorderBlueprint {
            version: ConfigVersion::V1,
            recorder: RecorderConfig::default(),
            estimator: EstimatorConfig::default(),
            sinks: vec![SinkConfig {
                name: "csv".into(),
                sink_type: SinkType::Csv,
                queue_capacity: 100,
                params: HashMap::from([
                    ("output_dir".to_string(), "./recordings".to_string()),
                    (PARAM_FLUSH_THRESHOLD.to_string(), "300".to_string()),
                ]),
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_zero_window_size() {
        let mut bp = minimal_blueprint();
        bp.estimator.window_size = 0;
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("window_size"), "got: {err}");
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut bp = minimal_blueprint();
        bp.sinks.push(bp.sinks[0].clone());
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate sink name"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut bp = minimal_blueprint();
        bp.sinks[0].name = String::new();
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_zero_queue_capacity() {
        let mut bp = minimal_blueprint();
        bp.sinks[0].queue_capacity = 0;
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("queue_capacity"), "got: {err}");
    }

    #[test]
    fn test_unparseable_flush_threshold() {
        let mut bp = minimal_blueprint();
        bp.sinks[0]
            .params
            .insert(PARAM_FLUSH_THRESHOLD.to_string(), "lots".to_string());
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("positive integer"), "got: {err}");
    }

    #[test]
    fn test_zero_flush_threshold() {
        let mut bp = minimal_blueprint();
        bp.sinks[0]
            .params
            .insert(PARAM_FLUSH_THRESHOLD.to_string(), "0".to_string());
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_missing_flush_threshold_is_fine() {
        let mut bp = minimal_blueprint();
        bp.sinks[0].params.remove(PARAM_FLUSH_THRESHOLD);
        assert!(validate(&bp).is_ok());
    }
}
