//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 분석 설정
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 분석 엔진 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsSettings {
    /// 자산 곡선 계산용 초기 잔고 (사용자 지정)
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,
    /// 승률 시계열 집계 단위 (daily, weekly, monthly, quarterly, yearly)
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    /// 인사이트 생성에 필요한 최소 청산 거래 수
    #[serde(default = "default_min_insight_trades")]
    pub min_insight_trades: usize,
    /// 리포트 캐시 최대 보관 수
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_initial_balance() -> Decimal {
    Decimal::new(10_000, 0)
}
fn default_timeframe() -> String {
    "daily".to_string()
}
fn default_min_insight_trades() -> usize {
    5
}
fn default_cache_capacity() -> usize {
    32
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            timeframe: default_timeframe(),
            min_insight_trades: default_min_insight_trades(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("analytics.initial_balance", "10000")?
            .set_default("analytics.timeframe", "daily")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("JOURNAL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
