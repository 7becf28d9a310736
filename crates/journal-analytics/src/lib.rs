//! # Journal Analytics
//!
//! 트레이딩 저널 대시보드의 분석 집계 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 그룹화 및 축약 (감정/종목/활동/실수 분류별)
//! - 잔고 곡선 및 Drawdown 계산
//! - MFE/MAE 과잉변동 분석
//! - 손익비 분포
//! - 승률 시계열
//! - 감정-성과 상관 분석
//! - 인사이트 텍스트 생성
//! - 리포트 메모이제이션 캐시
//!
//! 계산은 전부 동기·단일 패스·무부수효과이며, 호출자가 공급한 읽기
//! 전용 스냅샷 위에서만 동작합니다. 진입점은
//! [`report::generate_analytics`]입니다.

pub mod cache;
pub mod emotion;
pub mod equity;
pub mod excursion;
pub mod grouping;
pub mod insights;
pub mod report;
pub mod risk_reward;
pub mod timeseries;

// Grouping 모듈 re-exports
pub use grouping::{
    by_activity, by_mistake, by_symbol, flatten_trades, group_trades, rank_by_net_pnl,
    rank_mistakes, Group, TradeCtx, MOVING_STOP_LOSS, REVENGE_TRADING,
};

// Equity 모듈 re-exports
pub use equity::{BalanceCurve, BalancePoint, TimeFrame};

// Excursion 모듈 re-exports
pub use excursion::{analyze_excursions, trade_excursion, ExcursionSummary, TradeExcursion};

// Risk:Reward 모듈 re-exports
pub use risk_reward::{
    risk_reward_distribution, risk_reward_ratio, BandStats, RiskRewardBand,
    RiskRewardDistribution,
};

// 시계열 re-exports
pub use timeseries::{win_rate_series, WinRatePoint};

// 감정 분석 re-exports
pub use emotion::{emotion_performance, emotion_pnl_correlation, EmotionPerformance};

// 인사이트 re-exports
pub use insights::{generate_insights, Insight, InsightKind};

// 캐시 re-exports
pub use cache::{AnalyticsCache, Fingerprint};

// 리포트 re-exports
pub use report::{generate_analytics, AnalyticsReport, OutcomeBreakdown};
