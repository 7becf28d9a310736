//! # Journal Core
//!
//! 트레이딩 저널의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 저널 분석 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 매매 기록 및 저널 엔트리 타입
//! - 수집(ingestion) 정규화 경계
//! - 공통 통계 프리미티브 (승률, Profit Factor, 그룹 집계)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod normalize;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use normalize::*;
