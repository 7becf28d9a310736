//! 저널 시스템의 에러 타입.
//!
//! 집계 파이프라인 자체는 순수 함수이며 실패하지 않습니다 (잘못된 입력은
//! 정규화 경계에서 기본값으로 보정). 이 타입은 그 바깥 표면인
//! 설정 로딩과 스냅샷 JSON 파싱에서 사용됩니다.

use thiserror::Error;

/// 핵심 저널 에러.
#[derive(Debug, Error)]
pub enum JournalError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 저널 작업을 위한 Result 타입.
pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    /// 호출자가 입력을 고쳐 해결할 수 있는 에러인지 확인합니다.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            JournalError::InvalidInput(_) | JournalError::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for JournalError {
    fn from(err: config::ConfigError) -> Self {
        JournalError::Config(err.to_string())
    }
}
