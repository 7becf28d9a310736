//! 저널 엔트리.
//!
//! 하루의 트레이딩 세션을 기록하는 타입을 정의합니다:
//! - 세션 전/후 체크인 및 독립 매매 기록
//! - 감정 상태 라벨 및 세부 분류
//! - 지킨 규칙 / 실수 / 장전 활동 태그
//! - 포함된 매매 목록

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::trade::Trade;

/// 세션 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// 장전 체크인
    Pre,
    /// 장후 체크인
    Post,
    /// 독립 매매 기록
    Trade,
}

impl Default for SessionKind {
    fn default() -> Self {
        Self::Trade
    }
}

/// 감정 상태 라벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    /// 긍정
    Positive,
    /// 중립
    Neutral,
    /// 부정
    Negative,
}

impl EmotionLabel {
    /// 전체 라벨 목록 (고정 순서, 빈 그룹 보고용).
    pub const ALL: [EmotionLabel; 3] = [
        EmotionLabel::Positive,
        EmotionLabel::Neutral,
        EmotionLabel::Negative,
    ];

    /// 표시 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            EmotionLabel::Positive => "긍정",
            EmotionLabel::Neutral => "중립",
            EmotionLabel::Negative => "부정",
        }
    }

    /// 상관계수 계산용 수치 점수 (+1 / 0 / -1).
    pub fn score(&self) -> f64 {
        match self {
            EmotionLabel::Positive => 1.0,
            EmotionLabel::Neutral => 0.0,
            EmotionLabel::Negative => -1.0,
        }
    }
}

impl Default for EmotionLabel {
    fn default() -> Self {
        Self::Neutral
    }
}

/// 세션 결과 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// 수익으로 마감
    Win,
    /// 손실로 마감
    Loss,
    /// 본전
    Breakeven,
    /// 매매 없음
    NoTrades,
}

/// 저널 엔트리.
///
/// 하루의 트레이딩 세션에 대한 기록입니다. 생성 시각은 불변이며,
/// `trades`는 항상 (비어 있을 수 있는) 순서 있는 목록이며,
/// 정규화 경계를 통과한 뒤에는 절대 누락되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// 불투명한 고유 식별자
    pub id: String,
    /// 생성 시각 (불변)
    pub created_at: DateTime<Utc>,
    /// 세션 유형
    pub session: SessionKind,
    /// 감정 상태 라벨
    pub emotion: EmotionLabel,
    /// 감정 세부 분류 (자유 텍스트)
    pub emotion_detail: Option<String>,
    /// 자유 텍스트 메모
    pub notes: Option<String>,
    /// 세션 결과 분류
    pub outcome: Option<Outcome>,
    /// 지킨 규칙 태그
    #[serde(default)]
    pub followed_rules: Vec<String>,
    /// 실수 분류 태그
    #[serde(default)]
    pub mistakes: Vec<String>,
    /// 장전 활동 태그
    #[serde(default)]
    pub pre_trading_activities: Vec<String>,
    /// 포함된 매매 목록
    #[serde(default)]
    pub trades: Vec<Trade>,
}

impl JournalEntry {
    /// 새 저널 엔트리를 생성합니다.
    pub fn new(session: SessionKind, emotion: EmotionLabel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            session,
            emotion,
            emotion_detail: None,
            notes: None,
            outcome: None,
            followed_rules: Vec::new(),
            mistakes: Vec::new(),
            pre_trading_activities: Vec::new(),
            trades: Vec::new(),
        }
    }

    /// 생성 시각을 설정합니다 (테스트/백테스트 세션용).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// 결과 분류를 설정합니다.
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// 매매를 추가합니다.
    pub fn with_trade(mut self, trade: Trade) -> Self {
        self.trades.push(trade);
        self
    }

    /// 이 엔트리의 일일 손익 (청산된 매매의 PnL 합계).
    pub fn daily_pnl(&self) -> Decimal {
        self.trades
            .iter()
            .filter(|t| t.is_closed())
            .map(|t| t.pnl)
            .sum()
    }

    /// 식별자가 일치하는 매매를 교체합니다 (편집 플로우).
    ///
    /// # Returns
    ///
    /// 교체가 일어났으면 `true`
    pub fn replace_trade(&mut self, trade: Trade) -> bool {
        match self.trades.iter_mut().find(|t| t.id == trade.id) {
            Some(slot) => {
                *slot = trade;
                true
            }
            None => false,
        }
    }
}
