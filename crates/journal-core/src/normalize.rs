//! 수집(ingestion) 정규화 경계.
//!
//! 외부 저장소에서 내려온 느슨한 형식의 저널 레코드를 강타입 도메인
//! 모델로 변환합니다. 숫자 필드는 문자열/숫자/null이 섞여 도착하고
//! 필드 이름도 camelCase와 snake_case가 혼재하므로, 모든 산술 이전에
//! 반드시 이 경계를 통과해야 합니다.
//!
//! # 보정 규칙
//!
//! - 문자열 숫자는 trim 후 십진수로 파싱
//! - `null`/누락/파싱 불가 값은 `pnl`·`fees`·`quantity`에서 0,
//!   가격·시각 필드에서는 `None` (존재 여부가 의미를 가짐)
//! - 목록 필드는 누락 시 빈 목록
//! - 레코드 단위로는 절대 실패하지 않음. 실패는 JSON 텍스트 자체가
//!   깨진 경우([`entries_from_json`])뿐

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{Direction, EmotionLabel, JournalEntry, Outcome, SessionKind, Trade};
use crate::error::JournalResult;

/// 느슨한 형식의 매매 레코드.
///
/// 모든 필드가 임의 JSON 값으로 도착할 수 있습니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTrade {
    pub id: Option<Value>,
    pub direction: Option<Value>,
    #[serde(alias = "pair", alias = "instrument")]
    pub symbol: Option<Value>,
    #[serde(alias = "entryPrice")]
    pub entry_price: Option<Value>,
    #[serde(alias = "exitPrice")]
    pub exit_price: Option<Value>,
    #[serde(alias = "size", alias = "qty")]
    pub quantity: Option<Value>,
    #[serde(alias = "stopLoss")]
    pub stop_loss: Option<Value>,
    #[serde(alias = "takeProfit")]
    pub take_profit: Option<Value>,
    #[serde(alias = "highestPrice")]
    pub highest_price: Option<Value>,
    #[serde(alias = "lowestPrice")]
    pub lowest_price: Option<Value>,
    #[serde(alias = "entryTime")]
    pub entry_time: Option<Value>,
    #[serde(alias = "exitTime")]
    pub exit_time: Option<Value>,
    pub pnl: Option<Value>,
    #[serde(alias = "profitLoss")]
    pub profit_loss: Option<Value>,
    pub fees: Option<Value>,
    pub screenshots: Option<Value>,
}

/// 느슨한 형식의 저널 엔트리 레코드.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawJournalEntry {
    pub id: Option<Value>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<Value>,
    #[serde(alias = "session_type", alias = "sessionType")]
    pub session: Option<Value>,
    #[serde(alias = "emotion_label", alias = "emotionLabel")]
    pub emotion: Option<Value>,
    #[serde(alias = "emotionDetail")]
    pub emotion_detail: Option<Value>,
    pub notes: Option<Value>,
    pub outcome: Option<Value>,
    #[serde(alias = "followedRules")]
    pub followed_rules: Option<Value>,
    pub mistakes: Option<Value>,
    #[serde(alias = "preTradingActivities")]
    pub pre_trading_activities: Option<Value>,
    pub trades: Option<Value>,
}

/// JSON 값을 십진수로 보정합니다.
///
/// # Returns
///
/// - 숫자: 그대로 변환 (정수는 무손실, 실수는 f64 경유)
/// - 문자열: trim 후 십진수 파싱 시도
/// - 그 외 (null, 배열, 객체, 파싱 불가): `None`
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// JSON 값을 십진수로 보정하고, 실패 시 0을 반환합니다.
pub fn coerce_decimal_or_zero(value: Option<&Value>) -> Decimal {
    value.and_then(coerce_decimal).unwrap_or(Decimal::ZERO)
}

/// JSON 값을 UTC 시각으로 보정합니다.
///
/// RFC 3339 문자열과 epoch 초/밀리초 숫자를 허용합니다.
pub fn coerce_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|ts| {
            // 13자리 이상은 밀리초로 간주
            if ts.abs() >= 1_000_000_000_000 {
                Utc.timestamp_millis_opt(ts).single()
            } else {
                Utc.timestamp_opt(ts, 0).single()
            }
        }),
        _ => None,
    }
}

fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| coerce_string(Some(v)))
            .collect(),
        _ => Vec::new(),
    }
}

fn coerce_direction(value: Option<&Value>) -> Direction {
    match coerce_string(value).map(|s| s.to_lowercase()).as_deref() {
        Some("sell") | Some("short") => Direction::Sell,
        // 알 수 없는 값은 매수로 간주
        _ => Direction::Buy,
    }
}

fn coerce_session(value: Option<&Value>) -> SessionKind {
    match coerce_string(value).map(|s| s.to_lowercase()).as_deref() {
        Some("pre") => SessionKind::Pre,
        Some("post") => SessionKind::Post,
        _ => SessionKind::Trade,
    }
}

fn coerce_emotion(value: Option<&Value>) -> EmotionLabel {
    match coerce_string(value).map(|s| s.to_lowercase()).as_deref() {
        Some("positive") => EmotionLabel::Positive,
        Some("negative") => EmotionLabel::Negative,
        _ => EmotionLabel::Neutral,
    }
}

fn coerce_outcome(value: Option<&Value>) -> Option<Outcome> {
    match coerce_string(value).map(|s| s.to_lowercase()).as_deref() {
        Some("win") => Some(Outcome::Win),
        Some("loss") => Some(Outcome::Loss),
        Some("breakeven") => Some(Outcome::Breakeven),
        Some("no_trades") => Some(Outcome::NoTrades),
        _ => None,
    }
}

/// 매매 레코드 하나를 정규화합니다.
///
/// `pnl`이 정본 필드이며, `profit_loss`는 `pnl` 키가 없거나 null일
/// 때만 참조합니다. `pnl`이 존재하지만 파싱 불가능하면 0으로 보정하고
/// `profit_loss`로 넘어가지 않습니다 (출처 필드가 데이터에 따라
/// 바뀌면 관측 불가능한 동작이 되므로).
pub fn normalize_trade(raw: &RawTrade) -> Trade {
    let pnl = match raw.pnl.as_ref() {
        Some(v) if !v.is_null() => coerce_decimal(v).unwrap_or(Decimal::ZERO),
        _ => coerce_decimal_or_zero(raw.profit_loss.as_ref()),
    };

    Trade {
        id: coerce_string(raw.id.as_ref()).unwrap_or_default(),
        direction: coerce_direction(raw.direction.as_ref()),
        symbol: coerce_string(raw.symbol.as_ref()).unwrap_or_default(),
        entry_price: raw.entry_price.as_ref().and_then(coerce_decimal),
        exit_price: raw.exit_price.as_ref().and_then(coerce_decimal),
        quantity: coerce_decimal_or_zero(raw.quantity.as_ref()),
        stop_loss: raw.stop_loss.as_ref().and_then(coerce_decimal),
        take_profit: raw.take_profit.as_ref().and_then(coerce_decimal),
        highest_price: raw.highest_price.as_ref().and_then(coerce_decimal),
        lowest_price: raw.lowest_price.as_ref().and_then(coerce_decimal),
        entry_time: raw.entry_time.as_ref().and_then(coerce_datetime),
        exit_time: raw.exit_time.as_ref().and_then(coerce_datetime),
        pnl,
        fees: coerce_decimal_or_zero(raw.fees.as_ref()),
        screenshots: coerce_string_list(raw.screenshots.as_ref()),
    }
}

/// 저널 엔트리 하나를 정규화합니다.
///
/// 생성 시각이 없거나 파싱 불가능하면 Unix epoch로 보정합니다.
/// 정렬 순서가 전순서를 유지하고, 엔트리가 사라지는 대신 가장 앞에
/// 나타나게 됩니다.
pub fn normalize_entry(raw: &RawJournalEntry) -> JournalEntry {
    let trades = match raw.trades.as_ref() {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| v.is_object())
            .filter_map(|v| serde_json::from_value::<RawTrade>(v.clone()).ok())
            .map(|raw_trade| normalize_trade(&raw_trade))
            .collect(),
        _ => Vec::new(),
    };

    JournalEntry {
        id: coerce_string(raw.id.as_ref()).unwrap_or_default(),
        created_at: raw
            .created_at
            .as_ref()
            .and_then(coerce_datetime)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        session: coerce_session(raw.session.as_ref()),
        emotion: coerce_emotion(raw.emotion.as_ref()),
        emotion_detail: coerce_string(raw.emotion_detail.as_ref()),
        notes: coerce_string(raw.notes.as_ref()),
        outcome: coerce_outcome(raw.outcome.as_ref()),
        followed_rules: coerce_string_list(raw.followed_rules.as_ref()),
        mistakes: coerce_string_list(raw.mistakes.as_ref()),
        pre_trading_activities: coerce_string_list(raw.pre_trading_activities.as_ref()),
        trades,
    }
}

/// 레코드 목록 전체를 정규화합니다.
pub fn normalize_entries(raw: &[RawJournalEntry]) -> Vec<JournalEntry> {
    let entries: Vec<JournalEntry> = raw.iter().map(normalize_entry).collect();

    debug!(
        entry_count = entries.len(),
        trade_count = entries.iter().map(|e| e.trades.len()).sum::<usize>(),
        "Normalized journal snapshot"
    );

    entries
}

/// JSON 텍스트에서 저널 엔트리 목록을 읽어 정규화합니다.
///
/// # Errors
///
/// JSON 텍스트 자체가 깨진 경우에만 실패합니다. 개별 레코드의
/// 필드 오류는 기본값으로 보정됩니다.
pub fn entries_from_json(json: &str) -> JournalResult<Vec<JournalEntry>> {
    let raw: Vec<RawJournalEntry> = serde_json::from_str(json)?;
    Ok(normalize_entries(&raw))
}
