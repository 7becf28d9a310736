//! 승률 시계열 모듈.
//!
//! 저널 엔트리의 매매를 시간 구간(일/주/월...)으로 묶어 구간별
//! 승률을 계산합니다. 구간 키는 엔트리 생성 시각 기준입니다 (개별
//! 매매의 진입 시각은 누락될 수 있음).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use journal_core::{win_rate_pct, JournalEntry};

use crate::equity::TimeFrame;

/// 시간 구간별 승률 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRatePoint {
    /// 구간 키 (예: "2026-08-06", "2026-W32", "2026-08")
    pub period: String,
    /// 구간 내 (청산된) 매매 수
    pub trades: usize,
    /// 구간 내 수익 매매 수
    pub wins: usize,
    /// 승률 (%)
    pub win_rate_pct: Decimal,
}

/// 시간 구간별 승률 시계열을 계산합니다.
///
/// # Returns
///
/// 시간 오름차순 포인트 목록. 매매가 없는 엔트리는 구간을 만들지
/// 않으며, 전체 입력이 비어 있으면 빈 목록을 반환합니다.
pub fn win_rate_series(entries: &[JournalEntry], timeframe: TimeFrame) -> Vec<WinRatePoint> {
    // 구간 키의 사전식 순서 = 시간 순서
    let mut buckets: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for entry in entries {
        let closed: Vec<_> = entry.trades.iter().filter(|t| t.is_closed()).collect();
        if closed.is_empty() {
            continue;
        }

        let key = timeframe.period_key(entry.created_at);
        let bucket = buckets.entry(key).or_insert((0, 0));
        bucket.0 += closed.len();
        bucket.1 += closed.iter().filter(|t| t.is_winner()).count();
    }

    buckets
        .into_iter()
        .map(|(period, (trades, wins))| WinRatePoint {
            period,
            trades,
            wins,
            win_rate_pct: win_rate_pct(wins, trades),
        })
        .collect()
}
