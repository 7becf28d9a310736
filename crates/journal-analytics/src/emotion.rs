//! 감정-성과 분석 모듈.
//!
//! 감정 상태 라벨별 매매 성과를 집계하고, 감정 점수와 일일 손익
//! 사이의 Pearson 상관계수를 계산합니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use journal_core::{EmotionLabel, GroupStats, JournalEntry};

use crate::grouping::TradeCtx;

/// 감정 라벨별 성과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPerformance {
    /// 감정 라벨
    pub emotion: EmotionLabel,
    /// 집계
    pub stats: GroupStats,
    /// 승률 (%)
    pub win_rate_pct: Decimal,
    /// 평균 손익
    pub avg_pnl: Decimal,
}

/// 감정 라벨별 성과를 집계합니다.
///
/// 세 라벨 모두 고정 순서로 보고되며, 매매가 없는 라벨도
/// `count = 0`에 모든 합계가 0인 빈 그룹으로 나타납니다.
pub fn emotion_performance(trades: &[TradeCtx<'_>]) -> Vec<EmotionPerformance> {
    let mut stats = [GroupStats::new(), GroupStats::new(), GroupStats::new()];

    for ctx in trades {
        if !ctx.trade.is_closed() {
            continue;
        }

        let idx = match ctx.entry.emotion {
            EmotionLabel::Positive => 0,
            EmotionLabel::Neutral => 1,
            EmotionLabel::Negative => 2,
        };
        stats[idx].add(ctx.trade.pnl);
    }

    EmotionLabel::ALL
        .iter()
        .zip(stats)
        .map(|(emotion, stats)| EmotionPerformance {
            emotion: *emotion,
            win_rate_pct: stats.win_rate_pct(),
            avg_pnl: stats.avg_pnl(),
            stats,
        })
        .collect()
}

/// Pearson 상관계수 계산.
///
/// # Returns
///
/// 상관계수 (-1.0 ~ 1.0), 표본이 2개 미만이거나 한쪽 분산이 0이면 None
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 분산이 0인 경우 (변동 없음)
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// 감정 점수와 일일 손익의 상관계수를 계산합니다.
///
/// 엔트리 하나가 표본 하나입니다 (감정 점수 +1/0/-1 대 일일 손익).
pub fn emotion_pnl_correlation(entries: &[JournalEntry]) -> Option<f64> {
    let mut scores = Vec::with_capacity(entries.len());
    let mut pnls = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(pnl) = entry.daily_pnl().to_f64() else {
            continue;
        };
        scores.push(entry.emotion.score());
        pnls.push(pnl);
    }

    pearson(&scores, &pnls)
}
