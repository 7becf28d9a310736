//! 매매 과잉변동(excursion) 분석 모듈.
//!
//! 보유 중 도달한 최고/최저 가격을 익절·손절 거리에 대한 비율로
//! 환산합니다:
//! - **MFE%** (Maximum Favorable Excursion): 익절 목표 대비 유리한
//!   방향으로 얼마나 움직였는가. 100% 이상이면 익절가에 도달한 매매.
//! - **MAE%** (Maximum Adverse Excursion): 손절 거리 대비 불리한
//!   방향으로 얼마나 움직였는가. 항상 0 이하의 크기로 보고하며,
//!   절대값이 100% 이상이면 손절가에 도달한 매매.
//!
//! # 제외 규칙
//!
//! 방향 추론(롱/숏 스타일)은 손절·익절 가격을 진입가와 비교해서
//! 이루어지므로, 필요한 필드(`id`, 진입가, 익절, 손절, 최고가,
//! 최저가)가 하나라도 없는 매매는 0으로 채우지 않고 계산에서 통째로
//! 제외합니다. 손절 다리와 익절 다리가 서로 다른 방향을 가리키는
//! 비일관 매매(예: 매도 포지션인데 익절가가 진입가 위)도 제외합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use journal_core::{ratio_pct, Trade};

/// 익절 목표 스타일 (가격 다리 비교로 추론).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetStyle {
    /// 익절이 진입가 위, 손절이 진입가 아래
    Long,
    /// 익절이 진입가 아래, 손절이 진입가 위
    Short,
}

/// 매매 하나의 과잉변동 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExcursion {
    /// 매매 식별자
    pub trade_id: String,
    /// 종목
    pub symbol: String,
    /// 익절 거리 대비 유리한 움직임 (%)
    pub mfe_pct: Decimal,
    /// 손절 거리 대비 불리한 움직임 (%, 항상 0 이하)
    pub mae_pct: Decimal,
    /// 익절가 도달 여부 (MFE% >= 100)
    pub hit_take_profit: bool,
    /// 손절가 도달 여부 (|MAE%| >= 100)
    pub hit_stop_loss: bool,
}

/// 과잉변동 분석 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcursionSummary {
    /// 분석에 포함된 매매 수
    pub analyzed: usize,
    /// 필드 누락/방향 비일관으로 제외된 매매 수
    pub excluded: usize,
    /// 평균 MFE (%)
    pub avg_mfe_pct: Decimal,
    /// 평균 MAE (%, 0 이하)
    pub avg_mae_pct: Decimal,
    /// 익절가 도달 비율 (%)
    pub take_profit_hit_rate_pct: Decimal,
    /// 손절가 도달 비율 (%)
    pub stop_loss_hit_rate_pct: Decimal,
}

/// 필수 필드를 모아 방향 스타일을 추론합니다.
///
/// 두 다리가 모두 같은 방향을 가리킬 때만 `Some`을 반환합니다.
fn infer_style(entry: Decimal, stop_loss: Decimal, take_profit: Decimal) -> Option<TargetStyle> {
    let long_style = stop_loss < entry && take_profit > entry;
    let short_style = stop_loss > entry && take_profit < entry;

    match (long_style, short_style) {
        (true, false) => Some(TargetStyle::Long),
        (false, true) => Some(TargetStyle::Short),
        // 비일관 또는 퇴화(진입가와 동일)는 제외
        _ => None,
    }
}

/// 매매 하나의 MFE/MAE를 계산합니다.
///
/// # Returns
///
/// 필수 필드가 없거나 방향이 비일관이면 `None`
pub fn trade_excursion(trade: &Trade) -> Option<TradeExcursion> {
    if trade.id.is_empty() {
        return None;
    }

    let entry = trade.entry_price?;
    let take_profit = trade.take_profit?;
    let stop_loss = trade.stop_loss?;
    let highest = trade.highest_price?;
    let lowest = trade.lowest_price?;

    let style = infer_style(entry, stop_loss, take_profit)?;

    // 엄격한 부등호 덕분에 두 거리 모두 0이 아님
    let (mfe_pct, mae_magnitude) = match style {
        TargetStyle::Long => (
            ratio_pct(highest - entry, take_profit - entry),
            ratio_pct(entry - lowest, entry - stop_loss),
        ),
        TargetStyle::Short => (
            ratio_pct(entry - lowest, entry - take_profit),
            ratio_pct(highest - entry, stop_loss - entry),
        ),
    };

    // 불리한 방향으로 전혀 움직이지 않았다면 크기는 0
    let mae_magnitude = mae_magnitude.max(Decimal::ZERO);

    Some(TradeExcursion {
        trade_id: trade.id.clone(),
        symbol: trade.symbol.clone(),
        mfe_pct,
        mae_pct: -mae_magnitude,
        hit_take_profit: mfe_pct >= dec!(100),
        hit_stop_loss: mae_magnitude >= dec!(100),
    })
}

/// 매매 목록의 과잉변동을 분석합니다.
///
/// # Returns
///
/// (매매별 결과, 요약). 제외된 매매는 결과 목록에 나타나지 않고
/// 요약의 `excluded`에만 집계됩니다.
pub fn analyze_excursions<'a, I>(trades: I) -> (Vec<TradeExcursion>, ExcursionSummary)
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut excursions = Vec::new();
    let mut excluded = 0usize;

    for trade in trades {
        match trade_excursion(trade) {
            Some(excursion) => excursions.push(excursion),
            None => excluded += 1,
        }
    }

    let analyzed = excursions.len();
    let mut summary = ExcursionSummary {
        analyzed,
        excluded,
        ..Default::default()
    };

    if analyzed > 0 {
        let n = Decimal::from(analyzed);
        summary.avg_mfe_pct = excursions.iter().map(|e| e.mfe_pct).sum::<Decimal>() / n;
        summary.avg_mae_pct = excursions.iter().map(|e| e.mae_pct).sum::<Decimal>() / n;

        let tp_hits = excursions.iter().filter(|e| e.hit_take_profit).count();
        let sl_hits = excursions.iter().filter(|e| e.hit_stop_loss).count();
        summary.take_profit_hit_rate_pct = ratio_pct(Decimal::from(tp_hits), n);
        summary.stop_loss_hit_rate_pct = ratio_pct(Decimal::from(sl_hits), n);
    }

    (excursions, summary)
}
