//! 손익비(Risk:Reward) 분석 모듈.
//!
//! 진입가에서 손절/익절까지의 거리로 매매별 보상/위험 비율을 계산하고,
//! 비율 구간별 성과 분포를 집계합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use journal_core::{GroupStats, Trade};

use crate::grouping::TradeCtx;

/// 손익비 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRewardBand {
    /// 1:1 미만
    BelowOne,
    /// 1 이상 2 미만
    OneToTwo,
    /// 2 이상 3 미만
    TwoToThree,
    /// 3 이상
    ThreePlus,
}

impl RiskRewardBand {
    /// 구간 전체 목록 (고정 순서).
    pub const ALL: [RiskRewardBand; 4] = [
        RiskRewardBand::BelowOne,
        RiskRewardBand::OneToTwo,
        RiskRewardBand::TwoToThree,
        RiskRewardBand::ThreePlus,
    ];

    /// 표시 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskRewardBand::BelowOne => "1:1 미만",
            RiskRewardBand::OneToTwo => "1:1 ~ 1:2",
            RiskRewardBand::TwoToThree => "1:2 ~ 1:3",
            RiskRewardBand::ThreePlus => "1:3 이상",
        }
    }

    /// 비율 값으로부터 구간을 결정합니다.
    pub fn from_ratio(ratio: Decimal) -> Self {
        if ratio < dec!(1) {
            RiskRewardBand::BelowOne
        } else if ratio < dec!(2) {
            RiskRewardBand::OneToTwo
        } else if ratio < dec!(3) {
            RiskRewardBand::TwoToThree
        } else {
            RiskRewardBand::ThreePlus
        }
    }
}

/// 구간별 집계.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandStats {
    /// 손익비 구간
    pub band: RiskRewardBand,
    /// 구간 집계
    pub stats: GroupStats,
}

/// 손익비 분포.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskRewardDistribution {
    /// 구간별 집계 (고정 순서, 빈 구간도 포함)
    pub bands: Vec<BandStats>,
    /// 비율 계산에 포함된 매매 수
    pub analyzed: usize,
    /// 필드 누락 또는 위험 거리 0으로 제외된 매매 수
    pub excluded: usize,
}

/// 매매 하나의 보상/위험 비율.
///
/// - 매수: 위험 = |진입가 - 손절|, 보상 = |익절 - 진입가|
/// - 매도: 위험 = |손절 - 진입가|, 보상 = |진입가 - 익절|
///
/// # Returns
///
/// 필요한 가격이 없거나 위험이 0이면 `None` (정의되지 않음)
pub fn risk_reward_ratio(trade: &Trade) -> Option<Decimal> {
    let entry = trade.entry_price?;
    let stop_loss = trade.stop_loss?;
    let take_profit = trade.take_profit?;

    let (risk, reward) = match trade.direction {
        journal_core::Direction::Buy => ((entry - stop_loss).abs(), (take_profit - entry).abs()),
        journal_core::Direction::Sell => ((stop_loss - entry).abs(), (entry - take_profit).abs()),
    };

    if risk.is_zero() {
        return None;
    }

    Some(reward / risk)
}

/// 청산된 매매들의 손익비 분포를 집계합니다.
pub fn risk_reward_distribution(trades: &[TradeCtx<'_>]) -> RiskRewardDistribution {
    let mut bands: Vec<BandStats> = RiskRewardBand::ALL
        .iter()
        .map(|band| BandStats {
            band: *band,
            stats: GroupStats::new(),
        })
        .collect();

    let mut analyzed = 0usize;
    let mut excluded = 0usize;

    for ctx in trades {
        if !ctx.trade.is_closed() {
            continue;
        }

        match risk_reward_ratio(ctx.trade) {
            Some(ratio) => {
                analyzed += 1;
                let idx = match RiskRewardBand::from_ratio(ratio) {
                    RiskRewardBand::BelowOne => 0,
                    RiskRewardBand::OneToTwo => 1,
                    RiskRewardBand::TwoToThree => 2,
                    RiskRewardBand::ThreePlus => 3,
                };
                bands[idx].stats.add(ctx.trade.pnl);
            }
            None => excluded += 1,
        }
    }

    RiskRewardDistribution {
        bands,
        analyzed,
        excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::{Direction, EmotionLabel, JournalEntry, SessionKind};

    use crate::grouping::flatten_trades;

    #[test]
    fn test_ratio_buy() {
        // 매수: 진입 100, 손절 95, 익절 110 → 위험 5, 보상 10 → 2.0
        let trade = Trade::new("BTC/USDT", Direction::Buy)
            .with_prices(dec!(100), dec!(105))
            .with_levels(dec!(95), dec!(110));

        assert_eq!(risk_reward_ratio(&trade), Some(dec!(2)));
    }

    #[test]
    fn test_ratio_sell() {
        // 매도: 진입 100, 손절 104, 익절 92 → 위험 4, 보상 8 → 2.0
        let trade = Trade::new("EUR/USD", Direction::Sell)
            .with_prices(dec!(100), dec!(95))
            .with_levels(dec!(104), dec!(92));

        assert_eq!(risk_reward_ratio(&trade), Some(dec!(2)));
    }

    #[test]
    fn test_zero_risk_is_undefined() {
        let trade = Trade::new("BTC/USDT", Direction::Buy)
            .with_prices(dec!(100), dec!(105))
            .with_levels(dec!(100), dec!(110));

        assert_eq!(risk_reward_ratio(&trade), None);
    }

    #[test]
    fn test_missing_levels_is_undefined() {
        let trade = Trade::new("BTC/USDT", Direction::Buy).with_prices(dec!(100), dec!(105));
        assert_eq!(risk_reward_ratio(&trade), None);
    }

    #[test]
    fn test_band_classification() {
        assert_eq!(RiskRewardBand::from_ratio(dec!(0.5)), RiskRewardBand::BelowOne);
        assert_eq!(RiskRewardBand::from_ratio(dec!(1)), RiskRewardBand::OneToTwo);
        assert_eq!(RiskRewardBand::from_ratio(dec!(2.9)), RiskRewardBand::TwoToThree);
        assert_eq!(RiskRewardBand::from_ratio(dec!(5)), RiskRewardBand::ThreePlus);
    }

    #[test]
    fn test_distribution() {
        let entry = JournalEntry::new(SessionKind::Trade, EmotionLabel::Neutral)
            .with_trade(
                Trade::new("BTC/USDT", Direction::Buy)
                    .with_prices(dec!(100), dec!(110))
                    .with_levels(dec!(95), dec!(110))
                    .with_pnl(dec!(10)),
            )
            .with_trade(
                // 손절/익절 없음 → 제외
                Trade::new("ETH/USDT", Direction::Buy)
                    .with_prices(dec!(100), dec!(99))
                    .with_pnl(dec!(-1)),
            );
        let entries = vec![entry];

        let trades = flatten_trades(&entries);
        let dist = risk_reward_distribution(&trades);

        assert_eq!(dist.analyzed, 1);
        assert_eq!(dist.excluded, 1);
        // 비율 2.0 → TwoToThree 구간
        let band = dist
            .bands
            .iter()
            .find(|b| b.band == RiskRewardBand::TwoToThree)
            .unwrap();
        assert_eq!(band.stats.count, 1);
        assert_eq!(band.stats.sum_pnl, dec!(10));
    }

    #[test]
    fn test_distribution_empty_bands_present() {
        let dist = risk_reward_distribution(&[]);

        assert_eq!(dist.bands.len(), 4);
        assert!(dist.bands.iter().all(|b| b.stats.count == 0));
        assert_eq!(dist.analyzed, 0);
    }
}
