//! 매매 통계 계산 공통 로직.
//!
//! 대시보드 위젯들이 공유하는 통계 프리미티브를 제공합니다:
//! - 그룹 단위 집계 ([`GroupStats`])
//! - 전체 매매 통계 ([`TradeStatistics`])
//! - Profit Factor 센티넬 표현 ([`ProfitFactor`])

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculations::win_rate_pct;
use super::trade::Trade;

/// Profit Factor (총수익 / 총손실).
///
/// 손실이 전혀 없는 경우는 0으로 나누기 결과물이 아니라 명시적인
/// 센티넬로 표현합니다:
/// - 수익만 있으면 [`ProfitFactor::Infinite`] → `"∞"`로 렌더링
/// - 수익도 손실도 없으면 `Ratio(0)` → `"0"`으로 렌더링
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    /// 손실 없이 수익만 존재
    Infinite,
    /// 총수익 / 총손실 비율
    Ratio(Decimal),
}

impl ProfitFactor {
    /// 총수익/총손실 합계로부터 Profit Factor를 계산합니다.
    ///
    /// # Arguments
    ///
    /// * `gross_profit` - 총 수익 (수익 매매 합계)
    /// * `gross_loss` - 총 손실 (손실 매매 합계, 양수)
    pub fn from_sums(gross_profit: Decimal, gross_loss: Decimal) -> Self {
        if gross_loss > Decimal::ZERO {
            ProfitFactor::Ratio(gross_profit / gross_loss)
        } else if gross_profit > Decimal::ZERO {
            ProfitFactor::Infinite
        } else {
            ProfitFactor::Ratio(Decimal::ZERO)
        }
    }

    /// 무한대 센티넬인지 확인합니다.
    pub fn is_infinite(&self) -> bool {
        matches!(self, ProfitFactor::Infinite)
    }

    /// 유한한 비율 값 (무한대면 None).
    pub fn value(&self) -> Option<Decimal> {
        match self {
            ProfitFactor::Infinite => None,
            ProfitFactor::Ratio(r) => Some(*r),
        }
    }
}

impl Default for ProfitFactor {
    fn default() -> Self {
        ProfitFactor::Ratio(Decimal::ZERO)
    }
}

impl std::fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfitFactor::Infinite => write!(f, "∞"),
            ProfitFactor::Ratio(r) => write!(f, "{}", r.round_dp(2).normalize()),
        }
    }
}

impl Serialize for ProfitFactor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProfitFactor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "∞" {
            Ok(ProfitFactor::Infinite)
        } else {
            s.parse::<Decimal>()
                .map(ProfitFactor::Ratio)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// 그룹 단위 집계.
///
/// 그룹화 키(감정, 종목, 활동 태그, 시간 구간 등)별로 매매를 묶어
/// 축약한 결과입니다. 빈 그룹은 `count = 0`에 모든 합계가 0이며,
/// 평균류 값은 반드시 `count > 0` 확인 후에만 나눗셈을 수행합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// 그룹에 속한 (청산된) 매매 수
    pub count: usize,
    /// 수익 매매 수 (PnL > 0)
    pub wins: usize,
    /// 손익 합계
    pub sum_pnl: Decimal,
    /// 수익 합계 (양수 PnL만 누적)
    pub sum_profit: Decimal,
    /// 손실 합계 (음수 PnL의 절대값 누적, 양수)
    pub sum_loss: Decimal,
}

impl GroupStats {
    /// 빈 집계 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 매매 하나의 손익을 누적합니다.
    pub fn add(&mut self, pnl: Decimal) {
        self.count += 1;
        self.sum_pnl += pnl;

        if pnl > Decimal::ZERO {
            self.wins += 1;
            self.sum_profit += pnl;
        } else if pnl < Decimal::ZERO {
            self.sum_loss += pnl.abs();
        }
    }

    /// 평균 손익 (빈 그룹이면 0).
    pub fn avg_pnl(&self) -> Decimal {
        if self.count > 0 {
            self.sum_pnl / Decimal::from(self.count)
        } else {
            Decimal::ZERO
        }
    }

    /// 승률 (백분율, 빈 그룹이면 0).
    pub fn win_rate_pct(&self) -> Decimal {
        win_rate_pct(self.wins, self.count)
    }
}

/// 매매 통계 집계.
///
/// 승률, Profit Factor, 평균 손익 등 매매 성과를 요약합니다.
/// 미청산 매매(진입가 또는 청산가 없음)는 통계에서 제외됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeStatistics {
    /// 총 (청산된) 매매 횟수
    pub total_trades: usize,
    /// 수익 매매 횟수
    pub winning_trades: usize,
    /// 손실 매매 횟수
    pub losing_trades: usize,
    /// 승률 (백분율, 예: 65.5 = 65.5%)
    pub win_rate_pct: Decimal,
    /// 총 수익 (수익 매매만)
    pub gross_profit: Decimal,
    /// 총 손실 (손실 매매만, 양수)
    pub gross_loss: Decimal,
    /// 순손익 (수익 - 손실)
    pub net_profit: Decimal,
    /// Profit Factor (총수익 / 총손실)
    pub profit_factor: ProfitFactor,
    /// 평균 수익 (수익 매매만)
    pub avg_win: Decimal,
    /// 평균 손실 (손실 매매만, 양수)
    pub avg_loss: Decimal,
    /// 최대 수익 매매
    pub largest_win: Decimal,
    /// 최대 손실 매매 (양수)
    pub largest_loss: Decimal,
    /// 기대값 (승률×평균수익 - 패률×평균손실)
    pub expectancy: Decimal,
    /// 총 수수료
    pub total_fees: Decimal,
}

impl Default for TradeStatistics {
    fn default() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate_pct: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            profit_factor: ProfitFactor::default(),
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            expectancy: Decimal::ZERO,
            total_fees: Decimal::ZERO,
        }
    }
}

impl TradeStatistics {
    /// 빈 통계 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 매매 목록으로부터 통계 계산.
    ///
    /// `pnl`은 이미 실현된 값으로 그대로 사용하며, 수수료는 별도
    /// 합계로만 추적합니다 (이중 차감 방지).
    ///
    /// # Arguments
    ///
    /// * `trades` - 매매 목록 (미청산 매매는 자동 제외)
    ///
    /// # Returns
    ///
    /// 계산된 통계
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut stats = Self::new();

        for trade in trades {
            // 미청산 매매는 스킵
            if !trade.is_closed() {
                continue;
            }

            stats.total_trades += 1;
            stats.total_fees += trade.fees;
            stats.net_profit += trade.pnl;

            // 수익/손실 분류 (본전은 어느 쪽도 아님)
            if trade.pnl > Decimal::ZERO {
                stats.winning_trades += 1;
                stats.gross_profit += trade.pnl;

                if trade.pnl > stats.largest_win {
                    stats.largest_win = trade.pnl;
                }
            } else if trade.pnl < Decimal::ZERO {
                stats.losing_trades += 1;
                let loss = trade.pnl.abs();
                stats.gross_loss += loss;

                if loss > stats.largest_loss {
                    stats.largest_loss = loss;
                }
            }
        }

        // 승률 계산
        stats.win_rate_pct = win_rate_pct(stats.winning_trades, stats.total_trades);

        // Profit Factor 계산
        stats.profit_factor = ProfitFactor::from_sums(stats.gross_profit, stats.gross_loss);

        // 평균 수익/손실 계산
        if stats.winning_trades > 0 {
            stats.avg_win = stats.gross_profit / Decimal::from(stats.winning_trades);
        }
        if stats.losing_trades > 0 {
            stats.avg_loss = stats.gross_loss / Decimal::from(stats.losing_trades);
        }

        // 기대값 계산: (승률 × 평균수익) - (패률 × 평균손실)
        if stats.total_trades > 0 {
            let win_prob = Decimal::from(stats.winning_trades) / Decimal::from(stats.total_trades);
            let loss_prob = Decimal::from(stats.losing_trades) / Decimal::from(stats.total_trades);
            stats.expectancy = (win_prob * stats.avg_win) - (loss_prob * stats.avg_loss);
        }

        stats
    }

    /// 평균 매매당 손익.
    pub fn avg_trade_pnl(&self) -> Decimal {
        if self.total_trades > 0 {
            self.net_profit / Decimal::from(self.total_trades)
        } else {
            Decimal::ZERO
        }
    }

    /// 성과 요약을 문자열로 반환합니다.
    ///
    /// 대시보드나 로그 출력용 한 줄 요약입니다.
    pub fn summary(&self) -> String {
        format!(
            "매매: {} | 승률: {:.1}% | PF: {} | 순익: {:.2}",
            self.total_trades, self.win_rate_pct, self.profit_factor, self.net_profit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use rust_decimal_macros::dec;

    fn closed_trade(pnl: Decimal) -> Trade {
        Trade::new("BTC/USDT", Direction::Buy)
            .with_prices(dec!(50000), dec!(51000))
            .with_pnl(pnl)
    }

    #[test]
    fn test_empty_trades() {
        let trades: Vec<Trade> = Vec::new();
        let stats = TradeStatistics::from_trades(&trades);

        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.winning_trades, 0);
        assert_eq!(stats.win_rate_pct, Decimal::ZERO);
        assert_eq!(stats.profit_factor.to_string(), "0");
    }

    #[test]
    fn test_win_rate_zero_pnl_is_not_win() {
        // PnL [100, -50, 0] → 승률 1/3 ≈ 33.33%
        let trades = vec![
            closed_trade(dec!(100)),
            closed_trade(dec!(-50)),
            closed_trade(Decimal::ZERO),
        ];

        let stats = TradeStatistics::from_trades(&trades);

        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.winning_trades, 1);
        assert_eq!(stats.losing_trades, 1);
        assert!((stats.win_rate_pct - dec!(33.3333)).abs() < dec!(0.01));
    }

    #[test]
    fn test_profit_factor_infinite_sentinel() {
        // 손실 없음 → "∞"
        let trades = vec![closed_trade(dec!(100)), closed_trade(dec!(200))];
        let stats = TradeStatistics::from_trades(&trades);

        assert!(stats.profit_factor.is_infinite());
        assert_eq!(stats.profit_factor.to_string(), "∞");
    }

    #[test]
    fn test_profit_factor_zero_sentinel() {
        // 손실만 존재 → "0"
        let trades = vec![closed_trade(dec!(-100))];
        let stats = TradeStatistics::from_trades(&trades);

        assert_eq!(stats.profit_factor.to_string(), "0");
        assert_eq!(stats.profit_factor.value(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_profit_factor_ratio() {
        let pf = ProfitFactor::from_sums(dec!(300), dec!(100));
        assert_eq!(pf.value(), Some(dec!(3)));
        assert_eq!(pf.to_string(), "3");
    }

    #[test]
    fn test_profit_factor_serde_roundtrip() {
        let json = serde_json::to_string(&ProfitFactor::Infinite).unwrap();
        assert_eq!(json, "\"∞\"");

        let back: ProfitFactor = serde_json::from_str(&json).unwrap();
        assert!(back.is_infinite());

        let ratio: ProfitFactor = serde_json::from_str("\"2.5\"").unwrap();
        assert_eq!(ratio.value(), Some(dec!(2.5)));
    }

    #[test]
    fn test_skip_open_trades() {
        let open = Trade::new("ETH/USDT", Direction::Buy).with_pnl(dec!(999));
        let trades = vec![closed_trade(dec!(100)), open];

        let stats = TradeStatistics::from_trades(&trades);

        assert_eq!(stats.total_trades, 1);
        assert_eq!(stats.net_profit, dec!(100));
    }

    #[test]
    fn test_expectancy() {
        let trades = vec![closed_trade(dec!(100)), closed_trade(dec!(-50))];
        let stats = TradeStatistics::from_trades(&trades);

        // 기대값: (0.5 * 100) - (0.5 * 50) = 25
        assert_eq!(stats.expectancy, dec!(25));
    }

    #[test]
    fn test_group_stats_accumulation() {
        let mut stats = GroupStats::new();
        stats.add(dec!(100));
        stats.add(dec!(-40));
        stats.add(Decimal::ZERO);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.sum_pnl, dec!(60));
        assert_eq!(stats.sum_profit, dec!(100));
        assert_eq!(stats.sum_loss, dec!(40));
    }

    #[test]
    fn test_group_stats_empty_division_guard() {
        let stats = GroupStats::new();

        assert_eq!(stats.avg_pnl(), Decimal::ZERO);
        assert_eq!(stats.win_rate_pct(), Decimal::ZERO);
    }

    #[test]
    fn test_summary_format() {
        let trades = vec![closed_trade(dec!(100))];
        let stats = TradeStatistics::from_trades(&trades);

        let summary = stats.summary();
        assert!(summary.contains("매매: 1"));
        assert!(summary.contains("∞"));
    }
}
