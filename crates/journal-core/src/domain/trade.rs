//! 매매 기록.
//!
//! 이 모듈은 저널 엔트리에 포함되는 개별 매매 타입을 정의합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 매매 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// 매수 (롱)
    Buy,
    /// 매도 (숏)
    Sell,
}

impl Direction {
    /// 반대 방향을 반환합니다.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Buy
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// 정규화된 매매 기록.
///
/// 수집 경계([`crate::normalize`])를 통과한 뒤의 매매 데이터입니다.
/// `pnl`/`fees`/`quantity`는 항상 유한한 값이며(보정 기본값 0),
/// 가격 필드는 존재 여부 자체가 의미를 가지므로 `Option`으로 유지합니다:
/// 진입가나 청산가가 없는 매매는 미청산 상태로, 손익 집계에서 제외됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// 불투명한 고유 식별자 (외부 저장소가 부여)
    pub id: String,
    /// 매매 방향
    pub direction: Direction,
    /// 종목/통화쌍 (자유 텍스트)
    pub symbol: String,
    /// 진입 가격
    pub entry_price: Option<Decimal>,
    /// 청산 가격
    pub exit_price: Option<Decimal>,
    /// 거래 수량
    pub quantity: Decimal,
    /// 손절 가격
    pub stop_loss: Option<Decimal>,
    /// 익절 가격
    pub take_profit: Option<Decimal>,
    /// 보유 중 도달한 최고 가격
    pub highest_price: Option<Decimal>,
    /// 보유 중 도달한 최저 가격
    pub lowest_price: Option<Decimal>,
    /// 진입 시각
    pub entry_time: Option<DateTime<Utc>>,
    /// 청산 시각
    pub exit_time: Option<DateTime<Utc>>,
    /// 실현 손익
    pub pnl: Decimal,
    /// 수수료
    pub fees: Decimal,
    /// 연결된 스크린샷 참조
    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl Trade {
    /// 새 매매 기록을 생성합니다.
    pub fn new(symbol: impl Into<String>, direction: Direction) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            direction,
            symbol: symbol.into(),
            entry_price: None,
            exit_price: None,
            quantity: Decimal::ZERO,
            stop_loss: None,
            take_profit: None,
            highest_price: None,
            lowest_price: None,
            entry_time: None,
            exit_time: None,
            pnl: Decimal::ZERO,
            fees: Decimal::ZERO,
            screenshots: Vec::new(),
        }
    }

    /// 진입/청산 가격을 설정합니다.
    pub fn with_prices(mut self, entry: Decimal, exit: Decimal) -> Self {
        self.entry_price = Some(entry);
        self.exit_price = Some(exit);
        self
    }

    /// 손절/익절 가격을 설정합니다.
    pub fn with_levels(mut self, stop_loss: Decimal, take_profit: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
        self
    }

    /// 보유 중 최고/최저 가격을 설정합니다.
    pub fn with_extremes(mut self, highest: Decimal, lowest: Decimal) -> Self {
        self.highest_price = Some(highest);
        self.lowest_price = Some(lowest);
        self
    }

    /// 실현 손익을 설정합니다.
    pub fn with_pnl(mut self, pnl: Decimal) -> Self {
        self.pnl = pnl;
        self
    }

    /// 청산이 완료된 매매인지 확인합니다.
    ///
    /// 진입가와 청산가가 모두 있어야 청산으로 간주합니다.
    /// 미청산 매매는 손익 집계에 포함되지 않습니다.
    pub fn is_closed(&self) -> bool {
        self.entry_price.is_some() && self.exit_price.is_some()
    }

    /// 이 매매가 수익 매매인지 확인합니다 (PnL > 0, 본전은 수익이 아님).
    pub fn is_winner(&self) -> bool {
        self.is_closed() && self.pnl > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Buy.opposite(), Direction::Sell);
        assert_eq!(Direction::Sell.opposite(), Direction::Buy);
    }

    #[test]
    fn test_trade_closed() {
        let open = Trade::new("BTC/USDT", Direction::Buy);
        assert!(!open.is_closed());
        assert!(!open.is_winner());

        let closed = Trade::new("BTC/USDT", Direction::Buy)
            .with_prices(dec!(50000), dec!(52000))
            .with_pnl(dec!(200));
        assert!(closed.is_closed());
        assert!(closed.is_winner());
    }

    #[test]
    fn test_breakeven_is_not_winner() {
        let trade = Trade::new("EUR/USD", Direction::Sell)
            .with_prices(dec!(1.1), dec!(1.1))
            .with_pnl(Decimal::ZERO);

        assert!(trade.is_closed());
        assert!(!trade.is_winner());
    }
}
