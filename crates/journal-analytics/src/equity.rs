//! 잔고 곡선(Balance Curve) 데이터 모듈.
//!
//! 사용자 지정 초기 잔고에서 출발해 저널 엔트리의 일일 손익을
//! 시계열로 누적하고 분석합니다.
//!
//! # 주요 기능
//!
//! - 엔트리별 잔고 포인트 (날짜, 잔고, 일일 손익)
//! - 전진 전용(peak forward-only) Drawdown 계산
//! - 총 수익률
//! - 일별/주별/월별 데이터 집계

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use journal_core::{change_pct, JournalEntry};

/// 시간 프레임 (데이터 집계 단위).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFrame {
    /// 일별 집계
    Daily,
    /// 주별 집계 (ISO 주차)
    Weekly,
    /// 월별 집계
    Monthly,
    /// 분기별 집계
    Quarterly,
    /// 연간 집계
    Yearly,
}

impl TimeFrame {
    /// 시간 프레임의 표시 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeFrame::Daily => "일별",
            TimeFrame::Weekly => "주별",
            TimeFrame::Monthly => "월별",
            TimeFrame::Quarterly => "분기별",
            TimeFrame::Yearly => "연간",
        }
    }

    /// 타임스탬프를 기간 키로 변환합니다.
    ///
    /// 같은 프레임 안에서는 키의 사전식 순서가 시간 순서와 일치합니다.
    pub fn period_key(&self, timestamp: DateTime<Utc>) -> String {
        let date = timestamp.date_naive();

        match self {
            TimeFrame::Daily => date.format("%Y-%m-%d").to_string(),
            TimeFrame::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            TimeFrame::Monthly => date.format("%Y-%m").to_string(),
            TimeFrame::Quarterly => {
                let quarter = (date.month() - 1) / 3 + 1;
                format!("{}-Q{}", date.year(), quarter)
            }
            TimeFrame::Yearly => date.format("%Y").to_string(),
        }
    }
}

impl Default for TimeFrame {
    fn default() -> Self {
        Self::Daily
    }
}

impl std::str::FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

/// 단일 잔고 포인트.
///
/// 저널 엔트리 하나당 하나씩 생성됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    /// 엔트리 생성 시각 (UTC)
    pub date: DateTime<Utc>,
    /// 누적 잔고
    pub balance: Decimal,
    /// 해당 엔트리의 일일 손익
    pub daily_pnl: Decimal,
    /// 고점 대비 낙폭 (%, 0 이상)
    pub drawdown_pct: Decimal,
}

/// 잔고 곡선.
///
/// 생성 시각 오름차순으로 정렬된 엔트리들의 누적 손익 시계열입니다.
/// 고점은 전진 전용으로 갱신됩니다 (절대 감소하지 않음).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceCurve {
    /// 초기 잔고
    initial_balance: Decimal,
    /// 시계열 포인트 (시간순)
    points: Vec<BalancePoint>,
    /// 현재 고점 잔고
    peak_balance: Decimal,
    /// 최대 낙폭 (%)
    max_drawdown_pct: Decimal,
    /// 최대 낙폭 발생 시점
    max_drawdown_at: Option<DateTime<Utc>>,
}

impl BalanceCurve {
    /// 빈 잔고 곡선을 생성합니다.
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            initial_balance,
            points: Vec::new(),
            peak_balance: initial_balance,
            max_drawdown_pct: Decimal::ZERO,
            max_drawdown_at: None,
        }
    }

    /// 저널 엔트리 목록에서 잔고 곡선을 구축합니다.
    ///
    /// 엔트리는 생성 시각 오름차순으로 정렬되며 (동률은 입력 순서
    /// 유지), 엔트리 하나당 포인트 하나를 만듭니다. 매매가 없는
    /// 엔트리는 일일 손익 0으로 포함됩니다.
    pub fn from_entries(entries: &[JournalEntry], initial_balance: Decimal) -> Self {
        let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
        sorted.sort_by_key(|e| e.created_at);

        let mut curve = Self::new(initial_balance);
        for entry in sorted {
            let daily_pnl = entry.daily_pnl();
            let balance = curve.current_balance() + daily_pnl;
            curve.push_point(entry.created_at, balance, daily_pnl);
        }

        curve
    }

    /// 포인트를 추가하고 고점/낙폭을 갱신합니다.
    fn push_point(&mut self, date: DateTime<Utc>, balance: Decimal, daily_pnl: Decimal) {
        // 고점 갱신 (전진 전용)
        if balance > self.peak_balance {
            self.peak_balance = balance;
        }

        let drawdown_pct = if self.peak_balance > Decimal::ZERO {
            (self.peak_balance - balance) / self.peak_balance * dec!(100)
        } else {
            Decimal::ZERO
        };

        if drawdown_pct > self.max_drawdown_pct {
            self.max_drawdown_pct = drawdown_pct;
            self.max_drawdown_at = Some(date);
        }

        self.points.push(BalancePoint {
            date,
            balance,
            daily_pnl,
            drawdown_pct,
        });
    }

    /// 초기 잔고를 반환합니다.
    pub fn initial_balance(&self) -> Decimal {
        self.initial_balance
    }

    /// 모든 포인트를 반환합니다.
    pub fn points(&self) -> &[BalancePoint] {
        &self.points
    }

    /// 현재 잔고 (포인트가 없으면 초기 잔고).
    pub fn current_balance(&self) -> Decimal {
        self.points
            .last()
            .map(|p| p.balance)
            .unwrap_or(self.initial_balance)
    }

    /// 현재 고점 잔고를 반환합니다.
    pub fn peak_balance(&self) -> Decimal {
        self.peak_balance
    }

    /// 최대 낙폭 (%, 시리즈가 비어 있으면 0).
    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown_pct
    }

    /// 최대 낙폭 발생 시점.
    pub fn max_drawdown_at(&self) -> Option<DateTime<Utc>> {
        self.max_drawdown_at
    }

    /// 총 수익률 (%).
    ///
    /// (현재 잔고 - 초기 잔고) / 초기 잔고 × 100
    pub fn total_return_pct(&self) -> Decimal {
        change_pct(self.initial_balance, self.current_balance())
    }

    /// 포인트 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 데이터가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drawdown 시계열을 반환합니다.
    pub fn drawdown_series(&self) -> Vec<(DateTime<Utc>, Decimal)> {
        self.points
            .iter()
            .map(|p| (p.date, p.drawdown_pct))
            .collect()
    }

    /// 시간 프레임별로 데이터를 집계합니다.
    ///
    /// 각 기간의 마지막 잔고를 취하고 일일 손익은 기간 내 합계로
    /// 접습니다. 낙폭은 집계된 포인트 기준으로 다시 계산됩니다.
    pub fn aggregate(&self, timeframe: TimeFrame) -> BalanceCurve {
        if self.points.is_empty() {
            return BalanceCurve::new(self.initial_balance);
        }

        // 기간별로 그룹화 (키 사전식 순서 = 시간 순서)
        let mut grouped: BTreeMap<String, Vec<&BalancePoint>> = BTreeMap::new();
        for point in &self.points {
            let key = timeframe.period_key(point.date);
            grouped.entry(key).or_default().push(point);
        }

        let mut aggregated = BalanceCurve::new(self.initial_balance);
        for (_, points) in grouped {
            let period_pnl: Decimal = points.iter().map(|p| p.daily_pnl).sum();
            if let Some(last) = points.last() {
                aggregated.push_point(last.date, last.balance, period_pnl);
            }
        }

        aggregated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use journal_core::{Direction, EmotionLabel, SessionKind, Trade};

    fn entry_at(days: i64, pnl: Decimal) -> JournalEntry {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        JournalEntry::new(SessionKind::Post, EmotionLabel::Neutral)
            .with_created_at(base + Duration::days(days))
            .with_trade(
                Trade::new("BTC/USDT", Direction::Buy)
                    .with_prices(dec!(100), dec!(110))
                    .with_pnl(pnl),
            )
    }

    #[test]
    fn test_curve_from_entries() {
        let entries = vec![
            entry_at(0, dec!(500)),
            entry_at(1, dec!(-200)),
            entry_at(2, dec!(300)),
        ];

        let curve = BalanceCurve::from_entries(&entries, dec!(10000));

        assert_eq!(curve.len(), 3);
        assert_eq!(curve.points()[0].balance, dec!(10500));
        assert_eq!(curve.points()[1].balance, dec!(10300));
        assert_eq!(curve.points()[1].daily_pnl, dec!(-200));
        assert_eq!(curve.current_balance(), dec!(10600));
    }

    #[test]
    fn test_entries_sorted_by_created_at() {
        // 입력 순서와 무관하게 시간순으로 누적되어야 함
        let entries = vec![entry_at(2, dec!(300)), entry_at(0, dec!(500))];

        let curve = BalanceCurve::from_entries(&entries, dec!(10000));

        assert_eq!(curve.points()[0].daily_pnl, dec!(500));
        assert_eq!(curve.points()[1].daily_pnl, dec!(300));
    }

    #[test]
    fn test_max_drawdown_monotonic_peak() {
        // 잔고 [10000, 12000, 9000, 11000] → MDD = (12000-9000)/12000 = 25%
        let entries = vec![
            entry_at(0, dec!(2000)),
            entry_at(1, dec!(-3000)),
            entry_at(2, dec!(2000)),
        ];

        let curve = BalanceCurve::from_entries(&entries, dec!(10000));

        assert_eq!(curve.max_drawdown(), dec!(25));
        // 고점은 감소하지 않음
        assert_eq!(curve.peak_balance(), dec!(12000));
    }

    #[test]
    fn test_total_return() {
        let entries = vec![entry_at(0, dec!(1500))];
        let curve = BalanceCurve::from_entries(&entries, dec!(10000));

        // (11500 - 10000) / 10000 * 100 = 15%
        assert_eq!(curve.total_return_pct(), dec!(15));
    }

    #[test]
    fn test_empty_curve() {
        let curve = BalanceCurve::from_entries(&[], dec!(10000));

        assert!(curve.is_empty());
        assert_eq!(curve.current_balance(), dec!(10000));
        assert_eq!(curve.max_drawdown(), Decimal::ZERO);
        assert_eq!(curve.total_return_pct(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_initial_balance_no_panic() {
        let entries = vec![entry_at(0, dec!(100)), entry_at(1, dec!(-200))];
        let curve = BalanceCurve::from_entries(&entries, Decimal::ZERO);

        // 0으로 나누기 대신 0 반환
        assert_eq!(curve.total_return_pct(), Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_weekly() {
        let entries = vec![
            entry_at(0, dec!(100)),
            entry_at(1, dec!(200)),
            entry_at(7, dec!(-50)),
        ];

        let curve = BalanceCurve::from_entries(&entries, dec!(10000));
        let weekly = curve.aggregate(TimeFrame::Weekly);

        assert_eq!(weekly.len(), 2);
        // 첫 주의 일일 손익은 합산
        assert_eq!(weekly.points()[0].daily_pnl, dec!(300));
        assert_eq!(weekly.points()[0].balance, dec!(10300));
        assert_eq!(weekly.points()[1].daily_pnl, dec!(-50));
    }

    #[test]
    fn test_timeframe_period_key() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();

        assert_eq!(TimeFrame::Daily.period_key(ts), "2026-08-06");
        assert_eq!(TimeFrame::Monthly.period_key(ts), "2026-08");
        assert_eq!(TimeFrame::Quarterly.period_key(ts), "2026-Q3");
        assert_eq!(TimeFrame::Yearly.period_key(ts), "2026");
    }

    #[test]
    fn test_timeframe_from_str() {
        assert_eq!("daily".parse::<TimeFrame>().unwrap(), TimeFrame::Daily);
        assert_eq!("Monthly".parse::<TimeFrame>().unwrap(), TimeFrame::Monthly);
        assert!("hourly".parse::<TimeFrame>().is_err());
    }
}
