//! 대시보드 분석 리포트 조립.
//!
//! 정규화된 저널 스냅샷 하나를 받아 모든 위젯의 파생 데이터를 한 번의
//! 동기 계산으로 만들어 냅니다. 부수 효과가 없는 순수 함수이며, 입력이
//! 비어 있거나 일부 매매가 불완전해도 각 지표가 0/중립값으로 퇴화할 뿐
//! 절대 실패하지 않습니다. 매매 하나가 이상해도 대시보드 전체가
//! 비어서는 안 됩니다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use journal_core::{AnalyticsSettings, JournalEntry, Outcome, TradeStatistics};

use crate::emotion::{emotion_performance, emotion_pnl_correlation, EmotionPerformance};
use crate::equity::{BalanceCurve, TimeFrame};
use crate::excursion::{analyze_excursions, ExcursionSummary, TradeExcursion};
use crate::grouping::{
    by_activity, by_mistake, by_symbol, flatten_trades, group_trades, rank_by_net_pnl,
    rank_mistakes, Group,
};
use crate::insights::{generate_insights, Insight};
use crate::risk_reward::{risk_reward_distribution, RiskRewardDistribution};
use crate::timeseries::{win_rate_series, WinRatePoint};

/// 세션 결과 분류별 엔트리 수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeBreakdown {
    /// 수익 마감 세션
    pub wins: usize,
    /// 손실 마감 세션
    pub losses: usize,
    /// 본전 세션
    pub breakevens: usize,
    /// 매매 없는 세션
    pub no_trades: usize,
    /// 분류되지 않은 세션
    pub unclassified: usize,
}

impl OutcomeBreakdown {
    /// 엔트리 목록에서 결과 분류를 집계합니다.
    pub fn from_entries(entries: &[JournalEntry]) -> Self {
        let mut breakdown = Self::default();

        for entry in entries {
            match entry.outcome {
                Some(Outcome::Win) => breakdown.wins += 1,
                Some(Outcome::Loss) => breakdown.losses += 1,
                Some(Outcome::Breakeven) => breakdown.breakevens += 1,
                Some(Outcome::NoTrades) => breakdown.no_trades += 1,
                None => breakdown.unclassified += 1,
            }
        }

        breakdown
    }
}

/// 분석 리포트.
///
/// 매 조회마다 다시 계산되는 파생 데이터입니다. 자체 식별자나
/// 생명주기를 갖지 않으며 저장되지 않습니다. 모든 숫자 필드는 유한한
/// 값이고 모든 목록 필드는 null이 아닙니다 (정규화 경계의 계약).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// 스냅샷의 엔트리 수
    pub entry_count: usize,
    /// 청산된 매매 수
    pub trade_count: usize,
    /// 미청산 매매 수
    pub open_trade_count: usize,
    /// 전체 매매 통계
    pub statistics: TradeStatistics,
    /// 감정 라벨별 성과 (고정 순서)
    pub emotions: Vec<EmotionPerformance>,
    /// 감정 점수-일일 손익 상관계수
    pub emotion_pnl_correlation: Option<f64>,
    /// 종목별 성과 (순손익 내림차순)
    pub symbols: Vec<Group<String>>,
    /// 장전 활동별 성과 (순손익 내림차순)
    pub activities: Vec<Group<String>>,
    /// 실수 분류별 손실 영향 순위
    pub mistakes: Vec<Group<String>>,
    /// 세션 결과 분류별 엔트리 수
    pub outcomes: OutcomeBreakdown,
    /// 잔고 곡선
    pub balance_curve: BalanceCurve,
    /// 시간 구간별 승률 시계열
    pub win_rate_series: Vec<WinRatePoint>,
    /// 매매별 과잉변동 분석
    pub excursions: Vec<TradeExcursion>,
    /// 과잉변동 요약
    pub excursion_summary: ExcursionSummary,
    /// 손익비 분포
    pub risk_reward: RiskRewardDistribution,
    /// 생성된 인사이트
    pub insights: Vec<Insight>,
}

/// 저널 스냅샷에서 분석 리포트를 생성합니다.
///
/// 외부 저장소가 공급한 읽기 전용 스냅샷을 빌려 한 번의 계산 동안만
/// 사용합니다. 호출 사이에 공유 상태가 없으므로 여러 위젯이 동시에
/// 호출해도 안전합니다.
///
/// # Arguments
///
/// * `entries` - 정규화된 저널 엔트리 스냅샷
/// * `settings` - 분석 설정 (초기 잔고, 시계열 집계 단위 등)
pub fn generate_analytics(
    entries: &[JournalEntry],
    settings: &AnalyticsSettings,
) -> AnalyticsReport {
    let trades = flatten_trades(entries);
    let closed_count = trades.iter().filter(|c| c.trade.is_closed()).count();
    let open_count = trades.len() - closed_count;

    let statistics =
        TradeStatistics::from_trades(entries.iter().flat_map(|e| e.trades.iter()));

    let emotions = emotion_performance(&trades);
    let symbols = rank_by_net_pnl(group_trades(&trades, by_symbol));
    let activities = rank_by_net_pnl(group_trades(&trades, by_activity));
    let mistakes = rank_mistakes(group_trades(&trades, by_mistake));

    let timeframe: TimeFrame = settings.timeframe.parse().unwrap_or_default();

    let (excursions, excursion_summary) =
        analyze_excursions(trades.iter().map(|c| c.trade));
    let risk_reward = risk_reward_distribution(&trades);

    let insights = generate_insights(
        &emotions,
        &symbols,
        &mistakes,
        statistics.total_trades,
        settings.min_insight_trades,
    );

    debug!(
        entry_count = entries.len(),
        trade_count = closed_count,
        open_trade_count = open_count,
        excluded_from_excursion = excursion_summary.excluded,
        "Generated analytics report"
    );

    AnalyticsReport {
        entry_count: entries.len(),
        trade_count: closed_count,
        open_trade_count: open_count,
        statistics,
        emotions,
        emotion_pnl_correlation: emotion_pnl_correlation(entries),
        symbols,
        activities,
        mistakes,
        outcomes: OutcomeBreakdown::from_entries(entries),
        balance_curve: BalanceCurve::from_entries(entries, settings.initial_balance),
        win_rate_series: win_rate_series(entries, timeframe),
        excursions,
        excursion_summary,
        risk_reward,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::{Direction, EmotionLabel, SessionKind, Trade};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_snapshot_degrades_to_neutral() {
        let report = generate_analytics(&[], &AnalyticsSettings::default());

        assert_eq!(report.entry_count, 0);
        assert_eq!(report.trade_count, 0);
        assert_eq!(report.statistics.win_rate_pct, Decimal::ZERO);
        assert_eq!(report.statistics.profit_factor.to_string(), "0");
        assert!(report.balance_curve.is_empty());
        assert_eq!(report.balance_curve.max_drawdown(), Decimal::ZERO);
        assert!(report.win_rate_series.is_empty());
        assert!(report.symbols.is_empty());
        // 감정 그룹은 고정 3개, 전부 빈 그룹
        assert_eq!(report.emotions.len(), 3);
        assert!(report.emotions.iter().all(|e| e.stats.count == 0));
        assert!(report.emotion_pnl_correlation.is_none());
    }

    #[test]
    fn test_report_counts_open_trades_separately() {
        let entry = JournalEntry::new(SessionKind::Trade, EmotionLabel::Positive)
            .with_trade(
                Trade::new("BTC/USDT", Direction::Buy)
                    .with_prices(dec!(100), dec!(110))
                    .with_pnl(dec!(10)),
            )
            .with_trade(Trade::new("ETH/USDT", Direction::Buy));
        let entries = vec![entry];

        let report = generate_analytics(&entries, &AnalyticsSettings::default());

        assert_eq!(report.trade_count, 1);
        assert_eq!(report.open_trade_count, 1);
        assert_eq!(report.statistics.total_trades, 1);
    }

    #[test]
    fn test_outcome_breakdown() {
        let entries = vec![
            JournalEntry::new(SessionKind::Post, EmotionLabel::Neutral)
                .with_outcome(Outcome::Win),
            JournalEntry::new(SessionKind::Post, EmotionLabel::Neutral)
                .with_outcome(Outcome::NoTrades),
            JournalEntry::new(SessionKind::Pre, EmotionLabel::Neutral),
        ];

        let breakdown = OutcomeBreakdown::from_entries(&entries);

        assert_eq!(breakdown.wins, 1);
        assert_eq!(breakdown.no_trades, 1);
        assert_eq!(breakdown.unclassified, 1);
    }

    #[test]
    fn test_report_serializes() {
        let report = generate_analytics(&[], &AnalyticsSettings::default());
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"profit_factor\":\"0\""));
    }
}
