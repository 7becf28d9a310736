//! 인사이트 텍스트 생성 모듈.
//!
//! 이미 순위가 매겨진 집계에서 최고/최악 그룹을 골라 템플릿 문장으로
//! 렌더링합니다. 순수하게 표시용이며, "이미 계산된 지표에서 최대/최소
//! 선택" 이상의 수치 계약은 없습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionPerformance;
use crate::grouping::Group;

/// 인사이트 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// 감정 상태 관련
    Emotion,
    /// 종목 관련
    Symbol,
    /// 실수 분류 관련
    Mistake,
    /// 표본 부족 안내
    NotEnoughData,
}

/// 생성된 인사이트 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// 분류
    pub kind: InsightKind,
    /// 렌더링된 문장
    pub text: String,
}

fn money(value: Decimal) -> String {
    format!("{}", value.round_dp(2).normalize())
}

/// 순위 집계에서 인사이트 문장들을 생성합니다.
///
/// # Arguments
///
/// * `emotions` - 감정별 성과 (고정 순서)
/// * `symbols` - 순손익 내림차순 종목 순위
/// * `mistakes` - 손실 영향 순 실수 순위
/// * `total_trades` - 청산된 매매 수
/// * `min_trades` - 인사이트 생성에 필요한 최소 매매 수
pub fn generate_insights(
    emotions: &[EmotionPerformance],
    symbols: &[Group<String>],
    mistakes: &[Group<String>],
    total_trades: usize,
    min_trades: usize,
) -> Vec<Insight> {
    if total_trades < min_trades {
        return vec![Insight {
            kind: InsightKind::NotEnoughData,
            text: format!(
                "아직 데이터가 충분하지 않습니다 (청산된 매매 {}건, 최소 {}건 필요). 매매를 더 기록하면 인사이트가 생성됩니다.",
                total_trades, min_trades
            ),
        }];
    }

    let mut insights = Vec::new();

    // 매매가 있었던 감정 중 최고/최악
    let active: Vec<&EmotionPerformance> =
        emotions.iter().filter(|e| e.stats.count > 0).collect();
    if let Some(best) = active.iter().max_by_key(|e| e.stats.sum_pnl) {
        insights.push(Insight {
            kind: InsightKind::Emotion,
            text: format!(
                "'{}' 상태에서 성과가 가장 좋았습니다 (순손익 {}, 승률 {:.1}%).",
                best.emotion.display_name(),
                money(best.stats.sum_pnl),
                best.win_rate_pct
            ),
        });
    }
    if let Some(worst) = active.iter().min_by_key(|e| e.stats.sum_pnl) {
        if worst.stats.sum_pnl < Decimal::ZERO {
            insights.push(Insight {
                kind: InsightKind::Emotion,
                text: format!(
                    "'{}' 상태에서 손실이 집중되었습니다 (순손익 {}). 해당 상태에서는 매매 규모를 줄이는 것을 고려하세요.",
                    worst.emotion.display_name(),
                    money(worst.stats.sum_pnl)
                ),
            });
        }
    }

    // 종목 순위는 이미 순손익 내림차순
    if let Some(best) = symbols.iter().find(|g| g.stats.count > 0) {
        insights.push(Insight {
            kind: InsightKind::Symbol,
            text: format!(
                "가장 수익이 큰 종목은 {} 입니다 (순손익 {}).",
                best.key,
                money(best.stats.sum_pnl)
            ),
        });
    }
    if let Some(worst) = symbols.iter().rev().find(|g| g.stats.count > 0) {
        if worst.stats.sum_pnl < Decimal::ZERO {
            insights.push(Insight {
                kind: InsightKind::Symbol,
                text: format!(
                    "가장 손실이 큰 종목은 {} 입니다 (순손익 {}).",
                    worst.key,
                    money(worst.stats.sum_pnl)
                ),
            });
        }
    }

    // 실수 순위는 손실 영향 순 (센티넬 규칙 반영됨)
    if let Some(top) = mistakes.iter().find(|g| g.stats.sum_loss > Decimal::ZERO) {
        insights.push(Insight {
            kind: InsightKind::Mistake,
            text: format!(
                "'{}' 실수로 인한 손실이 {} 로 가장 큽니다.",
                top.key,
                money(top.stats.sum_loss)
            ),
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::{EmotionLabel, GroupStats};
    use rust_decimal_macros::dec;

    fn perf(emotion: EmotionLabel, pnls: &[Decimal]) -> EmotionPerformance {
        let mut stats = GroupStats::new();
        for pnl in pnls {
            stats.add(*pnl);
        }
        EmotionPerformance {
            emotion,
            win_rate_pct: stats.win_rate_pct(),
            avg_pnl: stats.avg_pnl(),
            stats,
        }
    }

    fn group(key: &str, pnls: &[Decimal]) -> Group<String> {
        let mut stats = GroupStats::new();
        for pnl in pnls {
            stats.add(*pnl);
        }
        Group {
            key: key.to_string(),
            stats,
        }
    }

    #[test]
    fn test_not_enough_data() {
        let insights = generate_insights(&[], &[], &[], 2, 5);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::NotEnoughData);
        assert!(insights[0].text.contains("2건"));
    }

    #[test]
    fn test_best_and_worst_emotion() {
        let emotions = vec![
            perf(EmotionLabel::Positive, &[dec!(100), dec!(50)]),
            perf(EmotionLabel::Neutral, &[]),
            perf(EmotionLabel::Negative, &[dec!(-120)]),
        ];

        let insights = generate_insights(&emotions, &[], &[], 10, 5);

        let texts: Vec<&str> = insights.iter().map(|i| i.text.as_str()).collect();
        assert!(texts.iter().any(|t| t.contains("긍정")));
        assert!(texts.iter().any(|t| t.contains("부정")));
    }

    #[test]
    fn test_symbol_insights_use_rank_order() {
        let symbols = vec![
            group("BTC/USDT", &[dec!(300)]),
            group("ETH/USDT", &[dec!(-100)]),
        ];

        let insights = generate_insights(&[], &symbols, &[], 10, 5);

        assert!(insights.iter().any(|i| i.text.contains("BTC/USDT")));
        assert!(insights.iter().any(|i| i.text.contains("ETH/USDT")));
    }

    #[test]
    fn test_top_mistake() {
        let mistakes = vec![group("revenge_trading", &[dec!(-500)])];

        let insights = generate_insights(&[], &[], &mistakes, 10, 5);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Mistake);
        assert!(insights[0].text.contains("revenge_trading"));
        assert!(insights[0].text.contains("500"));
    }

    #[test]
    fn test_no_insights_on_profitable_only_data() {
        // 손실 그룹이 없으면 경고성 인사이트는 생성되지 않음
        let symbols = vec![group("BTC/USDT", &[dec!(100)])];
        let insights = generate_insights(&[], &symbols, &[], 10, 5);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Symbol);
    }
}
