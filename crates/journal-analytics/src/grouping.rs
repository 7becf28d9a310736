//! 그룹화 및 축약.
//!
//! 엔트리에서 펼쳐낸 매매들을 그룹화 키(감정, 종목, 활동 태그 등)로
//! 분할하고 그룹별 [`GroupStats`]로 축약합니다. 그룹은 최초 등장
//! 순서를 유지하며, 순위 정렬은 안정 정렬이라 동률은 등장 순서를
//! 보존합니다.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use journal_core::{GroupStats, JournalEntry, Trade};

/// 실수 분류 센티넬: 보복 매매.
pub const REVENGE_TRADING: &str = "revenge_trading";
/// 실수 분류 센티넬: 손절선 이동.
pub const MOVING_STOP_LOSS: &str = "moving_stop_loss";

/// 부모 엔트리 문맥이 붙은 매매 참조.
///
/// 감정/태그/시간 구간 키는 매매가 아니라 부모 엔트리에 있으므로,
/// 펼친 뒤에도 부모를 함께 들고 다닙니다.
#[derive(Debug, Clone, Copy)]
pub struct TradeCtx<'a> {
    /// 매매
    pub trade: &'a Trade,
    /// 부모 저널 엔트리
    pub entry: &'a JournalEntry,
}

/// 키별 그룹 집계 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group<K> {
    /// 그룹화 키
    pub key: K,
    /// 집계
    pub stats: GroupStats,
}

/// 엔트리 목록에서 모든 매매를 등장 순서대로 펼칩니다.
pub fn flatten_trades(entries: &[JournalEntry]) -> Vec<TradeCtx<'_>> {
    entries
        .iter()
        .flat_map(|entry| entry.trades.iter().map(move |trade| TradeCtx { trade, entry }))
        .collect()
}

/// 매매를 키 함수로 그룹화하고 그룹별로 축약합니다.
///
/// 키 함수는 매매 하나가 속하는 키 목록을 반환합니다 (태그류 키는
/// 하나의 매매가 여러 그룹에 속할 수 있음). 미청산 매매는 손익
/// 집계에 기여하지 않으므로 건너뜁니다.
///
/// # Returns
///
/// 최초 등장 순서의 그룹 목록
pub fn group_trades<'a, K, F>(trades: &[TradeCtx<'a>], key_fn: F) -> Vec<Group<K>>
where
    K: Clone + Eq + Hash,
    F: Fn(&TradeCtx<'a>) -> Vec<K>,
{
    let mut groups: Vec<Group<K>> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for ctx in trades {
        if !ctx.trade.is_closed() {
            continue;
        }

        for key in key_fn(ctx) {
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    key,
                    stats: GroupStats::new(),
                });
                groups.len() - 1
            });

            groups[slot].stats.add(ctx.trade.pnl);
        }
    }

    groups
}

/// 순손익 내림차순 순위 (동률은 등장 순서 유지).
pub fn rank_by_net_pnl<K>(mut groups: Vec<Group<K>>) -> Vec<Group<K>> {
    groups.sort_by(|a, b| b.stats.sum_pnl.cmp(&a.stats.sum_pnl));
    groups
}

/// 실수 분류 순위: 손실 영향 내림차순 + 고정 센티넬 순서.
///
/// [`REVENGE_TRADING`]은 [`MOVING_STOP_LOSS`]보다 항상 먼저
/// 표시됩니다. 이 한 쌍에 대해서만 수치 정렬을 무시하며, 나머지
/// 비교는 모두 손실 내림차순입니다. 비교자에 섞으면 전순서가
/// 깨지므로 정렬 후 재배치로 구현합니다.
pub fn rank_mistakes(mut groups: Vec<Group<String>>) -> Vec<Group<String>> {
    groups.sort_by(|a, b| b.stats.sum_loss.cmp(&a.stats.sum_loss));

    let revenge = groups.iter().position(|g| g.key == REVENGE_TRADING);
    let moving = groups.iter().position(|g| g.key == MOVING_STOP_LOSS);

    if let (Some(r), Some(m)) = (revenge, moving) {
        if m < r {
            let group = groups.remove(r);
            groups.insert(m, group);
        }
    }

    groups
}

/// 종목별 그룹화 키 (빈 종목명은 제외).
pub fn by_symbol(ctx: &TradeCtx<'_>) -> Vec<String> {
    if ctx.trade.symbol.is_empty() {
        Vec::new()
    } else {
        vec![ctx.trade.symbol.clone()]
    }
}

/// 장전 활동 태그 그룹화 키.
pub fn by_activity(ctx: &TradeCtx<'_>) -> Vec<String> {
    ctx.entry.pre_trading_activities.clone()
}

/// 실수 분류 태그 그룹화 키.
pub fn by_mistake(ctx: &TradeCtx<'_>) -> Vec<String> {
    ctx.entry.mistakes.clone()
}
