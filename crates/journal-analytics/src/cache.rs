//! 리포트 메모이제이션 캐시.
//!
//! (사용자 ID, 데이터 버전) 지문으로 계산 결과를 재사용합니다.
//! 전역 싱글턴이 아니라 호출자가 명시적으로 들고 다니는 값입니다.
//! 데이터 변경 알림을 받으면 호출자가 새 버전 지문으로 다시
//! 조회하거나 [`AnalyticsCache::invalidate_user`]를 호출합니다.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::report::AnalyticsReport;

/// 캐시 키 지문.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// 사용자 식별자
    pub user_id: String,
    /// 데이터 버전 (스냅샷이 바뀔 때마다 증가)
    pub data_version: u64,
}

impl Fingerprint {
    /// 새 지문을 생성합니다.
    pub fn new(user_id: impl Into<String>, data_version: u64) -> Self {
        Self {
            user_id: user_id.into(),
            data_version,
        }
    }
}

/// 분석 리포트 캐시.
///
/// 용량을 넘으면 가장 오래 전에 삽입된 항목부터 제거합니다.
#[derive(Debug, Clone)]
pub struct AnalyticsCache {
    capacity: usize,
    map: HashMap<Fingerprint, Arc<AnalyticsReport>>,
    insertion_order: VecDeque<Fingerprint>,
}

impl AnalyticsCache {
    /// 주어진 용량의 캐시를 생성합니다 (용량 0은 1로 올림).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            map: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    /// 캐시된 리포트를 조회합니다.
    pub fn get(&self, key: &Fingerprint) -> Option<Arc<AnalyticsReport>> {
        self.map.get(key).cloned()
    }

    /// 캐시에서 찾거나, 없으면 계산해서 저장합니다.
    pub fn get_or_compute<F>(&mut self, key: Fingerprint, compute: F) -> Arc<AnalyticsReport>
    where
        F: FnOnce() -> AnalyticsReport,
    {
        if let Some(report) = self.map.get(&key) {
            debug!(user_id = %key.user_id, data_version = key.data_version, "Analytics cache hit");
            return Arc::clone(report);
        }

        debug!(user_id = %key.user_id, data_version = key.data_version, "Analytics cache miss");
        let report = Arc::new(compute());
        self.insert(key, Arc::clone(&report));
        report
    }

    fn insert(&mut self, key: Fingerprint, report: Arc<AnalyticsReport>) {
        while self.insertion_order.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.map.remove(&oldest);
                debug!(user_id = %oldest.user_id, "Analytics cache evicted oldest entry");
            }
        }

        self.insertion_order.push_back(key.clone());
        self.map.insert(key, report);
    }

    /// 특정 사용자의 모든 버전을 무효화합니다.
    pub fn invalidate_user(&mut self, user_id: &str) {
        self.map.retain(|key, _| key.user_id != user_id);
        self.insertion_order.retain(|key| key.user_id != user_id);
    }

    /// 보관 중인 항목 수.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 캐시가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
