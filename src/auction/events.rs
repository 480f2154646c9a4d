use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 실시간 채널로 전달되는 행 삽입 이벤트
/// 채널은 모든 경매의 입찰을 하나의 토픽으로 내보내므로
/// 수신 측에서 테이블/이벤트 종류와 경매 id를 직접 걸러야 한다
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RowEvent {
    pub table: String,
    pub event_type: String,
    pub record: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl RowEvent {
    /// 입찰 테이블의 INSERT 이벤트인지
    pub fn is_bid_insert(&self) -> bool {
        self.table == "bids" && self.event_type == "INSERT"
    }
}
