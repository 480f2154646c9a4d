use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상품 종류 (전기차 | 배터리)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Vehicle,
    Battery,
}

impl ListingType {
    /// REST 경로 세그먼트
    pub fn as_path(&self) -> &'static str {
        match self {
            ListingType::Vehicle => "vehicle",
            ListingType::Battery => "battery",
        }
    }

    /// 상품 종류를 모를 때 재시도할 나머지 종류
    pub fn alternate(&self) -> ListingType {
        match self {
            ListingType::Vehicle => ListingType::Battery,
            ListingType::Battery => ListingType::Vehicle,
        }
    }
}

// 경매 종료 후 서버가 계산한 사용자 결과
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAuctionResult {
    Won,
    Lost,
    NoBids,
}

// 보증금 상태
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositStatus {
    Paid,
    Pending,
    Refunded,
}

// 경매 모델 (서버 스냅샷)
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: i64,
    pub starting_price: i64,
    pub bid_increment: i64,
    pub deposit_amount: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub verified: bool,
    pub seller_id: i64,
    #[serde(default)]
    pub bids: Vec<Bid>,
    // 현재 사용자의 보증금 (없으면 null)
    #[serde(default)]
    pub deposit: Option<Deposit>,
    // 경매 종료 전에는 null
    #[serde(default)]
    pub user_auction_result: Option<UserAuctionResult>,
}

// 입찰 모델
// vehicle_id와 battery_id는 상호 배타적인 외래 키
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: i64,
    pub amount: i64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub battery_id: Option<i64>,
}

impl Bid {
    /// 상품 종류에 해당하는 부모 경매 id
    pub fn parent_id(&self, listing_type: ListingType) -> Option<i64> {
        match listing_type {
            ListingType::Vehicle => self.vehicle_id,
            ListingType::Battery => self.battery_id,
        }
    }
}

// 보증금 모델
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: i64,
    pub amount: i64,
    pub status: DepositStatus,
    pub user_id: i64,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub battery_id: Option<i64>,
}

// 낙찰 결제 대기 트랜잭션 모델
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub amount: i64,
    pub status: String,
    pub auction_id: i64,
    pub item_type: ListingType,
}

// 결제 수단
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Wallet,
}
