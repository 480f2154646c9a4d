use async_trait::async_trait;
use auction_client::api::{ApiClient, StaticTokenProvider};
use auction_client::bidding::model::{
    Auction, Bid, Deposit, DepositStatus, ListingType,
};
use auction_client::error::ActionError;
use auction_client::realtime::{BidChannel, BidHandler, BidSubscription};
use auction_client::watch::AuctionWatch;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 시나리오: 시작가 100, 증분 10, 보증금 납부 완료 상태에서
/// 이 경매의 실시간 입찰 120 수신 -> 현재가 120, 최소 입찰가 130
/// 다른 경매의 입찰 500 수신 -> 변화 없음
/// 125 입찰 제출 -> 네트워크 호출 없이 클라이언트에서 거절
#[tokio::test]
async fn test_realtime_bid_scenario() {
    let channel = Arc::new(MockChannel::new());
    let watch = AuctionWatch::attach(
        offline_api(),
        channel.clone(),
        deposited_auction(1, 100, 10),
        ListingType::Vehicle,
    )
    .await
    .expect("워치 열기 실패");

    // 이 경매의 실시간 입찰
    channel.push(vehicle_bid(10, 120, 1));
    let snapshot = watch.snapshot();
    assert_eq!(snapshot.current_bid, 120);
    assert_eq!(snapshot.minimum_bid, 130);

    // 다른 경매의 실시간 입찰은 무시된다
    channel.push(vehicle_bid(11, 500, 99));
    let snapshot = watch.snapshot();
    assert_eq!(snapshot.current_bid, 120);
    assert_eq!(snapshot.minimum_bid, 130);

    // 최소 입찰가 미만은 네트워크 호출 전에 거절된다
    // (API 클라이언트는 연결할 수 없는 주소를 가리키고 있다)
    let err = watch.place_bid(125).await.expect_err("거절되어야 함");
    assert!(matches!(err, ActionError::BelowMinimum { minimum: 130 }));
}

/// 입력란을 채운 뒤 최소 입찰가가 올라가면 제출 시점에 다시 거절된다
#[tokio::test]
async fn test_submit_revalidates_after_realtime_advance() {
    let channel = Arc::new(MockChannel::new());
    let watch = AuctionWatch::attach(
        offline_api(),
        channel.clone(),
        deposited_auction(1, 100, 10),
        ListingType::Vehicle,
    )
    .await
    .expect("워치 열기 실패");

    // 입력 시점에는 유효한 금액
    watch.set_bid_input(110);

    // 제출 전에 실시간 입찰이 최소 입찰가를 올린다
    channel.push(vehicle_bid(10, 120, 1));

    let err = watch.submit_bid().await.expect_err("거절되어야 함");
    assert!(matches!(err, ActionError::BelowMinimum { minimum: 130 }));
}

/// 보증금 없이는 입찰이 네트워크 호출 전에 차단된다
#[tokio::test]
async fn test_bid_without_deposit_blocked() {
    let channel = Arc::new(MockChannel::new());
    let mut auction = deposited_auction(1, 100, 10);
    auction.deposit = None;

    let watch = AuctionWatch::attach(offline_api(), channel, auction, ListingType::Vehicle)
        .await
        .expect("워치 열기 실패");

    let err = watch.place_bid(200).await.expect_err("거절되어야 함");
    assert!(matches!(err, ActionError::DepositRequired));
}

/// 워치를 닫으면 구독 해제가 정확히 한 번 일어나고 틱이 멈춘다
#[tokio::test]
async fn test_close_unsubscribes_once_and_stops_ticker() {
    let channel = Arc::new(MockChannel::new());
    let mut watch = AuctionWatch::attach(
        offline_api(),
        channel.clone(),
        deposited_auction(1, 100, 10),
        ListingType::Vehicle,
    )
    .await
    .expect("워치 열기 실패");

    let before = watch.snapshot().countdown.expect("진행 중이어야 함");

    watch.close();
    assert_eq!(channel.unsubscribe_count(), 1);

    // 틱이 살아 있었다면 카운트다운이 줄어들었을 시간
    tokio::time::sleep(tokio::time::Duration::from_millis(1500)).await;
    assert_eq!(watch.snapshot().countdown, Some(before));

    // 떨어뜨려도 두 번 해제되지 않는다
    drop(watch);
    assert_eq!(channel.unsubscribe_count(), 1);
}

/// 명시적으로 닫지 않고 떨어뜨려도 구독은 한 번 해제된다
#[tokio::test]
async fn test_drop_releases_subscription() {
    let channel = Arc::new(MockChannel::new());
    let watch = AuctionWatch::attach(
        offline_api(),
        channel.clone(),
        deposited_auction(1, 100, 10),
        ListingType::Vehicle,
    )
    .await
    .expect("워치 열기 실패");

    drop(watch);
    assert_eq!(channel.unsubscribe_count(), 1);
}

/// 채널 구독에 실패해도 워치는 조회 전용 모드로 열린다
#[tokio::test]
async fn test_subscribe_failure_degrades_to_fetch_only() {
    let channel = Arc::new(BrokenChannel);
    let watch = AuctionWatch::attach(
        offline_api(),
        channel,
        deposited_auction(1, 100, 10),
        ListingType::Vehicle,
    )
    .await
    .expect("구독 실패는 치명적이지 않아야 함");

    let snapshot = watch.snapshot();
    assert_eq!(snapshot.current_bid, 100);
    assert_eq!(snapshot.minimum_bid, 110);
}

// region:    --- Test Doubles

/// 실시간 채널 목: 핸들러를 붙잡아 두고 테스트가 직접 이벤트를 밀어 넣는다
struct MockChannel {
    handler: Arc<Mutex<Option<BidHandler>>>,
    unsubscribes: Arc<AtomicUsize>,
}

impl MockChannel {
    fn new() -> Self {
        Self {
            handler: Arc::new(Mutex::new(None)),
            unsubscribes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 입찰 이벤트 주입
    fn push(&self, bid: Bid) {
        let handler = self.handler.lock().unwrap();
        if let Some(handler) = handler.as_ref() {
            handler(bid);
        }
    }

    fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BidChannel for MockChannel {
    async fn subscribe(&self, handler: BidHandler) -> Result<BidSubscription, String> {
        *self.handler.lock().unwrap() = Some(handler);
        let unsubscribes = Arc::clone(&self.unsubscribes);
        let slot = Arc::clone(&self.handler);
        Ok(BidSubscription::new(move || {
            unsubscribes.fetch_add(1, Ordering::SeqCst);
            *slot.lock().unwrap() = None;
        }))
    }
}

/// 항상 실패하는 채널
struct BrokenChannel;

#[async_trait]
impl BidChannel for BrokenChannel {
    async fn subscribe(&self, _handler: BidHandler) -> Result<BidSubscription, String> {
        Err("채널 연결 실패".to_string())
    }
}

// endregion: --- Test Doubles

// region:    --- Test Helpers

/// 연결할 수 없는 주소를 가리키는 API 클라이언트
/// 클라이언트 검증을 통과한 요청이 실수로 네트워크를 타면 테스트가 실패한다
fn offline_api() -> Arc<ApiClient> {
    Arc::new(ApiClient::new(
        "http://127.0.0.1:9",
        Arc::new(StaticTokenProvider::new("test-token")),
    ))
}

/// 보증금 납부가 끝난 진행 중 경매
fn deposited_auction(id: i64, starting_price: i64, bid_increment: i64) -> Auction {
    Auction {
        id,
        starting_price,
        bid_increment,
        deposit_amount: 50,
        start_time: Utc::now() - Duration::hours(1),
        end_time: Utc::now() + Duration::hours(1),
        verified: true,
        seller_id: 2,
        bids: Vec::new(),
        deposit: Some(Deposit {
            id: 7,
            amount: 50,
            status: DepositStatus::Paid,
            user_id: 3,
            vehicle_id: Some(id),
            battery_id: None,
        }),
        user_auction_result: None,
    }
}

/// 전기차 경매 소속 입찰
fn vehicle_bid(id: i64, amount: i64, vehicle_id: i64) -> Bid {
    Bid {
        id,
        amount,
        created_by: 4,
        created_at: Utc::now(),
        vehicle_id: Some(vehicle_id),
        battery_id: None,
    }
}

// endregion: --- Test Helpers
