/// 경매 워치 (상세 화면 뷰모델)
/// 최초 조회, 1초 틱, 실시간 입찰 이벤트 세 입력을 하나의 공유 상태로 합치고
/// 입찰/보증금/낙찰 결제 액션을 제공한다
/// 워치 하나는 경매 하나에 묶인다. 다른 경매로 전환하려면 이 워치를 닫고
/// 새 워치를 열어야 한다 (구독 누수가 생기면 지난 경매의 이벤트를 계속 소비한다)
// region:    --- Imports
use crate::api::ApiClient;
use crate::auction::state::{AuctionPhase, AuctionSnapshot, AuctionState};
use crate::bidding::commands::{
    handle_pay_deposit, handle_pay_winning_bid, handle_place_bid, PayDepositCommand,
    PayWinningBidCommand, PlaceBidCommand,
};
use crate::bidding::model::{Auction, Bid, Deposit, ListingType, PaymentMethod, Transaction};
use crate::error::ActionError;
use crate::realtime::{BidChannel, BidHandler, BidSubscription};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Auction Watch

pub struct AuctionWatch {
    api: Arc<ApiClient>,
    state: Arc<Mutex<AuctionState>>,
    subscription: Option<BidSubscription>,
    ticker: Option<JoinHandle<()>>,
}

impl AuctionWatch {
    /// 경매 id만으로 워치 열기
    /// 상품 종류를 모르므로 전기차/배터리 순서로 조회해 종류를 확정한다
    pub async fn open(
        api: Arc<ApiClient>,
        channel: Arc<dyn BidChannel>,
        auction_id: i64,
    ) -> Result<Self, ActionError> {
        let (listing_type, auction) = api.resolve_auction(auction_id).await?;
        Self::attach(api, channel, auction, listing_type).await
    }

    /// 이미 조회한 경매 스냅샷에 워치 붙이기
    pub async fn attach(
        api: Arc<ApiClient>,
        channel: Arc<dyn BidChannel>,
        auction: Auction,
        listing_type: ListingType,
    ) -> Result<Self, ActionError> {
        let auction_id = auction.id;
        let state = Arc::new(Mutex::new(AuctionState::new(auction, listing_type)));

        // 실시간 이벤트 반영
        // 경매 id 필터와 단조 증가 가드는 apply_bid 안에서 처리된다
        let handler_state = Arc::clone(&state);
        let handler: BidHandler = Arc::new(move |bid: Bid| {
            handler_state
                .lock()
                .expect("상태 잠금 실패")
                .apply_bid(bid);
        });

        // 구독 실패는 로그만 남기고 조회 전용 모드로 계속한다
        let subscription = match channel.subscribe(handler).await {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                error!(
                    "{:<12} --> 실시간 채널 구독 실패, 조회 전용 모드로 동작: {}",
                    "Watch", e
                );
                None
            }
        };

        // 1초마다 남은 시간 재계산, 종료되면 틱 중단
        let ticker_state = Arc::clone(&state);
        let ticker = tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));
            loop {
                tick.tick().await;
                let completed = {
                    let mut state = ticker_state.lock().expect("상태 잠금 실패");
                    state.tick(Utc::now());
                    state.phase() == AuctionPhase::Completed
                };
                if completed {
                    info!("{:<12} --> 경매 종료, 카운트다운 중단", "Watch");
                    break;
                }
            }
        });

        info!("{:<12} --> 경매 워치 열림: id={}", "Watch", auction_id);

        Ok(Self {
            api,
            state,
            subscription,
            ticker: Some(ticker),
        })
    }

    /// 표시용 상태 스냅샷
    pub fn snapshot(&self) -> AuctionSnapshot {
        self.state.lock().expect("상태 잠금 실패").snapshot()
    }

    /// 입찰 입력란 값 설정
    pub fn set_bid_input(&self, amount: i64) {
        self.state
            .lock()
            .expect("상태 잠금 실패")
            .set_bid_input(amount);
    }

    /// 입력란 금액으로 입찰 제출
    /// 입력 후 최소 입찰가가 올라갔을 수 있으므로 제출 시점에 재검증된다
    pub async fn submit_bid(&self) -> Result<Bid, ActionError> {
        let input = self.state.lock().expect("상태 잠금 실패").bid_input();
        match input {
            Some(amount) => self.place_bid(amount).await,
            None => {
                let minimum = self.state.lock().expect("상태 잠금 실패").minimum_bid();
                Err(ActionError::BelowMinimum { minimum })
            }
        }
    }

    /// 입찰
    pub async fn place_bid(&self, amount: i64) -> Result<Bid, ActionError> {
        handle_place_bid(PlaceBidCommand { amount }, &self.api, &self.state).await
    }

    /// 보증금 납부
    pub async fn pay_deposit(&self) -> Result<Deposit, ActionError> {
        let amount = self
            .state
            .lock()
            .expect("상태 잠금 실패")
            .deposit_amount();
        handle_pay_deposit(PayDepositCommand { amount }, &self.api, &self.state).await
    }

    /// 낙찰 결제
    pub async fn pay_winning_bid(
        &self,
        payment_method: PaymentMethod,
    ) -> Result<Transaction, ActionError> {
        handle_pay_winning_bid(
            PayWinningBidCommand { payment_method },
            &self.api,
            &self.state,
        )
        .await
    }

    /// 서버 스냅샷 다시 조회 후 병합
    /// 종료 후 서버가 계산한 사용자 결과를 가져올 때도 사용한다
    /// 입찰 이력은 단조 증가 가드를 거치므로 느린 응답이 상태를 되돌리지 못한다
    pub async fn refresh(&self) -> Result<(), ActionError> {
        let (listing_type, auction_id) = {
            let state = self.state.lock().expect("상태 잠금 실패");
            (state.listing_type(), state.auction_id())
        };

        let snapshot = self.api.fetch_auction(listing_type, auction_id).await?;
        self.state
            .lock()
            .expect("상태 잠금 실패")
            .absorb(snapshot);
        Ok(())
    }

    /// 워치 닫기: 틱 중단, 구독 해제 (정확히 한 번)
    pub fn close(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        info!("{:<12} --> 경매 워치 닫힘", "Watch");
    }
}

impl Drop for AuctionWatch {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        // 구독은 Drop에서 스스로 해제된다
    }
}

// endregion: --- Auction Watch
