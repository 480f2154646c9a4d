/// 경매 화면 상태 조정기
/// 최초 조회, 1초 틱, 실시간 입찰 이벤트 세 입력을 하나의 일관된
/// "현재 입찰가 / 남은 시간 / 입찰 가능 여부" 상태로 합친다
// region:    --- Imports
use crate::bidding::model::{Auction, Bid, DepositStatus, ListingType, UserAuctionResult};
use crate::error::ActionError;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Countdown

/// 경매 진행 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionPhase {
    /// 시작 전: 시작 시각까지 카운트다운
    Scheduled,
    /// 진행 중: 종료 시각까지 카운트다운
    Active,
    /// 종료
    Completed,
}

/// 남은 시간 분해
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    fn from_seconds(total: i64) -> Self {
        Countdown {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

/// 현재 시각 기준 단계와 카운트다운 계산
/// 시작 전이면 시작 시각, 진행 중이면 종료 시각을 목표로 하고
/// 종료 후에는 카운트다운이 없다
pub fn compute_countdown(
    now: DateTime<Utc>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> (AuctionPhase, Option<Countdown>) {
    if now < start_time {
        let remaining = (start_time - now).num_seconds();
        (AuctionPhase::Scheduled, Some(Countdown::from_seconds(remaining)))
    } else if now < end_time {
        let remaining = (end_time - now).num_seconds();
        (AuctionPhase::Active, Some(Countdown::from_seconds(remaining)))
    } else {
        (AuctionPhase::Completed, None)
    }
}

// endregion: --- Countdown

// region:    --- Ended Panel

/// 종료 후 표시할 패널
/// 서버가 계산한 사용자 결과만으로 선택된다
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndedPanel {
    /// 낙찰: 결제 액션 노출
    WinnerPayment,
    /// 패찰: 보증금 환불 안내
    RefundAfterLoss,
    /// 입찰 없음: 보증금 환불 안내
    RefundNoBids,
    /// 결과 없음: 일반 종료 안내
    Closed,
}

// endregion: --- Ended Panel

// region:    --- Auction State

/// 화면 상태 스냅샷 (표시용 복사본)
#[derive(Debug, Clone)]
pub struct AuctionSnapshot {
    pub auction_id: i64,
    pub listing_type: ListingType,
    pub seller_id: i64,
    pub verified: bool,
    pub current_bid: i64,
    pub minimum_bid: i64,
    pub phase: AuctionPhase,
    pub countdown: Option<Countdown>,
    pub has_deposit: bool,
    pub bid_count: usize,
    pub user_result: Option<UserAuctionResult>,
    pub ended_panel: Option<EndedPanel>,
}

/// 경매 화면 상태
pub struct AuctionState {
    auction: Auction,
    listing_type: ListingType,
    bids: Vec<Bid>,
    current_bid: i64,
    has_deposit: bool,
    phase: AuctionPhase,
    countdown: Option<Countdown>,
    // 입찰 입력란의 대기 금액
    bid_input: Option<i64>,
}

impl AuctionState {
    /// 서버 스냅샷으로 상태 생성
    pub fn new(auction: Auction, listing_type: ListingType) -> Self {
        let has_deposit = auction
            .deposit
            .as_ref()
            .map(|d| d.status == DepositStatus::Paid)
            .unwrap_or(false);

        let mut state = AuctionState {
            current_bid: auction.starting_price,
            has_deposit,
            phase: AuctionPhase::Scheduled,
            countdown: None,
            bids: Vec::new(),
            bid_input: None,
            listing_type,
            auction,
        };

        // 조회된 입찰 이력도 실시간 이벤트와 같은 경로로 반영
        let initial_bids = std::mem::take(&mut state.auction.bids);
        for bid in initial_bids {
            state.apply_bid(bid);
        }
        state.tick(Utc::now());
        state
    }

    pub fn auction_id(&self) -> i64 {
        self.auction.id
    }

    pub fn listing_type(&self) -> ListingType {
        self.listing_type
    }

    pub fn deposit_amount(&self) -> i64 {
        self.auction.deposit_amount
    }

    pub fn current_bid(&self) -> i64 {
        self.current_bid
    }

    /// 다음 최소 입찰가
    pub fn minimum_bid(&self) -> i64 {
        self.current_bid + self.auction.bid_increment
    }

    pub fn has_deposit(&self) -> bool {
        self.has_deposit
    }

    pub fn phase(&self) -> AuctionPhase {
        self.phase
    }

    pub fn user_result(&self) -> Option<UserAuctionResult> {
        self.auction.user_auction_result
    }

    /// 입찰 이벤트 반영
    /// 다른 경매의 이벤트는 무시하고, id로 중복을 제거하며,
    /// 표시 중인 현재 입찰가보다 낮은 금액은 출처와 무관하게 버린다
    /// (늦게 도착한 조회 결과가 더 새로운 실시간 입찰가를 되돌리지 못하게 하는
    /// 단조 증가 가드)
    pub fn apply_bid(&mut self, bid: Bid) -> bool {
        if bid.parent_id(self.listing_type) != Some(self.auction.id) {
            debug!(
                "{:<12} --> 다른 경매의 입찰 이벤트 무시: bid_id={}",
                "State", bid.id
            );
            return false;
        }

        if self.bids.iter().any(|b| b.id == bid.id) {
            debug!("{:<12} --> 중복 입찰 이벤트 무시: bid_id={}", "State", bid.id);
            return false;
        }

        if bid.amount < self.current_bid {
            debug!(
                "{:<12} --> 현재 입찰가보다 낮은 이벤트 무시: amount={}, current={}",
                "State", bid.amount, self.current_bid
            );
            return false;
        }

        self.current_bid = bid.amount;
        self.bids.push(bid);
        self.bids.sort_by(|a, b| b.amount.cmp(&a.amount));

        info!(
            "{:<12} --> 현재 입찰가 갱신: {}, 다음 최소 입찰가: {}",
            "State",
            self.current_bid,
            self.minimum_bid()
        );
        true
    }

    /// 1초 틱: 단계와 카운트다운 재계산
    /// 종료로 넘어가는 틱에서 true를 반환한다
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let (phase, countdown) =
            compute_countdown(now, self.auction.start_time, self.auction.end_time);
        let just_completed =
            phase == AuctionPhase::Completed && self.phase != AuctionPhase::Completed;
        self.phase = phase;
        self.countdown = countdown;
        just_completed
    }

    /// 입찰 입력란 값 설정
    pub fn set_bid_input(&mut self, amount: i64) {
        self.bid_input = Some(amount);
    }

    pub fn bid_input(&self) -> Option<i64> {
        self.bid_input
    }

    /// 입찰 사전 검증 (네트워크 호출 전)
    /// 실시간 이벤트로 최소 입찰가가 올라갔을 수 있으므로 제출 시점에 재검증한다
    pub fn validate_bid(&self, amount: i64) -> Result<(), ActionError> {
        if !self.has_deposit {
            return Err(ActionError::DepositRequired);
        }
        let minimum = self.minimum_bid();
        if amount < minimum {
            return Err(ActionError::BelowMinimum { minimum });
        }
        Ok(())
    }

    /// 보증금 납부 완료 처리 (클라이언트에서 되돌릴 수 없음)
    pub fn mark_deposit_paid(&mut self) {
        self.has_deposit = true;
    }

    /// 종료 후 패널 선택
    /// 종료 전에는 None, 종료 후에는 사용자 결과만으로 결정된다
    pub fn ended_panel(&self) -> Option<EndedPanel> {
        if self.phase != AuctionPhase::Completed {
            return None;
        }
        Some(match self.auction.user_auction_result {
            Some(UserAuctionResult::Won) => EndedPanel::WinnerPayment,
            Some(UserAuctionResult::Lost) => EndedPanel::RefundAfterLoss,
            Some(UserAuctionResult::NoBids) => EndedPanel::RefundNoBids,
            None => EndedPanel::Closed,
        })
    }

    /// 다시 조회한 서버 스냅샷 병합
    /// 입찰 이력은 단조 증가 가드를 거치므로 느린 조회 응답이
    /// 실시간으로 갱신된 입찰가를 되돌릴 수 없다
    pub fn absorb(&mut self, snapshot: Auction) {
        for bid in snapshot.bids {
            self.apply_bid(bid);
        }
        if let Some(deposit) = &snapshot.deposit {
            if deposit.status == DepositStatus::Paid {
                self.has_deposit = true;
            }
        }
        if snapshot.user_auction_result.is_some() {
            self.auction.user_auction_result = snapshot.user_auction_result;
        }
        self.auction.start_time = snapshot.start_time;
        self.auction.end_time = snapshot.end_time;
    }

    /// 표시용 스냅샷 복사
    pub fn snapshot(&self) -> AuctionSnapshot {
        AuctionSnapshot {
            auction_id: self.auction.id,
            listing_type: self.listing_type,
            seller_id: self.auction.seller_id,
            verified: self.auction.verified,
            current_bid: self.current_bid,
            minimum_bid: self.minimum_bid(),
            phase: self.phase,
            countdown: self.countdown,
            has_deposit: self.has_deposit,
            bid_count: self.bids.len(),
            user_result: self.auction.user_auction_result,
            ended_panel: self.ended_panel(),
        }
    }
}

// endregion: --- Auction State
