/// 사용자 액션 커맨드 처리
/// 1. 입찰
/// 2. 보증금 납부
/// 3. 낙찰 결제
// region:    --- Imports
use crate::api::ApiClient;
use crate::auction::state::{AuctionState, EndedPanel};
use crate::bidding::model::{Bid, Deposit, PaymentMethod, Transaction};
use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub amount: i64,
}

/// 보증금 납부 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PayDepositCommand {
    pub amount: i64,
}

/// 낙찰 결제 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PayWinningBidCommand {
    pub payment_method: PaymentMethod,
}

/// 1. 입찰
/// 네트워크 호출 전에 보증금과 최소 입찰가를 재검증한다
/// (입력란을 채운 뒤 실시간 이벤트로 최소 입찰가가 올라갔을 수 있다)
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    api: &ApiClient,
    state: &Arc<Mutex<AuctionState>>,
) -> Result<Bid, ActionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let (listing_type, auction_id) = {
        let state = state.lock().expect("상태 잠금 실패");
        state.validate_bid(cmd.amount)?;
        (state.listing_type(), state.auction_id())
    };

    let bid = api.place_bid(listing_type, auction_id, cmd.amount).await?;

    // 서버가 생성한 입찰도 실시간 이벤트와 같은 단조 증가 경로로 반영
    state
        .lock()
        .expect("상태 잠금 실패")
        .apply_bid(bid.clone());

    info!(
        "{:<12} --> 입찰 성공: bid_id={}, amount={}",
        "Command", bid.id, bid.amount
    );
    Ok(bid)
}

/// 2. 보증금 납부
/// 성공하면 입찰 입력이 열리고 클라이언트에서 되돌릴 수 없다
pub async fn handle_pay_deposit(
    cmd: PayDepositCommand,
    api: &ApiClient,
    state: &Arc<Mutex<AuctionState>>,
) -> Result<Deposit, ActionError> {
    info!("{:<12} --> 보증금 납부 처리 시작: {:?}", "Command", cmd);

    let (listing_type, auction_id) = {
        let state = state.lock().expect("상태 잠금 실패");
        (state.listing_type(), state.auction_id())
    };

    let deposit = api
        .pay_deposit(listing_type, auction_id, cmd.amount)
        .await?;

    state.lock().expect("상태 잠금 실패").mark_deposit_paid();

    info!(
        "{:<12} --> 보증금 납부 성공: deposit_id={}",
        "Command", deposit.id
    );
    Ok(deposit)
}

/// 3. 낙찰 결제
/// 낙찰 패널에서만 허용되고, 결제 전에 대기 트랜잭션을 먼저 조회해야 한다
pub async fn handle_pay_winning_bid(
    cmd: PayWinningBidCommand,
    api: &ApiClient,
    state: &Arc<Mutex<AuctionState>>,
) -> Result<Transaction, ActionError> {
    info!("{:<12} --> 낙찰 결제 처리 시작: {:?}", "Command", cmd);

    let (listing_type, auction_id) = {
        let state = state.lock().expect("상태 잠금 실패");
        if state.ended_panel() != Some(EndedPanel::WinnerPayment) {
            warn!("{:<12} --> 낙찰자가 아닌 결제 시도 차단", "Command");
            return Err(ActionError::NotWinner);
        }
        (state.listing_type(), state.auction_id())
    };

    let pending = api
        .find_pending_transaction(auction_id, listing_type)
        .await?;

    let paid = api
        .pay_transaction(pending.id, cmd.payment_method)
        .await?;

    info!(
        "{:<12} --> 낙찰 결제 성공: transaction_id={}",
        "Command", paid.id
    );
    Ok(paid)
}

// endregion: --- Commands
