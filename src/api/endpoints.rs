use crate::bidding::model::ListingType;

/// 경매 상세 조회
pub fn auction_detail(base: &str, listing_type: ListingType, auction_id: i64) -> String {
    format!("{}/auctions/{}/{}", base, listing_type.as_path(), auction_id)
}

/// 입찰 이력 조회 / 입찰 등록
pub fn auction_bids(base: &str, listing_type: ListingType, auction_id: i64) -> String {
    format!(
        "{}/auctions/{}/{}/bids",
        base,
        listing_type.as_path(),
        auction_id
    )
}

/// 보증금 납부
pub fn auction_deposit(base: &str, listing_type: ListingType, auction_id: i64) -> String {
    format!(
        "{}/auctions/{}/{}/deposit",
        base,
        listing_type.as_path(),
        auction_id
    )
}

/// 낙찰 결제 대기 트랜잭션 조회
pub fn pending_transaction(base: &str, auction_id: i64, listing_type: ListingType) -> String {
    format!(
        "{}/transactions/pending?auctionId={}&itemType={}",
        base,
        auction_id,
        listing_type.as_path()
    )
}

/// 트랜잭션 결제
pub fn pay_transaction(base: &str, transaction_id: i64) -> String {
    format!("{}/transactions/{}/pay", base, transaction_id)
}
