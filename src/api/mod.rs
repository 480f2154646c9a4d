/// 경매 백엔드 REST 클라이언트
/// 각 함수는 HTTP 호출 한 번에 대응하고, 재시도/캐싱/배칭 없이
/// 실패를 호출자에게 그대로 전달한다
// region:    --- Imports
use crate::bidding::model::{Auction, Bid, Deposit, ListingType, PaymentMethod, Transaction};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod endpoints;

// endregion: --- Imports

// region:    --- Token Provider

/// 인증 토큰 공급자
/// 토큰 보관/갱신은 외부 시스템 소관이므로 주입 가능한 트레이트로 추상화한다
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// 고정 토큰 공급자 (환경 변수로 주입된 토큰 사용)
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }
}

// endregion: --- Token Provider

// region:    --- Response Envelope

/// 성공 응답 봉투
#[derive(Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    message: String,
    data: T,
}

/// 오류 응답 본문
#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// 본문 없는 오류 응답의 기본 메시지
fn default_status_message(status: StatusCode) -> String {
    if status == StatusCode::NOT_FOUND {
        "not found".to_string()
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        "unauthorized".to_string()
    } else {
        format!("request failed (HTTP {})", status.as_u16())
    }
}

// endregion: --- Response Envelope

// region:    --- Lookup Attempt

/// 상품 종류를 모르는 id 조회의 시도 상태
/// 백엔드가 id만으로 종류를 구분해 주지 않아 최대 두 번 순차 조회한다
enum LookupAttempt {
    First(ListingType),
    Second(ListingType),
    NotFound,
}

// endregion: --- Lookup Attempt

// region:    --- Api Client

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// 경매 상세 조회
    pub async fn fetch_auction(
        &self,
        listing_type: ListingType,
        auction_id: i64,
    ) -> Result<Auction, ApiError> {
        info!(
            "{:<12} --> 경매 상세 조회: type={}, id={}",
            "Api",
            listing_type.as_path(),
            auction_id
        );
        self.get_json(endpoints::auction_detail(
            &self.base_url,
            listing_type,
            auction_id,
        ))
        .await
    }

    /// 상품 종류를 모르는 경매 조회
    /// 전기차로 먼저 조회하고, 없으면 배터리로 한 번 더 조회한다
    pub async fn resolve_auction(
        &self,
        auction_id: i64,
    ) -> Result<(ListingType, Auction), ApiError> {
        let mut attempt = LookupAttempt::First(ListingType::Vehicle);

        loop {
            match attempt {
                LookupAttempt::First(listing_type) => {
                    match self.fetch_auction(listing_type, auction_id).await {
                        Ok(auction) => return Ok((listing_type, auction)),
                        Err(e) if e.is_not_found() => {
                            warn!(
                                "{:<12} --> {} 경매 아님, 다른 종류로 재조회: id={}",
                                "Api",
                                listing_type.as_path(),
                                auction_id
                            );
                            attempt = LookupAttempt::Second(listing_type.alternate());
                        }
                        Err(e) => return Err(e),
                    }
                }
                LookupAttempt::Second(listing_type) => {
                    match self.fetch_auction(listing_type, auction_id).await {
                        Ok(auction) => return Ok((listing_type, auction)),
                        Err(e) if e.is_not_found() => attempt = LookupAttempt::NotFound,
                        Err(e) => return Err(e),
                    }
                }
                LookupAttempt::NotFound => {
                    return Err(ApiError::from_server_message(format!(
                        "auction not found: {}",
                        auction_id
                    )))
                }
            }
        }
    }

    /// 입찰 이력 조회
    pub async fn fetch_bids(
        &self,
        listing_type: ListingType,
        auction_id: i64,
    ) -> Result<Vec<Bid>, ApiError> {
        info!("{:<12} --> 입찰 이력 조회: id={}", "Api", auction_id);
        self.get_json(endpoints::auction_bids(
            &self.base_url,
            listing_type,
            auction_id,
        ))
        .await
    }

    /// 입찰 등록
    pub async fn place_bid(
        &self,
        listing_type: ListingType,
        auction_id: i64,
        amount: i64,
    ) -> Result<Bid, ApiError> {
        info!(
            "{:<12} --> 입찰 요청: id={}, amount={}",
            "Api", auction_id, amount
        );
        self.post_json(
            endpoints::auction_bids(&self.base_url, listing_type, auction_id),
            &serde_json::json!({ "amount": amount }),
        )
        .await
    }

    /// 보증금 납부
    pub async fn pay_deposit(
        &self,
        listing_type: ListingType,
        auction_id: i64,
        amount: i64,
    ) -> Result<Deposit, ApiError> {
        info!(
            "{:<12} --> 보증금 납부 요청: id={}, amount={}",
            "Api", auction_id, amount
        );
        self.post_json(
            endpoints::auction_deposit(&self.base_url, listing_type, auction_id),
            &serde_json::json!({ "amount": amount }),
        )
        .await
    }

    /// 낙찰 결제 대기 트랜잭션 조회
    /// 백엔드에 경매 id로 바로 결제하는 엔드포인트가 없어
    /// 결제 전에 한 번 더 왕복이 필요하다
    pub async fn find_pending_transaction(
        &self,
        auction_id: i64,
        listing_type: ListingType,
    ) -> Result<Transaction, ApiError> {
        info!(
            "{:<12} --> 결제 대기 트랜잭션 조회: auction_id={}",
            "Api", auction_id
        );
        self.get_json(endpoints::pending_transaction(
            &self.base_url,
            auction_id,
            listing_type,
        ))
        .await
    }

    /// 트랜잭션 결제
    pub async fn pay_transaction(
        &self,
        transaction_id: i64,
        payment_method: PaymentMethod,
    ) -> Result<Transaction, ApiError> {
        info!(
            "{:<12} --> 트랜잭션 결제 요청: id={}",
            "Api", transaction_id
        );
        self.post_json(
            endpoints::pay_transaction(&self.base_url, transaction_id),
            &serde_json::json!({ "paymentMethod": payment_method }),
        )
        .await
    }

    /// GET 요청
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let token = self.tokens.access_token().await?;
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    /// POST 요청
    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// 응답 해석: 성공이면 봉투에서 data를 꺼내고,
    /// 실패면 서버 메시지를 분류해 오류로 변환한다
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)?;
            debug!("{:<12} --> 응답: {}", "Api", envelope.message);
            return Ok(envelope.data);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    default_status_message(status)
                } else {
                    body.clone()
                }
            });

        warn!("{:<12} --> 서버 거절: status={}, {}", "Api", status, message);
        Err(ApiError::from_server_message(message))
    }
}

// endregion: --- Api Client
