// region:    --- Imports
use thiserror::Error;

// endregion: --- Imports

// region:    --- Server Error Classification

/// 서버 거절 사유 분류
/// 서버 오류 메시지의 부분 문자열 매칭으로 분류한다 (메시지 문구와 결합된
/// 취약한 방식이지만 백엔드가 오류 코드를 항상 내려주지 않는다)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    InsufficientBalance,
    AlreadyDeposited,
    AuctionEnded,
    AuctionNotStarted,
    DepositRequired,
    OwnAuction,
    AlreadyHighestBidder,
    BidTooLow,
    Unauthorized,
    NotFound,
    Unknown,
}

impl ServerErrorKind {
    /// 서버 오류 메시지 분류
    /// 매칭 순서 주의: "already deposited"는 "deposit"보다 먼저 검사해야 한다
    pub fn classify(message: &str) -> Self {
        let msg = message.to_lowercase();

        if msg.contains("insufficient") {
            ServerErrorKind::InsufficientBalance
        } else if msg.contains("already deposited") || msg.contains("deposit already") {
            ServerErrorKind::AlreadyDeposited
        } else if msg.contains("already the highest") || msg.contains("highest bidder") {
            ServerErrorKind::AlreadyHighestBidder
        } else if msg.contains("expired") || msg.contains("ended") {
            ServerErrorKind::AuctionEnded
        } else if msg.contains("not started") || msg.contains("not yet started") {
            ServerErrorKind::AuctionNotStarted
        } else if msg.contains("own auction") || msg.contains("your own") {
            ServerErrorKind::OwnAuction
        } else if msg.contains("deposit") {
            ServerErrorKind::DepositRequired
        } else if msg.contains("too low") || msg.contains("minimum") || msg.contains("lower") {
            ServerErrorKind::BidTooLow
        } else if msg.contains("unauthorized") || msg.contains("token") {
            ServerErrorKind::Unauthorized
        } else if msg.contains("not found") {
            ServerErrorKind::NotFound
        } else {
            ServerErrorKind::Unknown
        }
    }

    /// 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            ServerErrorKind::InsufficientBalance => "INSUFFICIENT_BALANCE",
            ServerErrorKind::AlreadyDeposited => "ALREADY_DEPOSITED",
            ServerErrorKind::AuctionEnded => "ALREADY_ENDED",
            ServerErrorKind::AuctionNotStarted => "NOT_STARTED",
            ServerErrorKind::DepositRequired => "DEPOSIT_REQUIRED",
            ServerErrorKind::OwnAuction => "OWN_AUCTION",
            ServerErrorKind::AlreadyHighestBidder => "ALREADY_HIGHEST",
            ServerErrorKind::BidTooLow => "LOW_BID",
            ServerErrorKind::Unauthorized => "UNAUTHORIZED",
            ServerErrorKind::NotFound => "NOT_FOUND",
            ServerErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// 사용자에게 표시할 메시지
    pub fn user_message(&self) -> &'static str {
        match self {
            ServerErrorKind::InsufficientBalance => "지갑 잔액이 부족합니다.",
            ServerErrorKind::AlreadyDeposited => "이미 보증금을 납부했습니다.",
            ServerErrorKind::AuctionEnded => "경매가 이미 종료되었습니다.",
            ServerErrorKind::AuctionNotStarted => "경매가 아직 시작되지 않았습니다.",
            ServerErrorKind::DepositRequired => "먼저 보증금을 납부해야 합니다.",
            ServerErrorKind::OwnAuction => "본인 경매에는 입찰할 수 없습니다.",
            ServerErrorKind::AlreadyHighestBidder => "이미 최고 입찰자입니다.",
            ServerErrorKind::BidTooLow => "입찰 금액이 최소 입찰가보다 낮습니다.",
            ServerErrorKind::Unauthorized => "로그인이 필요합니다.",
            ServerErrorKind::NotFound => "경매를 찾을 수 없습니다.",
            ServerErrorKind::Unknown => "요청을 처리하지 못했습니다. 다시 시도해 주세요.",
        }
    }

    /// 잔액 부족일 때만 지갑 충전 페이지 경로를 안내
    pub fn wallet_topup_hint(&self) -> Option<&'static str> {
        match self {
            ServerErrorKind::InsufficientBalance => Some("/wallet/topup"),
            _ => None,
        }
    }
}

// endregion: --- Server Error Classification

// region:    --- Api Error

/// API 호출 오류
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("네트워크 오류: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Server {
        kind: ServerErrorKind,
        message: String,
    },

    #[error("응답 해석 실패: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// 서버 오류 메시지로부터 분류된 오류 생성
    pub fn from_server_message(message: String) -> Self {
        ApiError::Server {
            kind: ServerErrorKind::classify(&message),
            message,
        }
    }

    /// 분류 결과 (네트워크/해석 오류는 Unknown)
    pub fn kind(&self) -> ServerErrorKind {
        match self {
            ApiError::Server { kind, .. } => *kind,
            _ => ServerErrorKind::Unknown,
        }
    }

    /// 조회 대상이 없는 경우인지
    pub fn is_not_found(&self) -> bool {
        self.kind() == ServerErrorKind::NotFound
    }
}

// endregion: --- Api Error

// region:    --- Action Error

/// 사용자 액션 오류
/// 네트워크 호출 전에 차단되는 클라이언트 검증 오류와 서버 거절을 모두 포함
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("먼저 보증금을 납부해야 합니다.")]
    DepositRequired,

    #[error("입찰 금액은 최소 {minimum} 이상이어야 합니다.")]
    BelowMinimum { minimum: i64 },

    #[error("낙찰자만 결제할 수 있습니다.")]
    NotWinner,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ActionError {
    /// 토스트로 표시할 메시지
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Api(api) => match api {
                ApiError::Server { kind, .. } => kind.user_message().to_string(),
                ApiError::Network(_) => "네트워크 연결을 확인해 주세요.".to_string(),
                ApiError::Decode(_) => {
                    "요청을 처리하지 못했습니다. 다시 시도해 주세요.".to_string()
                }
            },
            other => other.to_string(),
        }
    }

    /// 잔액 부족 오류일 때 지갑 충전 경로
    pub fn wallet_topup_hint(&self) -> Option<&'static str> {
        match self {
            ActionError::Api(api) => api.kind().wallet_topup_hint(),
            _ => None,
        }
    }
}

// endregion: --- Action Error
