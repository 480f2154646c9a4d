// region:    --- Imports
use std::env;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Config

/// 실행 환경 설정
/// 전부 환경 변수에서 읽고, 비밀값이 아닌 항목은 기본값을 로그로 남긴다
pub struct Config {
    pub api_base_url: String,
    pub kafka_brokers: String,
    pub bid_topic: String,
    pub kafka_group_id: String,
    pub auth_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: load_or_default("API_BASE_URL", "http://localhost:8000"),
            kafka_brokers: load_or_default("KAFKA_BROKERS", "localhost:9092"),
            bid_topic: load_or_default("BID_TOPIC", "bids"),
            kafka_group_id: load_or_default("KAFKA_GROUP_ID", "bid-watch-group"),
            auth_token: env::var("AUTH_TOKEN").unwrap_or_else(|_| {
                warn!(
                    "{:<12} --> AUTH_TOKEN 미설정, 인증 없는 요청은 거절될 수 있음",
                    "Config"
                );
                String::new()
            }),
        }
    }
}

/// 환경 변수 조회, 없으면 기본값 사용
fn load_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!(
            "{:<12} --> {} 미설정, 기본값 사용: {}",
            "Config", key, default
        );
        default.to_string()
    })
}

// endregion: --- Config
