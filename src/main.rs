// region:    --- Imports
use auction_client::api::{ApiClient, StaticTokenProvider};
use auction_client::auction::state::{AuctionPhase, EndedPanel};
use auction_client::config::Config;
use auction_client::realtime::KafkaBidChannel;
use auction_client::watch::AuctionWatch;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Main

/// 터미널 경매 워처
/// 경매 하나를 열어 현재 입찰가와 남은 시간을 1초마다 출력하고
/// 종료되면 서버가 계산한 결과를 가져와 종료 패널을 보여준다
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = Config::from_env();

    // 감시할 경매 id (첫 번째 인자)
    let auction_id: i64 = match std::env::args().nth(1).map(|arg| arg.parse()) {
        Some(Ok(id)) => id,
        _ => {
            error!("{:<12} --> 사용법: auction-client <auction_id>", "Main");
            return Err("경매 id가 필요합니다".into());
        }
    };

    let api = Arc::new(ApiClient::new(
        &config.api_base_url,
        Arc::new(StaticTokenProvider::new(config.auth_token.clone())),
    ));
    let channel = Arc::new(KafkaBidChannel::new(
        &config.kafka_brokers,
        &config.bid_topic,
        &config.kafka_group_id,
    ));

    // 워치 열기 (상품 종류 확정 + 최초 조회 + 구독 + 틱 시작)
    let mut watch = match AuctionWatch::open(api, channel, auction_id).await {
        Ok(watch) => watch,
        Err(e) => {
            error!("{:<12} --> 경매 워치 열기 실패: {}", "Main", e.user_message());
            return Err(e.into());
        }
    };

    // 1초마다 현재 상태 출력
    let mut tick = interval(Duration::from_secs(1));
    let mut last_bid = 0;
    loop {
        tick.tick().await;
        let snapshot = watch.snapshot();

        if snapshot.current_bid != last_bid {
            info!(
                "{:<12} --> 현재 입찰가: {}, 다음 최소 입찰가: {} (입찰 {}건)",
                "Main", snapshot.current_bid, snapshot.minimum_bid, snapshot.bid_count
            );
            last_bid = snapshot.current_bid;
        }

        match snapshot.phase {
            AuctionPhase::Scheduled => {
                if let Some(countdown) = snapshot.countdown {
                    info!(
                        "{:<12} --> 시작까지 {}일 {:02}:{:02}:{:02}",
                        "Main",
                        countdown.days,
                        countdown.hours,
                        countdown.minutes,
                        countdown.seconds
                    );
                }
            }
            AuctionPhase::Active => {
                if let Some(countdown) = snapshot.countdown {
                    info!(
                        "{:<12} --> 종료까지 {}일 {:02}:{:02}:{:02}",
                        "Main",
                        countdown.days,
                        countdown.hours,
                        countdown.minutes,
                        countdown.seconds
                    );
                }
            }
            AuctionPhase::Completed => break,
        }
    }

    // 종료 후 서버가 계산한 사용자 결과 반영
    if let Err(e) = watch.refresh().await {
        warn!("{:<12} --> 종료 결과 조회 실패: {}", "Main", e.user_message());
    }

    let panel = watch.snapshot().ended_panel;
    match panel {
        Some(EndedPanel::WinnerPayment) => {
            info!("{:<12} --> 낙찰되었습니다. 결제를 진행해 주세요.", "Main")
        }
        Some(EndedPanel::RefundAfterLoss) => {
            info!("{:<12} --> 패찰했습니다. 보증금은 환불됩니다.", "Main")
        }
        Some(EndedPanel::RefundNoBids) => {
            info!(
                "{:<12} --> 입찰 없이 종료되었습니다. 보증금은 환불됩니다.",
                "Main"
            )
        }
        _ => info!("{:<12} --> 경매가 종료되었습니다.", "Main"),
    }

    watch.close();
    Ok(())
}

// endregion: --- Main
