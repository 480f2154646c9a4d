/// 실시간 입찰 채널
/// 모든 경매의 입찰 삽입 이벤트가 하나의 공용 토픽으로 흘러오며
/// 채널 자체에는 경매별 필터가 없다. 경매 id 필터링은 수신 측(워치) 몫이다.
/// 채널 오류는 로그만 남기고 사용자에게 알리지 않는다 (조회 전용 모드로 조용히 저하)
// region:    --- Imports
use crate::auction::events::RowEvent;
use crate::bidding::model::Bid;
use async_trait::async_trait;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::ClientConfig;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

// endregion: --- Imports

// region:    --- Bid Channel Trait

/// 수신한 입찰 행을 전달받는 핸들러
pub type BidHandler = Arc<dyn Fn(Bid) + Send + Sync>;

/// 실시간 입찰 채널 트레이트
/// 워치를 실제 브로커 없이 테스트할 수 있도록 주입 지점으로 분리한다
#[async_trait]
pub trait BidChannel: Send + Sync {
    async fn subscribe(&self, handler: BidHandler) -> Result<BidSubscription, String>;
}

/// 구독 해제 핸들
/// unsubscribe()를 부르지 않고 떨어뜨려도 정확히 한 번만 해제된다
pub struct BidSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl BidSubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// 구독 해제
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for BidSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

// endregion: --- Bid Channel Trait

// region:    --- Kafka Bid Channel

/// Kafka 기반 실시간 입찰 채널
pub struct KafkaBidChannel {
    brokers: String,
    topic: String,
    group_id: String,
}

impl KafkaBidChannel {
    pub fn new(brokers: &str, topic: &str, group_id: &str) -> Self {
        Self {
            brokers: brokers.to_string(),
            topic: topic.to_string(),
            group_id: group_id.to_string(),
        }
    }

    /// 구독마다 독립된 컨슈머 생성
    fn create_consumer(&self) -> Result<StreamConsumer, String> {
        ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest")
            .set("session.timeout.ms", "6000")
            .set("allow.auto.create.topics", "true")
            .create()
            .map_err(|e| format!("컨슈머 생성 실패: {:?}", e))
    }
}

#[async_trait]
impl BidChannel for KafkaBidChannel {
    async fn subscribe(&self, handler: BidHandler) -> Result<BidSubscription, String> {
        let consumer = self.create_consumer()?;
        consumer
            .subscribe(&[self.topic.as_str()])
            .map_err(|e| e.to_string())?;

        info!(
            "{:<12} --> 실시간 입찰 채널 구독 시작: topic={}",
            "Realtime", self.topic
        );

        let topic = self.topic.clone();
        let task = tokio::spawn(async move {
            loop {
                match consumer.recv().await {
                    Ok(message) => {
                        let Some(payload) = message.payload() else {
                            warn!("{:<12} --> 빈 페이로드 수신", "Realtime");
                            continue;
                        };

                        let event = match serde_json::from_slice::<RowEvent>(payload) {
                            Ok(event) => event,
                            Err(e) => {
                                error!("{:<12} --> deserialize 오류: {:?}", "Realtime", e);
                                continue;
                            }
                        };

                        // 입찰 테이블의 INSERT 이벤트만 소비
                        if !event.is_bid_insert() {
                            debug!(
                                "{:<12} --> 무관한 이벤트 무시: table={}, type={}",
                                "Realtime", event.table, event.event_type
                            );
                            continue;
                        }

                        match serde_json::from_value::<Bid>(event.record) {
                            Ok(bid) => {
                                debug!(
                                    "{:<12} --> 입찰 이벤트 수신: bid_id={}, amount={}",
                                    "Realtime", bid.id, bid.amount
                                );
                                handler(bid);
                            }
                            Err(e) => {
                                error!("{:<12} --> 입찰 행 해석 오류: {:?}", "Realtime", e)
                            }
                        }
                    }
                    // 재연결은 시도하지 않는다
                    Err(e) => error!("{:<12} --> 채널 수신 오류: {:?}", "Realtime", e),
                }
            }
        });

        Ok(BidSubscription::new(move || {
            info!(
                "{:<12} --> 실시간 입찰 채널 구독 해제: topic={}",
                "Realtime", topic
            );
            task.abort();
        }))
    }
}

// endregion: --- Kafka Bid Channel
