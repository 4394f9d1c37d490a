use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vahti_core::Notice;
use vahti_engine::{Channel, Dispatcher, NotifyError, TelegramChannel, TelegramConfig};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notice() -> Notice {
    Notice {
        subject: "Subject".to_string(),
        body: "Body".to_string(),
    }
}

fn telegram_against(server: &MockServer) -> TelegramChannel {
    TelegramChannel::new(TelegramConfig {
        bot_token: "TOKEN".to_string(),
        chat_id: "42".to_string(),
    })
    .expect("client should build")
    .with_api_base(server.uri())
}

#[tokio::test]
async fn telegram_posts_the_expected_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "chat_id": "42",
            "text": "Subject\nBody",
            "disable_web_page_preview": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    telegram_against(&server)
        .send(&notice())
        .await
        .expect("send should succeed");
}

#[tokio::test]
async fn telegram_api_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("{\"ok\":false}"))
        .mount(&server)
        .await;

    let err = telegram_against(&server)
        .send(&notice())
        .await
        .expect_err("send should fail");
    assert!(matches!(err, NotifyError::Rejected(_)));
}

/// Test double that records every notice it is asked to deliver.
#[derive(Clone)]
struct RecordingChannel {
    label: &'static str,
    fail: bool,
    deliveries: Arc<Mutex<Vec<(&'static str, String)>>>,
}

impl RecordingChannel {
    fn new(label: &'static str, fail: bool, deliveries: Arc<Mutex<Vec<(&'static str, String)>>>) -> Self {
        Self {
            label,
            fail,
            deliveries,
        }
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("wire down".to_string()));
        }
        self.deliveries
            .lock()
            .unwrap()
            .push((self.label, notice.subject.clone()));
        Ok(())
    }
}

#[tokio::test]
async fn dispatcher_delivers_in_channel_order() {
    let deliveries = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = Dispatcher::new(vec![
        Box::new(RecordingChannel::new("first", false, deliveries.clone())),
        Box::new(RecordingChannel::new("second", false, deliveries.clone())),
    ]);

    dispatcher.dispatch(&notice()).await;

    let seen = deliveries.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("first", "Subject".to_string()),
            ("second", "Subject".to_string())
        ]
    );
}

#[tokio::test]
async fn one_failing_channel_does_not_stop_the_rest() {
    let deliveries = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = Dispatcher::new(vec![
        Box::new(RecordingChannel::new("broken", true, deliveries.clone())),
        Box::new(RecordingChannel::new("working", false, deliveries.clone())),
    ]);

    dispatcher.dispatch(&notice()).await;

    let seen = deliveries.lock().unwrap();
    assert_eq!(*seen, vec![("working", "Subject".to_string())]);
}

#[tokio::test]
async fn empty_dispatcher_drops_the_notice_without_error() {
    let dispatcher = Dispatcher::new(Vec::new());
    assert_eq!(dispatcher.channel_count(), 0);
    dispatcher.dispatch(&notice()).await;
}
