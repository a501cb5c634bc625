use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use webqr::data_url::{PNG_DATA_URL_PREFIX, encode_png_data_url};
use webqr::{Error, LoginInitiator, LoginResult, Outcome, QrEncoder, WebQrConfig, app};

enum Reply {
    Qr(String),
    Message(&'static str),
    Fail(&'static str),
}

struct MockLogin {
    reply: Reply,
    seen_timeout_ms: AtomicU64,
}

impl MockLogin {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            seen_timeout_ms: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl LoginInitiator for MockLogin {
    async fn start(&self, timeout: Duration) -> webqr::Result<LoginResult> {
        self.seen_timeout_ms
            .store(timeout.as_millis() as u64, Ordering::SeqCst);
        match &self.reply {
            Reply::Qr(url) => Ok(LoginResult::Qr {
                data_url: url.clone(),
            }),
            Reply::Message(msg) => Ok(LoginResult::Message(msg.to_string())),
            Reply::Fail(msg) => Err(Error::Login(msg.to_string())),
        }
    }
}

fn config_in(dir: &TempDir) -> WebQrConfig {
    let mut config = WebQrConfig::default();
    config.output.path = dir.path().join("workspace").join("whatsapp-qr.png");
    config
}

#[tokio::test]
async fn qr_payload_is_written_byte_for_byte() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);

    let png = QrEncoder::new().encode_png("2@abcdef,ghijkl==").expect("encode");
    let login = MockLogin::new(Reply::Qr(encode_png_data_url(&png)));

    let mut out = Vec::new();
    let outcome = app::run(&login, &config, Some("192.0.2.10 50000 192.0.2.1 22"), &mut out)
        .await
        .expect("run");

    assert_eq!(
        outcome,
        Outcome::Saved {
            path: config.output.path.clone(),
            bytes: png.len(),
        }
    );
    assert_eq!(std::fs::read(&config.output.path).expect("read qr"), png);
    assert_eq!(login.seen_timeout_ms.load(Ordering::SeqCst), 120_000);

    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains(&config.output.path.display().to_string()));
    assert!(printed.contains("scp root@192.0.2.10:"));
}

#[tokio::test]
async fn arbitrary_bytes_survive_without_verification() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);

    let payload: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
    let login = MockLogin::new(Reply::Qr(encode_png_data_url(&payload)));

    let mut out = Vec::new();
    app::run(&login, &config, None, &mut out).await.expect("run");

    assert_eq!(std::fs::read(&config.output.path).expect("read"), payload);
    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains("scp root@<host>:"));
}

#[tokio::test]
async fn message_only_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    let login = MockLogin::new(Reply::Message("WhatsApp is already linked."));

    let mut out = Vec::new();
    let outcome = app::run(&login, &config, None, &mut out).await.expect("run");

    assert_eq!(
        outcome,
        Outcome::Message("WhatsApp is already linked.".to_string())
    );
    assert!(!config.output.path.exists());
    assert!(
        String::from_utf8(out)
            .expect("utf8")
            .contains("WhatsApp is already linked.")
    );
}

#[tokio::test]
async fn login_failure_propagates_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    let login = MockLogin::new(Reply::Fail("connection closed"));

    let mut out = Vec::new();
    let err = app::run(&login, &config, None, &mut out)
        .await
        .expect_err("login should fail");

    assert!(matches!(err, Error::Login(_)));
    assert!(err.to_string().contains("connection closed"));
    assert!(!config.output.path.exists());
}

#[tokio::test]
async fn invalid_base64_is_rejected_before_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    let login = MockLogin::new(Reply::Qr(format!("{PNG_DATA_URL_PREFIX}***")));

    let mut out = Vec::new();
    let err = app::run(&login, &config, None, &mut out)
        .await
        .expect_err("bad payload");

    assert!(matches!(err, Error::DataUrl(_)));
    assert!(!config.output.path.exists());
}

#[tokio::test]
async fn verification_rejects_non_qr_images() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(&dir);
    config.output.verify = true;
    let login = MockLogin::new(Reply::Qr(encode_png_data_url(b"not an image")));

    let mut out = Vec::new();
    let err = app::run(&login, &config, None, &mut out)
        .await
        .expect_err("verification should fail");

    assert!(matches!(err, Error::Image(_)));
    assert!(!config.output.path.exists());
}

#[tokio::test]
async fn terminal_rendering_follows_instructions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(&dir);
    config.output.terminal = true;

    let png = QrEncoder::new().encode_png("2@terminal").expect("encode");
    let login = MockLogin::new(Reply::Qr(encode_png_data_url(&png)));

    let mut out = Vec::new();
    app::run(&login, &config, None, &mut out).await.expect("run");

    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains("Or scan directly from this terminal"));
    assert!(printed.contains('▀') || printed.contains('▄') || printed.contains('█'));
}
