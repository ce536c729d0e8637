// Boots one server per test binary on an ephemeral port.
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

/// Starts the server once and returns its base URL (`http://host:port`).
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // The server gets its own OS thread and runtime so it outlives each `#[tokio::test]`.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                voice_platformer::run(listener).await.expect("server failed");
            });
        });
        wait_for_server(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

/// Base URL with the scheme switched to `ws://`.
#[allow(dead_code)]
pub fn ws_url(base_url: &str) -> String {
    base_url.replacen("http://", "ws://", 1)
}

fn wait_for_server(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
