//! Tests against a live server over TCP.

use std::time::Duration;

mod common;

#[tokio::test]
async fn test_override_over_the_wire() {
    let (addr, shutdown) = common::start_server(common::sample_config()).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/hello", addr))
        .header("Foo", "original-foo")
        .header("Foo-Overridden", "new-foo")
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "bar=[bar-FIXED-VALUE], foo=[new-foo]");

    shutdown.trigger();
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let (addr, shutdown) = common::start_server(common::sample_config()).await;
    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let res = client.get(format!("http://{}/hello", addr)).send().await;
    assert!(res.is_err(), "server should no longer accept connections");
}
