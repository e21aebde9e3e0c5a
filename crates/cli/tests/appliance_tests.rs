use captive_portal::Appliance;
use captive_portal_domain::{InterfaceRole, InterfaceState};
use captive_portal_infrastructure::radio::{SimulatedNetwork, SimulatedRadio};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration, Instant};

mod helpers;
use helpers::{body_of, http_get, http_post_form, resolve, test_config, INDEX_HTML, PORTAL_IP};

#[tokio::test]
async fn test_fresh_boot_serves_portal_dns_and_scan() {
    // Arrange
    let www = tempfile::tempdir().unwrap();
    let config = test_config(&www);

    // Act
    let running = Appliance::new(config).start().await.unwrap();

    // Assert
    assert!(
        running
            .interfaces()
            .is_connected(InterfaceRole::AccessPoint)
            .await
    );

    let reply = resolve(running.dns_addr(), 0xBEEF, "connectivitycheck.gstatic.com").await;
    assert_eq!(&reply[..2], &[0xBE, 0xEF]);
    assert_eq!(&reply[reply.len() - 4..], &PORTAL_IP.octets());

    let http = running.http_addrs()[0];
    let index = http_get(http, "/").await;
    assert!(index.starts_with("HTTP/1.0 200") || index.starts_with("HTTP/1.1 200"));
    assert_eq!(body_of(&index), INDEX_HTML);

    let scan = http_get(http, "/scan").await;
    let ssids: Vec<String> = serde_json::from_str(body_of(&scan)).unwrap();
    assert!(!ssids.is_empty());
    assert!(ssids.contains(&"HomeNet".to_string()));

    running.shutdown().await;
}

#[tokio::test]
async fn test_connect_through_http_joins_upstream() {
    let www = tempfile::tempdir().unwrap();
    let config = test_config(&www);
    let running = Appliance::new(config).start().await.unwrap();

    let response = http_post_form(
        running.http_addrs()[0],
        "/connect",
        "ssid=HomeNet&password=correct-horse",
    )
    .await;

    assert!(body_of(&response).contains("success"));
    assert!(body_of(&response).contains("10.0.0.23"));
    assert!(matches!(
        running.interfaces().state(InterfaceRole::Station).await,
        InterfaceState::Connected
    ));

    running.shutdown().await;
}

#[tokio::test]
async fn test_access_point_failure_is_fatal() {
    let www = tempfile::tempdir().unwrap();
    let config = test_config(&www);
    let radio = Arc::new(SimulatedRadio::new(vec![]));
    radio.refuse_access_point(true);

    let result = Appliance::new(config).with_radio(radio).start().await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_station_failure_is_not_fatal() {
    let www = tempfile::tempdir().unwrap();
    let mut config = test_config(&www);
    config.station.ssid = "Nowhere".to_string();
    config.station.password = "irrelevant".to_string();
    let radio = Arc::new(SimulatedRadio::new(vec![SimulatedNetwork::new(
        "HomeNet",
        "correct-horse",
        Ipv4Addr::new(10, 0, 0, 23),
    )]));

    let running = Appliance::new(config).with_radio(radio).start().await.unwrap();

    assert!(
        running
            .interfaces()
            .is_connected(InterfaceRole::AccessPoint)
            .await
    );
    assert!(running
        .interfaces()
        .state(InterfaceRole::Station)
        .await
        .is_failed());

    running.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_releases_dns_socket() {
    let www = tempfile::tempdir().unwrap();
    let running = Appliance::new(test_config(&www)).start().await.unwrap();
    let dns_addr = running.dns_addr();
    assert!(tokio::net::UdpSocket::bind(dns_addr).await.is_err());

    running.shutdown().await;

    assert!(tokio::net::UdpSocket::bind(dns_addr).await.is_ok());
}

fn slow_radio(polls: u32) -> Arc<SimulatedRadio> {
    Arc::new(SimulatedRadio::new(vec![SimulatedNetwork::new(
        "SlowNet",
        "password123",
        Ipv4Addr::new(10, 0, 0, 42),
    )
    .with_polls(polls)]))
}

async fn wait_for_join_to_start(running: &captive_portal::RunningAppliance) {
    timeout(Duration::from_secs(2), async {
        while !running.interfaces().is_connect_in_progress() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("join never started");
}

#[tokio::test]
async fn test_join_slower_than_request_timeout_still_answers() {
    let www = tempfile::tempdir().unwrap();
    let mut config = test_config(&www);
    config.server.request_timeout_secs = 1;
    config.interfaces.connect_timeout_ms = 5000;
    config.interfaces.poll_interval_ms = 50;
    let running = Appliance::new(config)
        .with_radio(slow_radio(30))
        .start()
        .await
        .unwrap();

    let response = http_post_form(
        running.http_addrs()[0],
        "/connect",
        "ssid=SlowNet&password=password123",
    )
    .await;

    assert!(body_of(&response).contains("success"), "got {:?}", response);
    assert!(body_of(&response).contains("10.0.0.42"));
    assert_eq!(
        running.interfaces().state(InterfaceRole::Station).await,
        InterfaceState::Connected
    );
    running.shutdown().await;
}

#[tokio::test]
async fn test_join_timeout_is_reported_over_http() {
    let www = tempfile::tempdir().unwrap();
    let mut config = test_config(&www);
    config.server.request_timeout_secs = 1;
    config.interfaces.connect_timeout_ms = 1500;
    config.interfaces.poll_interval_ms = 50;
    let running = Appliance::new(config)
        .with_radio(slow_radio(u32::MAX))
        .start()
        .await
        .unwrap();

    let response = http_post_form(
        running.http_addrs()[0],
        "/connect",
        "ssid=SlowNet&password=password123",
    )
    .await;

    assert!(body_of(&response).contains("error"), "got {:?}", response);
    assert!(running
        .interfaces()
        .state(InterfaceRole::Station)
        .await
        .is_failed());
    assert!(!running.interfaces().is_connect_in_progress());
    running.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_during_join_is_bounded_and_releases_the_station() {
    let www = tempfile::tempdir().unwrap();
    let mut config = test_config(&www);
    config.server.request_timeout_secs = 1;
    config.interfaces.connect_timeout_ms = 30_000;
    config.interfaces.poll_interval_ms = 20;
    config.shutdown.drain_timeout_secs = 1;
    let running = Appliance::new(config)
        .with_radio(slow_radio(u32::MAX))
        .start()
        .await
        .unwrap();
    let interfaces = running.interfaces().clone();
    let addr = running.http_addrs()[0];

    let client = tokio::spawn(async move {
        http_post_form(addr, "/connect", "ssid=SlowNet&password=password123").await
    });
    wait_for_join_to_start(&running).await;

    let started = Instant::now();
    running.shutdown().await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(client.await.is_ok());
    timeout(Duration::from_secs(1), async {
        while interfaces.is_connect_in_progress() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("connect gate stayed held after shutdown");
    assert!(!matches!(
        interfaces.state(InterfaceRole::Station).await,
        InterfaceState::Connecting { .. }
    ));
}
