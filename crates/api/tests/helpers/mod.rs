#![allow(dead_code)]

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, Response},
    Router,
};
use captive_portal_api::{create_portal_routes, AppState};
use captive_portal_application::services::{InterfaceManager, InterfaceTimings, RoleConfig};
use captive_portal_application::use_cases::{
    ConnectStationUseCase, GetNetworkStatusUseCase, ScanNetworksUseCase,
};
use captive_portal_domain::client_side::network_for;
use captive_portal_domain::{AccessPointSettings, AuthMode, SubnetClassifier};
use captive_portal_infrastructure::assets::FsAssetStore;
use captive_portal_infrastructure::radio::{SimulatedNetwork, SimulatedRadio};
use http_body_util::BodyExt;
use serde_json::Value;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PORTAL_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);
pub const AP_CLIENT: &str = "192.168.4.23:50123";
pub const STATION_CLIENT: &str = "10.0.0.50:50123";
pub const INDEX_HTML: &str = "<html><body>Portal</body></html>";

pub struct TestPortal {
    pub app: Router,
    pub radio: Arc<SimulatedRadio>,
    pub manager: Arc<InterfaceManager>,
    _www: TempDir,
}

pub fn default_networks() -> Vec<SimulatedNetwork> {
    vec![
        SimulatedNetwork::new("HomeNet", "correct", Ipv4Addr::new(10, 0, 0, 23)).with_polls(2),
        SimulatedNetwork::new("CoffeeShop", "", Ipv4Addr::new(172, 16, 5, 40)).with_polls(3),
    ]
}

pub async fn portal() -> TestPortal {
    portal_with(default_networks()).await
}

pub async fn portal_with(networks: Vec<SimulatedNetwork>) -> TestPortal {
    let www = tempfile::tempdir().unwrap();
    std::fs::write(www.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(www.path().join("style.css"), "body { margin: 0; }").unwrap();

    let radio = Arc::new(SimulatedRadio::new(networks));
    let timings = InterfaceTimings {
        activation_timeout: Duration::from_millis(200),
        connect_timeout: Duration::from_secs(2),
        poll_interval: Duration::from_millis(5),
    };
    let manager = Arc::new(InterfaceManager::new(radio.clone(), timings));
    manager
        .start(RoleConfig::AccessPoint(AccessPointSettings {
            ssid: "ESP32_Captive_Portal".to_string(),
            password: "12345678".to_string(),
            auth_mode: AuthMode::Wpa2Psk,
            address: PORTAL_IP,
            netmask: Ipv4Addr::new(255, 255, 255, 0),
            channel: 6,
        }))
        .await
        .unwrap();

    let station_net = network_for(Ipv4Addr::new(10, 0, 0, 23), Ipv4Addr::new(255, 255, 255, 0)).unwrap();
    let classifier = SubnetClassifier::from_address(PORTAL_IP, Ipv4Addr::new(255, 255, 255, 0))
        .unwrap()
        .with_station_network(station_net);

    let state = AppState {
        scan_networks: Arc::new(ScanNetworksUseCase::new(manager.clone())),
        connect_station: Arc::new(ConnectStationUseCase::new(manager.clone())),
        get_status: Arc::new(GetNetworkStatusUseCase::new(manager.clone())),
        assets: Arc::new(FsAssetStore::new(www.path())),
        classifier: Arc::new(classifier),
        portal_ip: PORTAL_IP,
        tls_active: false,
    };

    TestPortal {
        app: create_portal_routes(state),
        radio,
        manager,
        _www: www,
    }
}

pub async fn get(app: &Router, path: &str, peer: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(path).body(Body::empty()).unwrap();
    attach_peer(&mut request, peer);
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_form(app: &Router, path: &str, form: &str, peer: Option<&str>) -> Response<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    attach_peer(&mut request, peer);
    app.clone().oneshot(request).await.unwrap()
}

fn attach_peer(request: &mut Request<Body>, peer: Option<&str>) {
    if let Some(peer) = peer {
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
