use captive_portal_domain::captive_probe::{
    classify_probe, is_dotless, portal_location, probe_paths, wrong_content_body, ProbeResponse,
};
use std::net::Ipv4Addr;

#[test]
fn test_android_probe_redirects() {
    assert_eq!(classify_probe("/generate_204"), Some(ProbeResponse::Redirect));
    assert_eq!(classify_probe("/gen_204"), Some(ProbeResponse::Redirect));
}

#[test]
fn test_apple_probe_gets_wrong_content() {
    assert_eq!(
        classify_probe("/hotspot-detect.html"),
        Some(ProbeResponse::WrongContent)
    );
}

#[test]
fn test_windows_probe_redirects() {
    assert_eq!(classify_probe("/connecttest.txt"), Some(ProbeResponse::Redirect));
    assert_eq!(classify_probe("/ncsi.txt"), Some(ProbeResponse::Redirect));
}

#[test]
fn test_regular_paths_are_not_probes() {
    assert_eq!(classify_probe("/index.html"), None);
    assert_eq!(classify_probe("/scan"), None);
    assert_eq!(classify_probe("/"), None);
}

#[test]
fn test_every_listed_probe_classifies() {
    for path in probe_paths() {
        assert!(classify_probe(path).is_some(), "{} should be a probe", path);
    }
}

#[test]
fn test_portal_location_points_at_index() {
    let location = portal_location(Ipv4Addr::new(192, 168, 4, 1));
    assert_eq!(location, "http://192.168.4.1/index.html");
}

#[test]
fn test_wrong_content_body_is_not_success() {
    let body = wrong_content_body(Ipv4Addr::new(192, 168, 4, 1));

    assert!(!body.contains("Success"));
    assert!(body.contains("http://192.168.4.1/index.html"));
}

#[test]
fn test_dotless_detection() {
    assert!(is_dotless("/"));
    assert!(is_dotless("/welcome"));
    assert!(is_dotless("/some/deep/path"));
    assert!(!is_dotless("/style.css"));
    assert!(!is_dotless("/assets/logo.png"));
}
