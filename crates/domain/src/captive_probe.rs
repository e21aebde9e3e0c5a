//! Connectivity-check URLs that operating systems request on join.
//!
//! A probe that receives its expected answer tells the OS the network is open,
//! so every probe gets either a redirect to the portal or a 200 whose body is
//! deliberately not the one the OS is looking for.

/// How a probe path is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResponse {
    Redirect,
    WrongContent,
}

const PROBES: &[(&str, ProbeResponse)] = &[
    // Android / ChromeOS
    ("/generate_204", ProbeResponse::Redirect),
    ("/gen_204", ProbeResponse::Redirect),
    // Apple
    ("/hotspot-detect.html", ProbeResponse::WrongContent),
    ("/library/test/success.html", ProbeResponse::WrongContent),
    // Windows
    ("/connecttest.txt", ProbeResponse::Redirect),
    ("/ncsi.txt", ProbeResponse::Redirect),
    ("/redirect", ProbeResponse::Redirect),
    // Firefox / various Linux network managers
    ("/success.txt", ProbeResponse::Redirect),
    ("/canonical.html", ProbeResponse::Redirect),
];

pub const INDEX_PATH: &str = "/index.html";

pub fn probe_paths() -> impl Iterator<Item = &'static str> {
    PROBES.iter().map(|(path, _)| *path)
}

pub fn classify_probe(path: &str) -> Option<ProbeResponse> {
    PROBES
        .iter()
        .find(|(probe, _)| probe.eq_ignore_ascii_case(path))
        .map(|(_, response)| *response)
}

/// Absolute URL of the portal index page.
pub fn portal_location(portal_ip: std::net::Ipv4Addr) -> String {
    format!("http://{}{}", portal_ip, INDEX_PATH)
}

/// Body served to probes answered with `WrongContent`. Browsers that render it
/// still end up on the portal through the meta refresh.
pub fn wrong_content_body(portal_ip: std::net::Ipv4Addr) -> String {
    let location = portal_location(portal_ip);
    format!(
        "<html><head><meta http-equiv=\"refresh\" content=\"0; url={0}\"></head>\
         <body><a href=\"{0}\">Sign in to network</a></body></html>",
        location
    )
}

/// Paths without a dot in their last segment look like page navigations
/// rather than asset fetches.
pub fn is_dotless(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    !last.contains('.')
}
