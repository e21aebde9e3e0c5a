use ipnetwork::Ipv4Network;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};

/// Which side of the appliance an HTTP peer sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientSide {
    AccessPoint,
    Station,
    Unknown,
}

impl ClientSide {
    pub fn is_access_point(&self) -> bool {
        matches!(self, ClientSide::AccessPoint)
    }
}

/// Maps a peer address to the subnet it came from. When subnets overlap the
/// longest prefix wins.
#[derive(Debug, Clone)]
pub struct SubnetClassifier {
    subnets: Vec<(Ipv4Network, ClientSide)>,
}

impl SubnetClassifier {
    pub fn new(access_point: Ipv4Network) -> Self {
        Self {
            subnets: vec![(access_point, ClientSide::AccessPoint)],
        }
    }

    pub fn from_address(address: Ipv4Addr, netmask: Ipv4Addr) -> Result<Self, String> {
        let network = network_for(address, netmask)?;
        Ok(Self::new(network))
    }

    pub fn with_station_network(mut self, station: Ipv4Network) -> Self {
        self.subnets.push((station, ClientSide::Station));
        self
    }

    pub fn classify(&self, peer: IpAddr) -> ClientSide {
        let peer = match peer {
            IpAddr::V4(v4) => v4,
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => v4,
                None => return ClientSide::Unknown,
            },
        };

        let mut best_match: Option<(u8, ClientSide)> = None;
        for (network, side) in &self.subnets {
            if network.contains(peer) {
                let prefix = network.prefix();
                match best_match {
                    None => best_match = Some((prefix, *side)),
                    Some((existing, _)) if prefix > existing => {
                        best_match = Some((prefix, *side));
                    }
                    _ => {}
                }
            }
        }

        best_match
            .map(|(_, side)| side)
            .unwrap_or(ClientSide::Unknown)
    }
}

/// Builds the network that contains `address` under `netmask`.
pub fn network_for(address: Ipv4Addr, netmask: Ipv4Addr) -> Result<Ipv4Network, String> {
    let prefix = ipnetwork::ipv4_mask_to_prefix(netmask)
        .map_err(|e| format!("Invalid netmask {}: {}", netmask, e))?;
    let base = Ipv4Addr::from(u32::from(address) & u32::from(netmask));
    Ipv4Network::new(base, prefix).map_err(|e| format!("Invalid network {}/{}: {}", base, prefix, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_for_masks_host_bits() {
        let net = network_for(Ipv4Addr::new(192, 168, 4, 1), Ipv4Addr::new(255, 255, 255, 0)).unwrap();
        assert_eq!(net.network(), Ipv4Addr::new(192, 168, 4, 0));
        assert_eq!(net.prefix(), 24);
    }

    #[test]
    fn test_network_for_rejects_non_contiguous_mask() {
        assert!(network_for(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(255, 0, 255, 0)).is_err());
    }
}
