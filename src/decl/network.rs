use std::net::Ipv4Addr;

use anyhow::{Result, anyhow};
use cidr::Ipv4Cidr;
use serde::{Deserialize, Serialize};

use super::ResourceRef;

pub const LOGICAL_ID: &str = "EcsVpc";
pub const MAX_AZS: u8 = 2;
pub const PUBLIC_TIER_NAME: &str = "public";
pub const PUBLIC_CIDR_MASK: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetKind {
    Public,
    Private,
    Isolated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetTier {
    pub name: String,
    pub kind: SubnetKind,
    pub cidr_mask: u8,
}

/// A concrete subnet: one tier placed in one availability zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
    pub tier: String,
    pub kind: SubnetKind,
    pub zone_index: u8,
    pub cidr: Ipv4Cidr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub ipv4_cidr: Ipv4Cidr,
    pub max_azs: u8,
    pub nat_gateways: u8,
    pub subnet_tiers: Vec<SubnetTier>,
}

fn default_cidr() -> Ipv4Cidr {
    Ipv4Cidr::new(Ipv4Addr::new(10, 0, 0, 0), 16).expect("10.0.0.0/16 is a valid network")
}

/// Declares the VPC: public tier only, no NAT gateways.
pub fn declare() -> Network {
    Network {
        id: LOGICAL_ID.to_string(),
        ipv4_cidr: default_cidr(),
        max_azs: MAX_AZS,
        nat_gateways: 0,
        subnet_tiers: vec![SubnetTier {
            name: PUBLIC_TIER_NAME.to_string(),
            kind: SubnetKind::Public,
            cidr_mask: PUBLIC_CIDR_MASK,
        }],
    }
}

impl Network {
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(&self.id)
    }

    pub fn has_tier(&self, kind: SubnetKind) -> bool {
        self.subnet_tiers.iter().any(|tier| tier.kind == kind)
    }

    /// Carves one subnet per tier and zone out of the VPC range, in consecutive
    /// blocks from the start of the range.
    pub fn subnets(&self) -> Result<Vec<Subnet>> {
        let vpc_len = self.ipv4_cidr.network_length();
        let base = u32::from(self.ipv4_cidr.first_address()) as u64;
        let vpc_end = base + (1u64 << (32 - u32::from(vpc_len)));

        let mut next = base;
        let mut subnets = Vec::new();
        for tier in &self.subnet_tiers {
            if tier.cidr_mask < vpc_len || tier.cidr_mask > 32 {
                return Err(anyhow!(
                    "Subnet mask /{} of tier '{}' does not fit in VPC {}",
                    tier.cidr_mask,
                    tier.name,
                    self.ipv4_cidr
                ));
            }
            let block = 1u64 << (32 - u32::from(tier.cidr_mask));
            // Align to the tier's block size.
            next = next.div_ceil(block) * block;
            for zone_index in 0..self.max_azs {
                if next + block > vpc_end {
                    return Err(anyhow!(
                        "VPC {} has no room left for a /{} subnet in tier '{}'",
                        self.ipv4_cidr,
                        tier.cidr_mask,
                        tier.name
                    ));
                }
                let cidr = Ipv4Cidr::new(Ipv4Addr::from(next as u32), tier.cidr_mask)
                    .map_err(|e| anyhow!("Invalid subnet range: {e}"))?;
                subnets.push(Subnet {
                    tier: tier.name.clone(),
                    kind: tier.kind,
                    zone_index,
                    cidr,
                });
                next += block;
            }
        }
        Ok(subnets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_single_public_tier_without_nat() {
        let network = declare();
        assert_eq!(network.nat_gateways, 0);
        assert_eq!(network.subnet_tiers.len(), 1);
        assert!(network.has_tier(SubnetKind::Public));
        assert!(!network.has_tier(SubnetKind::Private));
        assert!(!network.has_tier(SubnetKind::Isolated));
        assert_eq!(network.subnet_tiers[0].cidr_mask, 24);
    }

    #[test]
    fn carves_one_public_subnet_per_zone() {
        let subnets = declare().subnets().unwrap();
        let ranges: Vec<String> = subnets.iter().map(|s| s.cidr.to_string()).collect();
        assert_eq!(ranges, vec!["10.0.0.0/24", "10.0.1.0/24"]);
        assert!(subnets.iter().all(|s| s.kind == SubnetKind::Public));
        assert_eq!(subnets[1].zone_index, 1);
    }

    #[test]
    fn rejects_mask_wider_than_vpc() {
        let mut network = declare();
        network.subnet_tiers[0].cidr_mask = 8;
        assert!(network.subnets().is_err());
    }

    #[test]
    fn rejects_subnets_that_overflow_the_vpc() {
        let mut network = declare();
        network.subnet_tiers[0].cidr_mask = 16;
        assert!(network.subnets().is_err());
    }
}
