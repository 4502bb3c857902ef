use serde::{Deserialize, Serialize};

use super::ResourceRef;
use super::network::Network;
use super::ports::{HTTP_PORT, Port};

pub const LOGICAL_ID: &str = "EcsSecurityGroup";
pub const DESCRIPTION: &str = "Security group for ECS service";
pub const HTTP_RULE_DESCRIPTION: &str = "Allow HTTP traffic from anywhere";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Peer {
    AnyIpv4,
}

impl Peer {
    pub fn cidr(&self) -> &'static str {
        match self {
            Peer::AnyIpv4 => "0.0.0.0/0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub peer: Peer,
    pub port: Port,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRuleSet {
    pub id: String,
    pub network: ResourceRef,
    pub description: String,
    pub allow_all_outbound: bool,
    pub ingress: Vec<IngressRule>,
}

pub fn declare(network: &Network) -> AccessRuleSet {
    AccessRuleSet {
        id: LOGICAL_ID.to_string(),
        network: network.reference(),
        description: DESCRIPTION.to_string(),
        allow_all_outbound: true,
        ingress: vec![IngressRule {
            peer: Peer::AnyIpv4,
            port: HTTP_PORT,
            description: HTTP_RULE_DESCRIPTION.to_string(),
        }],
    }
}

impl AccessRuleSet {
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(&self.id)
    }

    pub fn admits(&self, port: Port) -> bool {
        self.ingress.iter().any(|rule| rule.port == port)
    }
}
