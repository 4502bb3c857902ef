use serde::{Deserialize, Serialize};

use super::ResourceRef;
use super::network::Network;

pub const LOGICAL_ID: &str = "DeployTestCluster";
/// Fixed cluster name. A second stack in the same account and region must
/// use a different one.
pub const CLUSTER_NAME: &str = "DeployTestCluster";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub network: ResourceRef,
}

pub fn declare(network: &Network) -> Cluster {
    Cluster {
        id: LOGICAL_ID.to_string(),
        name: CLUSTER_NAME.to_string(),
        network: network.reference(),
    }
}

impl Cluster {
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(&self.id)
    }
}
