use serde::{Deserialize, Serialize};

use super::ResourceRef;
use super::access::AccessRuleSet;
use super::cluster::Cluster;
use super::network::SubnetKind;
use super::task::{LaunchType, TaskDefinition};

pub const LOGICAL_ID: &str = "DeployTestService";
pub const SERVICE_NAME: &str = "DeployTestService";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub launch_type: LaunchType,
    pub cluster: ResourceRef,
    pub task_definition: ResourceRef,
    pub desired_count: u32,
    pub assign_public_ip: bool,
    pub security_groups: Vec<ResourceRef>,
    pub subnet_selection: SubnetKind,
}

/// One task, reachable through its own public IP. No load balancer sits in
/// front of it.
pub fn declare(cluster: &Cluster, task: &TaskDefinition, rules: &AccessRuleSet) -> Service {
    Service {
        id: LOGICAL_ID.to_string(),
        name: SERVICE_NAME.to_string(),
        launch_type: task.launch_type,
        cluster: cluster.reference(),
        task_definition: task.reference(),
        desired_count: 1,
        assign_public_ip: true,
        security_groups: vec![rules.reference()],
        subnet_selection: SubnetKind::Public,
    }
}

impl Service {
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(&self.id)
    }
}
