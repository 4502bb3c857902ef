//! Declared desired state of the deployment.
//!
//! Everything in here is plain data. Building it performs no I/O and the
//! result can be serialized, inspected, and handed to a provisioner.

pub mod access;
mod compose;
pub mod cluster;
pub mod network;
pub mod output;
pub mod ports;
pub mod service;
pub mod task;

use std::fmt;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

pub use compose::{STACK_NAME, build};

/// Logical id of another resource in the same declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRef(String);

impl ResourceRef {
    pub fn new(logical_id: &str) -> Self {
        ResourceRef(logical_id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub stack_name: String,
    pub network: network::Network,
    pub cluster: cluster::Cluster,
    pub task_definition: task::TaskDefinition,
    pub access_rules: access::AccessRuleSet,
    pub service: service::Service,
    pub outputs: Vec<output::Output>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary {
    pub logical_id: String,
    pub kind: &'static str,
    pub depends_on: Vec<ResourceRef>,
    pub detail: String,
}

impl Declaration {
    /// Resources in creation order; every entry only depends on earlier ones.
    pub fn resources(&self) -> Vec<ResourceSummary> {
        let network = &self.network;
        let cluster = &self.cluster;
        let task = &self.task_definition;
        let rules = &self.access_rules;
        let service = &self.service;

        vec![
            ResourceSummary {
                logical_id: network.id.clone(),
                kind: "network",
                depends_on: vec![],
                detail: format!(
                    "{} across {} zones, {} NAT gateways",
                    network.ipv4_cidr, network.max_azs, network.nat_gateways
                ),
            },
            ResourceSummary {
                logical_id: cluster.id.clone(),
                kind: "cluster",
                depends_on: vec![cluster.network.clone()],
                detail: format!("name {}", cluster.name),
            },
            ResourceSummary {
                logical_id: task.id.clone(),
                kind: "task_definition",
                depends_on: vec![],
                detail: format!(
                    "{} cpu / {} MiB, image {}",
                    task.cpu, task.memory_mib, task.container.image
                ),
            },
            ResourceSummary {
                logical_id: rules.id.clone(),
                kind: "access_rules",
                depends_on: vec![rules.network.clone()],
                detail: format!(
                    "{} ingress rule(s), outbound {}",
                    rules.ingress.len(),
                    if rules.allow_all_outbound { "open" } else { "closed" }
                ),
            },
            ResourceSummary {
                logical_id: service.id.clone(),
                kind: "service",
                depends_on: std::iter::once(service.cluster.clone())
                    .chain(std::iter::once(service.task_definition.clone()))
                    .chain(service.security_groups.iter().cloned())
                    .collect(),
                detail: format!(
                    "name {}, {} task(s), public IP {}",
                    service.name,
                    service.desired_count,
                    if service.assign_public_ip { "on" } else { "off" }
                ),
            },
        ]
    }

    pub fn output(&self, name: &str) -> Option<&output::Output> {
        self.outputs.iter().find(|output| output.name == name)
    }

    pub fn image_tag(&self) -> &str {
        &self.task_definition.container.image.tag
    }

    /// Checks that references resolve and that every published container
    /// port is admitted by the access rules.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        let (network, cluster, task, rules, service) = (
            self.network.id.as_str(),
            self.cluster.id.as_str(),
            self.task_definition.id.as_str(),
            self.access_rules.id.as_str(),
            self.service.id.as_str(),
        );
        let known = [network, cluster, task, rules, service];

        let mut expect_ref = |owner: &str, reference: &ResourceRef, target: &str| {
            if reference.as_str() != target {
                problems.push(format!(
                    "{owner} references '{reference}' but the declared resource is '{target}'"
                ));
            }
        };
        expect_ref(cluster, &self.cluster.network, network);
        expect_ref(rules, &self.access_rules.network, network);
        expect_ref(service, &self.service.cluster, cluster);
        expect_ref(service, &self.service.task_definition, task);
        for group in &self.service.security_groups {
            expect_ref(service, group, rules);
        }

        if !self.network.has_tier(self.service.subnet_selection) {
            problems.push(format!(
                "{} is placed in {:?} subnets but {} declares no such tier",
                self.service.id, self.service.subnet_selection, self.network.id
            ));
        }

        for port in &self.task_definition.container.port_mappings {
            if !self.access_rules.admits(*port) {
                problems.push(format!(
                    "container port {port} is not admitted by {}",
                    self.access_rules.id
                ));
            }
        }

        for output in &self.outputs {
            if let output::OutputValue::Attribute { resource, .. } = &output.value {
                if !known.contains(&resource.as_str()) {
                    problems.push(format!(
                        "output {} reads from unknown resource '{resource}'",
                        output.name
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "Declaration is inconsistent:\n  - {}",
                problems.join("\n  - ")
            ))
        }
    }
}
