use std::fmt;

use serde::{Deserialize, Serialize};

use super::ResourceRef;
use super::cluster::Cluster;
use super::service::Service;
use crate::context::StackConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputValue {
    Literal { value: String },
    /// Read from a resource attribute once the stack is provisioned.
    Attribute {
        resource: ResourceRef,
        attribute: String,
    },
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputValue::Literal { value } => write!(f, "{value}"),
            OutputValue::Attribute {
                resource,
                attribute,
            } => write!(f, "{resource}.{attribute}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub value: OutputValue,
    pub description: String,
}

pub fn declare(service: &Service, cluster: &Cluster, config: &StackConfig) -> Vec<Output> {
    vec![
        Output {
            name: "ServiceName".to_string(),
            value: OutputValue::Attribute {
                resource: service.reference(),
                attribute: "Name".to_string(),
            },
            description: "ECS Service Name".to_string(),
        },
        Output {
            name: "ClusterName".to_string(),
            value: OutputValue::Attribute {
                resource: cluster.reference(),
                attribute: "Name".to_string(),
            },
            description: "ECS Cluster Name".to_string(),
        },
        Output {
            name: "ImageTag".to_string(),
            value: OutputValue::Literal {
                value: config.image_tag.clone(),
            },
            description: "Nginx Docker image tag used".to_string(),
        },
    ]
}
