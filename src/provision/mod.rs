//! Applying a [`Declaration`] to something that can create the resources.
//!
//! The declaration itself never talks to a provider. Swapping the
//! [`Provisioner`] changes where it goes: [`DryRun`] only walks the plan,
//! [`Remote`] hands it to the provisioning API.

mod plan;
mod remote;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decl::Declaration;
use crate::decl::output::OutputValue;

pub use plan::DryRun;
pub use remote::Remote;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOutput {
    pub name: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub deployment_id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
    pub outputs: Vec<ResolvedOutput>,
}

#[allow(async_fn_in_trait)]
pub trait Provisioner {
    fn name(&self) -> &'static str;

    async fn apply(&self, declaration: &Declaration) -> Result<Provisioned>;
}

/// Validates, then applies.
pub async fn provision<P: Provisioner>(
    provisioner: &P,
    declaration: &Declaration,
) -> Result<Provisioned> {
    declaration.validate()?;
    log::info!(
        "Applying stack {} with {} provisioner",
        declaration.stack_name,
        provisioner.name()
    );
    let provisioned = provisioner.apply(declaration).await?;
    log::info!(
        "Stack {} applied (deployment {})",
        declaration.stack_name,
        provisioned.deployment_id
    );
    Ok(provisioned)
}

/// Value of an output as far as it can be known before provisioning. Fixed
/// resource names are known up front; anything else is not.
pub fn resolve_locally(declaration: &Declaration, value: &OutputValue) -> Option<String> {
    match value {
        OutputValue::Literal { value } => Some(value.clone()),
        OutputValue::Attribute {
            resource,
            attribute,
        } if attribute == "Name" => {
            if resource.as_str() == declaration.service.id {
                Some(declaration.service.name.clone())
            } else if resource.as_str() == declaration.cluster.id {
                Some(declaration.cluster.name.clone())
            } else {
                None
            }
        }
        OutputValue::Attribute { .. } => None,
    }
}
