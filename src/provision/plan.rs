use anyhow::Result;
use uuid::Uuid;

use super::{Provisioned, Provisioner, ResolvedOutput, resolve_locally};
use crate::decl::Declaration;

const UNRESOLVED: &str = "<known after apply>";

/// Walks the creation plan without touching any provider.
#[derive(Debug, Default)]
pub struct DryRun;

impl Provisioner for DryRun {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn apply(&self, declaration: &Declaration) -> Result<Provisioned> {
        for (step, resource) in declaration.resources().iter().enumerate() {
            log::info!(
                "[{}] would create {} {} ({})",
                step + 1,
                resource.kind,
                resource.logical_id,
                resource.detail
            );
        }

        let outputs = declaration
            .outputs
            .iter()
            .map(|output| ResolvedOutput {
                name: output.name.clone(),
                value: resolve_locally(declaration, &output.value)
                    .unwrap_or_else(|| UNRESOLVED.to_string()),
                description: output.description.clone(),
            })
            .collect();

        Ok(Provisioned {
            deployment_id: Uuid::nil(),
            created_at: None,
            outputs,
        })
    }
}
