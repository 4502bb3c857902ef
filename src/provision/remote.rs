use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Provisioned, Provisioner, ResolvedOutput};
use crate::{config::CliConfig, decl::Declaration, error};

const NOT_REPORTED: &str = "<not reported>";

/// Sends the declaration to the provisioning API, which owns diffing and
/// the actual cloud calls.
pub struct Remote<'a> {
    client: &'a Client,
    config: &'a CliConfig,
}

#[derive(Serialize)]
struct ApplyStackRequest<'a> {
    request_id: Uuid,
    declaration: &'a Declaration,
}

#[derive(Deserialize)]
struct StackOutput {
    name: String,
    value: String,
}

#[derive(Deserialize)]
struct ApplyStackResponse {
    id: Uuid,
    created_at: DateTime<Utc>,
    #[serde(default)]
    outputs: Vec<StackOutput>,
}

impl<'a> Remote<'a> {
    pub fn new(client: &'a Client, config: &'a CliConfig) -> Self {
        Remote { client, config }
    }
}

impl Provisioner for Remote<'_> {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn apply(&self, declaration: &Declaration) -> Result<Provisioned> {
        let request = ApplyStackRequest {
            request_id: Uuid::new_v4(),
            declaration,
        };
        log::debug!("Submitting stack apply request {}", request.request_id);

        let mut builder = self.client.post(self.config.url("/stacks")).json(&request);
        if let Some(token) = self.config.token() {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        if !response.status().is_success() {
            return Err(error::http_error(response, "apply stack").await);
        }

        let response: ApplyStackResponse = response.json().await?;

        // Keep the declared order and descriptions; the API only reports values.
        let outputs = declaration
            .outputs
            .iter()
            .map(|declared| {
                let value = match response.outputs.iter().find(|o| o.name == declared.name) {
                    Some(reported) => reported.value.clone(),
                    None => {
                        log::warn!("Provisioner did not report output {}", declared.name);
                        NOT_REPORTED.to_string()
                    }
                };
                ResolvedOutput {
                    name: declared.name.clone(),
                    value,
                    description: declared.description.clone(),
                }
            })
            .collect();

        Ok(Provisioned {
            deployment_id: response.id,
            created_at: Some(response.created_at),
            outputs,
        })
    }
}
