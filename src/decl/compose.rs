use super::{Declaration, access, cluster, network, output, service, task};
use crate::context::StackConfig;

pub const STACK_NAME: &str = "EcsDeployTestStack";

/// Assembles the full declaration. Each step only consumes what the earlier
/// steps produced, so the order below is also the provisioning order.
pub fn build(config: &StackConfig) -> Declaration {
    let network = network::declare();
    log::debug!(
        "Declared network {} ({}, {} zones)",
        network.id,
        network.ipv4_cidr,
        network.max_azs
    );

    let cluster = cluster::declare(&network);
    log::debug!("Declared cluster {}", cluster.name);

    let task_definition = task::declare(config);
    log::debug!(
        "Declared task {} running {}",
        task_definition.id,
        task_definition.container.image
    );

    let access_rules = access::declare(&network);
    log::debug!(
        "Declared access rules {} with {} ingress rule(s)",
        access_rules.id,
        access_rules.ingress.len()
    );

    let service = service::declare(&cluster, &task_definition, &access_rules);
    log::debug!("Declared service {}", service.name);

    let outputs = output::declare(&service, &cluster, config);

    Declaration {
        stack_name: STACK_NAME.to_string(),
        network,
        cluster,
        task_definition,
        access_rules,
        service,
        outputs,
    }
}
