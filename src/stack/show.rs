use anyhow::Result;
use console::{Emoji, style};
use oci_spec::distribution::Reference;

use crate::decl::Declaration;
use crate::table::draw_table;

static STACK: Emoji = Emoji("📦 ", "");
static NETWORK: Emoji = Emoji("🌐 ", "");
static LOCK: Emoji = Emoji("🔒 ", "");
static CONTAINER: Emoji = Emoji("🐳 ", "");
static WARNING: Emoji = Emoji("⚠️  ", "");

pub fn show_stack(args: &clap::ArgMatches) -> Result<()> {
    let declaration = super::load_declaration(args)?;

    let header = format!("{} Stack {}", STACK, declaration.stack_name);
    println!("{}", style(&header).bold());
    println!("{}", "━".repeat(header.chars().count() + 5));
    println!();

    let rows = declaration
        .resources()
        .into_iter()
        .map(|resource| {
            let depends_on: Vec<&str> = resource.depends_on.iter().map(|r| r.as_str()).collect();
            vec![
                resource.logical_id,
                resource.kind.to_string(),
                if depends_on.is_empty() {
                    "-".to_string()
                } else {
                    depends_on.join(", ")
                },
                resource.detail,
            ]
        })
        .collect();
    draw_table("Resources", &["ID", "KIND", "DEPENDS ON", "DETAIL"], rows);

    show_subnets(&declaration)?;
    show_container(&declaration);

    let rows = declaration
        .access_rules
        .ingress
        .iter()
        .map(|rule| {
            vec![
                rule.peer.cidr().to_string(),
                rule.port.protocol().to_uppercase(),
                rule.port.number().to_string(),
                rule.description.clone(),
            ]
        })
        .collect();
    draw_table(
        &format!("{LOCK}Ingress ({})", declaration.access_rules.description),
        &["SOURCE", "PROTOCOL", "PORT", "DESCRIPTION"],
        rows,
    );

    Ok(())
}

fn show_subnets(declaration: &Declaration) -> Result<()> {
    let rows = declaration
        .network
        .subnets()?
        .into_iter()
        .map(|subnet| {
            vec![
                subnet.tier,
                format!("{:?}", subnet.kind).to_lowercase(),
                format!("zone {}", subnet.zone_index),
                subnet.cidr.to_string(),
            ]
        })
        .collect();
    draw_table(
        &format!("{NETWORK}Subnets of {}", declaration.network.id),
        &["TIER", "KIND", "ZONE", "CIDR"],
        rows,
    );
    Ok(())
}

/// Label and value lines for an image reference. A reference the OCI parser
/// rejects gets a `Warning` line; the tag is never validated here.
fn image_lines(image: &str) -> Vec<(&'static str, String)> {
    let mut lines = vec![("Image", image.to_string())];
    match image.parse::<Reference>() {
        Ok(reference) => {
            lines.push(("Registry", reference.resolve_registry().to_string()));
            lines.push(("Repository", reference.repository().to_string()));
            lines.push(("Tag", reference.tag().unwrap_or("latest").to_string()));
        }
        Err(e) => lines.push((
            "Warning",
            format!("Image reference does not parse as an OCI reference: {e}"),
        )),
    }
    lines
}

fn show_container(declaration: &Declaration) {
    let task = &declaration.task_definition;
    let container = &task.container;

    println!(
        "{}",
        style(format!("{CONTAINER}Container {}", container.name)).bold()
    );
    for (label, value) in image_lines(&container.image.to_string()) {
        match label {
            "Image" => println!("{:<14}{}", "Image:", style(value).cyan()),
            "Warning" => println!("{}{}", WARNING, style(value).yellow()),
            _ => println!("{:<14}{}", format!("{label}:"), value),
        }
    }
    println!("CPU / memory: {} units / {} MiB", task.cpu, task.memory_mib);
    println!(
        "Logs:         {:?} (stream prefix '{}')",
        container.logging.driver, container.logging.stream_prefix
    );
    let ports: Vec<String> = container.port_mappings.iter().map(|p| p.to_string()).collect();
    println!("Ports:        {}", ports.join(", "));
    println!();
}
