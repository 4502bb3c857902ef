use anyhow::{Result, anyhow};
use console::Emoji;
use dialoguer::Confirm;
use reqwest::Client;

use crate::config::CliConfig;
use crate::default_spinner;
use crate::provision::{self, DryRun, Provisioned, Remote};
use crate::table::draw_table;

static ROCKET: Emoji = Emoji("🚀 ", "");
static CHECK: Emoji = Emoji("✅ ", "");
static CLIPBOARD: Emoji = Emoji("📋 ", "");

pub async fn deploy_stack(
    client: &Client,
    config: &CliConfig,
    args: &clap::ArgMatches,
) -> Result<()> {
    let declaration = super::load_declaration(args)?;

    if args.get_flag("dry_run") {
        let provisioned = provision::provision(&DryRun, &declaration).await?;
        print_outputs(&declaration.stack_name, &provisioned);
        return Ok(());
    }

    // Checked again by provision(); this one fails before the prompt.
    declaration.validate()?;
    if !args.get_flag("yes") {
        let confirm = Confirm::new()
            .with_prompt(format!(
                "Deploy {} with image {}?",
                console::style(&declaration.stack_name).bold().cyan(),
                console::style(&declaration.task_definition.container.image).cyan(),
            ))
            .default(false)
            .interact()?;
        if !confirm {
            return Err(anyhow!("Deployment cancelled"));
        }
    }

    let progress = default_spinner();
    progress.set_prefix("Deploying");
    progress.set_message(format!(
        "{ROCKET}Applying stack {}...",
        declaration.stack_name
    ));

    let result = provision::provision(&Remote::new(client, config), &declaration).await;
    progress.finish_and_clear();
    let provisioned = result?;

    println!(
        "{}Stack {} deployed (deployment {})",
        CHECK,
        console::style(&declaration.stack_name).bold().green(),
        console::style(&provisioned.deployment_id.to_string()[..8]).yellow()
    );
    if let Some(created_at) = provisioned.created_at {
        println!("Created:      {}", console::style(created_at).dim());
    }
    print_outputs(&declaration.stack_name, &provisioned);
    Ok(())
}

fn print_outputs(stack_name: &str, provisioned: &Provisioned) {
    let rows = provisioned
        .outputs
        .iter()
        .map(|output| {
            vec![
                output.name.clone(),
                output.value.clone(),
                output.description.clone(),
            ]
        })
        .collect();
    draw_table(
        &format!("{CLIPBOARD}Outputs of {stack_name}"),
        &["NAME", "VALUE", "DESCRIPTION"],
        rows,
    );
}
