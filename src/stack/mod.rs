use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command};
use reqwest::Client;

use crate::config::CliConfig;
use crate::context::{CONTEXT_FILE, Context, StackConfig};
use crate::decl::{self, Declaration};

mod deploy;
mod outputs;
mod show;
mod synth;

fn with_context_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("context")
                .help("Set a context value, e.g. -c imageTag=1.25-alpine")
                .long("context")
                .short('c')
                .value_name("KEY=VALUE")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("context_file")
                .help(format!(
                    "Read context from this TOML file instead of ./{CONTEXT_FILE}"
                ))
                .long("context-file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

pub fn commands() -> Vec<Command> {
    vec![
        with_context_args(
            Command::new("synth")
                .about("Print the stack declaration as JSON")
                .arg(
                    Arg::new("compact")
                        .help("Print on a single line")
                        .long("compact")
                        .action(ArgAction::SetTrue),
                ),
        ),
        with_context_args(
            Command::new("show")
                .alias("info")
                .about("Show the declared resources, access rules and outputs"),
        ),
        with_context_args(
            Command::new("outputs")
                .about("List the outputs the stack will report after deployment"),
        ),
        with_context_args(
            Command::new("deploy")
                .about("Validate the stack and apply it through the provisioning API")
                .arg(
                    Arg::new("dry_run")
                        .help("Walk the creation plan without contacting the provisioning API")
                        .long("dry-run")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("yes")
                        .help("Skip the confirmation prompt")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue),
                ),
        ),
    ]
}

pub async fn handle(config: &CliConfig, client: &Client, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("synth", args)) => synth::synth(args),
        Some(("show", args)) | Some(("info", args)) => show::show_stack(args),
        Some(("outputs", args)) => outputs::list_outputs(args),
        Some(("deploy", args)) => deploy::deploy_stack(client, config, args).await,
        Some((name, _)) => Err(anyhow!("Unknown command: {name}")),
        None => Err(anyhow!("No command given")),
    }
}

/// File context first, then `-c` overrides on top.
pub fn load_context(args: &ArgMatches) -> Result<Context> {
    let mut context = match args.get_one::<PathBuf>("context_file") {
        Some(path) => Context::load_file(path)?,
        None => Context::find_and_load(&std::env::current_dir()?)?,
    };
    if let Some(values) = args.get_many::<String>("context") {
        context.apply_overrides(values.map(String::as_str))?;
    }
    Ok(context)
}

pub fn load_declaration(args: &ArgMatches) -> Result<Declaration> {
    let context = load_context(args)?;
    let config = StackConfig::from_context(&context);
    log::debug!("Resolved image tag: {}", config.image_tag);
    Ok(decl::build(&config))
}
