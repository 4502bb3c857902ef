use anyhow::Result;
use clap::Command;
use reqwest::Client;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let matches = Command::new("ecs-deploy-test")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Declares and deploys a public nginx container service for deployment checks")
        .subcommand_required(true)
        .subcommands(ecs_deploy_test::stack::commands())
        .get_matches();
    let config = ecs_deploy_test::config::CliConfig::init();
    let http_client = Client::new();

    if let Err(e) = ecs_deploy_test::stack::handle(&config, &http_client, &matches).await {
        log::debug!("Error: {e:?}");
        eprintln!("{} {}", console::style("error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
