use anyhow::Result;

pub fn synth(args: &clap::ArgMatches) -> Result<()> {
    let declaration = super::load_declaration(args)?;
    let rendered = if args.get_flag("compact") {
        serde_json::to_string(&declaration)?
    } else {
        serde_json::to_string_pretty(&declaration)?
    };
    println!("{rendered}");
    Ok(())
}
