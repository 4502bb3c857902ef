use anyhow::Result;
use console::Emoji;

use crate::table::draw_table;

static OUTPUT: Emoji = Emoji("📤 ", "");

pub fn list_outputs(args: &clap::ArgMatches) -> Result<()> {
    let declaration = super::load_declaration(args)?;

    let rows = declaration
        .outputs
        .iter()
        .map(|output| {
            vec![
                output.name.clone(),
                output.value.to_string(),
                output.description.clone(),
            ]
        })
        .collect();

    draw_table(
        &format!("{OUTPUT}Outputs of {}", declaration.stack_name),
        &["NAME", "SOURCE", "DESCRIPTION"],
        rows,
    );
    Ok(())
}
