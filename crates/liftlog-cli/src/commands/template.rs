//! Template catalog commands for CLI.

use clap::Subcommand;
use liftlog_core::Config;

use crate::context::load_catalog;

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List available templates
    List,
    /// Show a template's exercises as JSON
    Show {
        /// Template name (case-insensitive)
        name: String,
    },
}

pub fn run(action: TemplateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let catalog = load_catalog(&config)?;

    match action {
        TemplateAction::List => {
            for template in catalog.templates() {
                println!(
                    "{} ({} exercises, {} sets)",
                    template.name,
                    template.exercises.len(),
                    template.total_sets()
                );
            }
        }
        TemplateAction::Show { name } => match catalog.template(&name) {
            Some(template) => println!("{}", serde_json::to_string_pretty(template)?),
            None => return Err(format!("unknown template: {name}").into()),
        },
    }
    Ok(())
}
