use crate::cli::{print_json, OutputFormat};
use crate::config::PipelineConfig;

/// Execute config subcommand: print the effective configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn run(config: &PipelineConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text | OutputFormat::Json => print_json(config)?,
        OutputFormat::Tsv => {
            let value = serde_json::to_value(config)?;
            if let serde_json::Value::Object(fields) = value {
                println!("key\tvalue");
                for (key, value) in fields {
                    println!("{key}\t{value}");
                }
            }
        }
    }
    Ok(())
}
