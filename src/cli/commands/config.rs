use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    let mut data = serde_json::to_value(config)?;
    data["database"]["backend"] = if config.database.url.is_some() {
        "postgres".into()
    } else {
        "memory".into()
    };

    output_success(&output_format, "Effective configuration", Some(data))
}
