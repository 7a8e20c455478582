use loan_sim_core::SimulatorConfig;
use std::fs;
use std::path::Path;

/// Load simulator policy from a JSON or YAML file, or the built-in defaults.
pub fn load_config(path: Option<&str>) -> Result<SimulatorConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::debug!("no --config given, using built-in rate table and policies");
        return Ok(SimulatorConfig::default());
    };

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {}", path, e))?;

    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let config = if is_yaml {
        let config: SimulatorConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?;
        config.validate()?;
        config
    } else {
        SimulatorConfig::from_json(&contents)?
    };

    tracing::debug!(path, rates = ?config.rates, "loaded simulator config");
    Ok(config)
}
