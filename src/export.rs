//! Headless mode: one refresh cycle written to a JSON file.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use sensorwatch_client::{ClientConfig, Dashboard};

use crate::data::DashboardData;
use crate::source::ChannelSource;

/// Fold everything queued on `source` into a fresh [`DashboardData`].
pub fn collect(source: &mut ChannelSource) -> DashboardData {
    let mut data = DashboardData::new();
    for event in source.drain() {
        data.apply(event);
    }
    data
}

/// Write `data` as pretty-printed JSON.
pub fn write_export(data: &DashboardData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&data.to_export_json())?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Log in, run a single cycle and export the results.
///
/// Fails without writing anything when the initial login fails.
pub fn export_to_file(config: ClientConfig, path: &Path) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let (renderer, mut source) = ChannelSource::create(&config.base_url);
    let dashboard = Dashboard::connect(config, Arc::new(renderer))?;

    rt.block_on(dashboard.refresh_once())
        .context("Initial login failed")?;

    let data = collect(&mut source);
    write_export(&data, path)?;

    println!("Exported dashboard state to: {}", path.display());
    Ok(())
}
