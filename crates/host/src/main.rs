use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::{info, warn};

use stockshift_host::{HostConfig, TransferCardDriver};
use stockshift_transfers::SnapshotDocument;

fn main() -> anyhow::Result<()> {
    let mut config = HostConfig::from_env();
    stockshift_observability::init_with(config.log_format);

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: stockshift <snapshot.json>");
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let doc: SnapshotDocument = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;

    if config.source.is_none() {
        config.source = Some(path.display().to_string());
    }
    if config.columns.is_empty() {
        config.columns = if doc.columns.is_empty() {
            doc.snapshot.column_ids()
        } else {
            doc.columns
        };
    }
    info!(
        source = ?config.source,
        columns = config.columns.len(),
        card = %config.card_index,
        "rendering transfer card"
    );

    let initiate = config.initiate;
    let mut driver = TransferCardDriver::with_logging_sinks(config);
    let snapshot = Arc::new(doc.snapshot);
    let card = driver.refresh(&snapshot);

    println!("{}", serde_json::to_string_pretty(&card)?);

    if initiate {
        match driver.initiate(&card) {
            Some(request) => info!(transfer_id = %request.transfer_id, "transfer initiated"),
            None => warn!("no transfer initiated"),
        }
    }

    Ok(())
}
