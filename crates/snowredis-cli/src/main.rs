mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, CliConfig, Command};
use serde::Serialize;
use snowredis::{
    CoordinationStore, GeneratorConfig, RedisStore, SnowflakeGenerator, SnowflakeId, claim_key,
};
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry()?;

    let store = if config.command.needs_store() {
        connect_store(&config)?
    } else {
        None
    };
    match &config.command {
        Command::Generate { count } => generate(&config, store, *count),
        Command::Decode { ids } => decode(ids),
        Command::Release { ids } => {
            let store = store.context("release needs a coordination store")?;
            release(store.as_ref(), ids)
        }
    }
}

fn connect_store(config: &CliConfig) -> anyhow::Result<Option<Arc<dyn CoordinationStore>>> {
    let Some(url) = &config.redis_url else {
        if config.strict {
            tracing::warn!("strict mode requested without a store, generating locally");
        }
        return Ok(None);
    };
    let store = RedisStore::connect(url, Some(config.redis_timeout))
        .with_context(|| format!("failed to connect to Redis at {url}"))?;
    Ok(Some(Arc::new(store)))
}

fn generate(
    config: &CliConfig,
    store: Option<Arc<dyn CoordinationStore>>,
    count: usize,
) -> anyhow::Result<()> {
    let generator = SnowflakeGenerator::new(GeneratorConfig {
        datacenter_id: config.datacenter_id,
        worker_id: config.worker_id,
        store,
        strict_mode: config.strict,
    })
    .context("failed to build generator")?;

    tracing::info!(
        identity = %generator.identity(),
        strict = generator.is_strict(),
        count,
        "generating ids"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    for _ in 0..count {
        let id = generator.generate().context("failed to generate id")?;
        writeln!(out, "{id}")?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct DecodedId {
    id: SnowflakeId,
    valid: bool,
    timestamp: u64,
    unix_millis: u64,
    datacenter_id: u64,
    worker_id: u64,
    sequence: u64,
}

impl From<SnowflakeId> for DecodedId {
    fn from(id: SnowflakeId) -> Self {
        Self {
            id,
            valid: id.is_valid(),
            timestamp: id.timestamp(),
            unix_millis: id.unix_millis(),
            datacenter_id: id.datacenter_id(),
            worker_id: id.worker_id(),
            sequence: id.sequence(),
        }
    }
}

fn decode(ids: &[u64]) -> anyhow::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    for &raw in ids {
        let decoded = DecodedId::from(SnowflakeId::from_raw(raw));
        serde_json::to_writer(&mut out, &decoded)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn release(store: &dyn CoordinationStore, ids: &[u64]) -> anyhow::Result<()> {
    let keys: Vec<String> = ids
        .iter()
        .map(|&raw| claim_key(SnowflakeId::from_raw(raw)))
        .collect();
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();

    let removed = store
        .delete(&keys)
        .context("failed to delete claim records")?;
    tracing::info!(requested = keys.len(), removed, "released claims");
    println!("{removed}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowredis::{CLAIM_TTL, MemoryStore};

    #[test]
    fn decoded_id_serializes_fields() {
        let id = SnowflakeId::from_components(1_000, 3, 4, 5);
        let json = serde_json::to_value(DecodedId::from(id)).unwrap();
        assert_eq!(json["id"], id.to_raw());
        assert_eq!(json["datacenter_id"], 3);
        assert_eq!(json["worker_id"], 4);
        assert_eq!(json["sequence"], 5);
        assert_eq!(json["valid"], true);
    }

    #[test]
    fn release_deletes_claim_records() {
        let store = MemoryStore::new();
        let id = SnowflakeId::from_components(1, 1, 1, 1);
        store.set_if_absent(&claim_key(id), "1", CLAIM_TTL).unwrap();

        release(&store, &[id.to_raw(), 999]).unwrap();

        assert!(!store.contains(&claim_key(id)));
    }
}
