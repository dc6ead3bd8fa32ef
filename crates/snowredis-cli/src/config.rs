use anyhow::bail;
use clap::{Parser, Subcommand};
use core::time::Duration;

/// Command-line and environment configuration for the `snowredis` binary.
///
/// Every global option can also be set through the environment (or a `.env`
/// file in the working directory).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowredis",
    version,
    about = "Generate, decode and release Redis-coordinated Snowflake IDs"
)]
pub struct CliArgs {
    /// Redis URL of the shared coordination store, e.g.
    /// `redis://127.0.0.1:6379/0`.
    ///
    /// Without it, IDs are generated locally and strict mode has no effect.
    ///
    /// Environment variable: `REDIS_URL`
    #[arg(long, env = "REDIS_URL", global = true)]
    pub redis_url: Option<String>,

    /// Read/write timeout for every Redis command, in milliseconds.
    ///
    /// Environment variable: `REDIS_TIMEOUT_MS`
    #[arg(long, env = "REDIS_TIMEOUT_MS", default_value_t = 1_000, global = true)]
    pub redis_timeout_ms: u64,

    /// Datacenter ID (0-31). `0` leaves it unset.
    ///
    /// Used only if the worker ID is set too; otherwise the identity is
    /// allocated from Redis, or defaults to `(1, 1)` without Redis.
    ///
    /// Environment variable: `SNOWREDIS_DATACENTER_ID`
    #[arg(long, env = "SNOWREDIS_DATACENTER_ID", default_value_t = 0, global = true)]
    pub datacenter_id: i64,

    /// Worker ID (0-31). `0` leaves it unset.
    ///
    /// Environment variable: `SNOWREDIS_WORKER_ID`
    #[arg(long, env = "SNOWREDIS_WORKER_ID", default_value_t = 0, global = true)]
    pub worker_id: i64,

    /// Claim every generated ID in Redis before printing it.
    ///
    /// Environment variable: `SNOWREDIS_STRICT`
    #[arg(long, env = "SNOWREDIS_STRICT", default_value_t = false, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print freshly generated IDs, one per line.
    Generate {
        /// How many IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Print the fields of each ID as a JSON line.
    Decode {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Delete the strict-mode claim records of the given IDs.
    Release {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}

impl Command {
    /// Whether the command talks to the coordination store. `decode` is pure
    /// and never connects, even with `REDIS_URL` set.
    pub fn needs_store(&self) -> bool {
        !matches!(self, Self::Decode { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub redis_url: Option<String>,
    pub redis_timeout: Duration,
    pub datacenter_id: i64,
    pub worker_id: i64,
    pub strict: bool,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.redis_timeout_ms == 0 {
            bail!("REDIS_TIMEOUT_MS must be greater than 0");
        }

        match &args.command {
            Command::Generate { count: 0 } => bail!("--count must be greater than 0"),
            Command::Release { .. } if args.redis_url.is_none() => {
                bail!("release needs a store: set --redis-url or REDIS_URL")
            }
            _ => {}
        }

        Ok(Self {
            redis_url: args.redis_url,
            redis_timeout: Duration::from_millis(args.redis_timeout_ms),
            datacenter_id: args.datacenter_id,
            worker_id: args.worker_id,
            strict: args.strict,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<CliConfig> {
        let args = CliArgs::try_parse_from(argv)?;
        CliConfig::try_from(args)
    }

    #[test]
    fn generate_defaults_to_one_id() {
        let config = parse(&["snowredis", "generate"]).unwrap();
        assert_eq!(config.command, Command::Generate { count: 1 });
        assert_eq!(config.redis_timeout, Duration::from_secs(1));
    }

    #[test]
    fn global_options_follow_subcommand() {
        let config = parse(&[
            "snowredis",
            "generate",
            "-n",
            "5",
            "--datacenter-id",
            "3",
            "--worker-id",
            "4",
            "--strict",
        ])
        .unwrap();
        assert_eq!(config.command, Command::Generate { count: 5 });
        assert_eq!((config.datacenter_id, config.worker_id), (3, 4));
        assert!(config.strict);
    }

    #[test]
    fn rejects_zero_count() {
        assert!(parse(&["snowredis", "generate", "--count", "0"]).is_err());
    }

    #[test]
    fn release_requires_store() {
        assert!(parse(&["snowredis", "release", "42"]).is_err());
        let config = parse(&[
            "snowredis",
            "--redis-url",
            "redis://localhost:6379/0",
            "release",
            "42",
            "43",
        ])
        .unwrap();
        assert_eq!(config.command, Command::Release { ids: vec![42, 43] });
    }

    #[test]
    fn decode_requires_ids() {
        assert!(parse(&["snowredis", "decode"]).is_err());
    }

    #[test]
    fn decode_never_needs_store() {
        let config = parse(&[
            "snowredis",
            "--redis-url",
            "redis://unreachable.invalid:6379/0",
            "decode",
            "42",
        ])
        .unwrap();
        assert_eq!(config.command, Command::Decode { ids: vec![42] });
        assert!(!config.command.needs_store());

        assert!(Command::Generate { count: 1 }.needs_store());
        assert!(Command::Release { ids: vec![42] }.needs_store());
    }
}
