//! [`Args`] definitions.

use clap::Parser;
use uuid::Uuid;

/// Server of the commercial document engine.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// ID of a tenant to seed with demo data on startup, overriding the
    /// `demo.tenant_id` configuration.
    #[arg(long, value_name = "UUID")]
    pub demo_tenant: Option<Uuid>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// If the arguments are malformed.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["server"]).unwrap();

        assert_eq!(args.config, "config.toml");
        assert!(args.demo_tenant.is_none());
    }

    #[test]
    fn parses_demo_tenant() {
        let args = Args::try_parse_from([
            "server",
            "-c",
            "dev.toml",
            "--demo-tenant",
            "6b1a3c55-9d6f-4e7b-8a56-0b8b7a2f9e11",
        ])
        .unwrap();

        assert_eq!(args.config, "dev.toml");
        assert_eq!(
            args.demo_tenant.map(|id| id.to_string()).as_deref(),
            Some("6b1a3c55-9d6f-4e7b-8a56-0b8b7a2f9e11"),
        );

        assert!(Args::try_parse_from(["server", "--demo-tenant", "42"])
            .is_err());
    }
}
