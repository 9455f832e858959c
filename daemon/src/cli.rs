//! CLI argument parsing for the ModelShelf daemon

use std::path::PathBuf;

use clap::Parser;

/// ModelShelf - Generative AI model catalog with ranked search and registry sync
#[derive(Parser, Debug)]
#[command(name = "modelshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind; if taken, the next free port is used
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// SQLite database path
    ///
    /// Defaults to catalog.db under the platform data directory
    /// (e.g. ~/.local/share/modelshelf on Linux).
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,

    /// Skip seeding the demo catalog into an empty database
    #[arg(long)]
    pub skip_seed: bool,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_help() {
        // --help exits with error (clap behavior)
        let cli = Cli::try_parse_from(["modelshelf", "--help"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["modelshelf"]).unwrap();
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, 5000);
        assert!(cli.db.is_none());
        assert!(!cli.no_cors);
        assert!(!cli.skip_seed);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "modelshelf",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--db",
            "/tmp/catalog.db",
            "--no-cors",
            "--skip-seed",
        ])
        .unwrap();
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/catalog.db")));
        assert!(cli.no_cors);
        assert!(cli.skip_seed);
    }

    #[test]
    fn test_cli_rejects_bad_port() {
        let cli = Cli::try_parse_from(["modelshelf", "--port", "notaport"]);
        assert!(cli.is_err());
    }
}
