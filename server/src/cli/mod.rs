use clap::Parser;
use std::path::PathBuf;

/// Server CLI for planet-server
#[derive(Parser, Debug, Clone)]
#[command(name = "planet-server", version, about = "Planet session sync server")]
pub struct ServerCli {
    /// Path to config file
    #[arg(long, default_value = "planet-server.toml")]
    pub config: PathBuf,

    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory of static client assets (overrides config)
    #[arg(long)]
    pub public_dir: Option<PathBuf>,

    /// Persist CLI overrides back to the config file
    #[arg(long, default_value_t = false)]
    pub persist: bool,

    /// Verbose logging with targets, threads and source locations
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = ServerCli::parse_from(["planet-server"]);
        assert_eq!(cli.config, PathBuf::from("planet-server.toml"));
        assert!(cli.port.is_none());
        assert!(!cli.persist);
        assert!(!cli.debug);
    }

    #[test]
    fn overrides() {
        let cli = ServerCli::parse_from([
            "planet-server",
            "--config",
            "conf/dev.toml",
            "--port",
            "4000",
            "--public-dir",
            "dist",
            "--persist",
        ]);
        assert_eq!(cli.config, PathBuf::from("conf/dev.toml"));
        assert_eq!(cli.port, Some(4000));
        assert_eq!(cli.public_dir, Some(PathBuf::from("dist")));
        assert!(cli.persist);
    }
}
