use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "planet-cli", version, about = "Headless client for the planet server", long_about = None)]
pub struct Cli {
    /// Server address. Accepts http(s)://HOST:PORT, ws(s)://HOST:PORT/ws or
    /// a bare HOST:PORT; the socket path is always /ws.
    #[arg(long, default_value = "http://localhost:1323")]
    pub server: String,

    /// How long to keep printing server messages after the last one (ms)
    #[arg(long, default_value_t = 1200)]
    pub wait_ms: u64,

    /// Output JSON instead of human-readable text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Join the session under NAME, then disconnect. The server drops a
    /// player as soon as its socket closes, so use `watch --name` to stay in
    /// the session
    Join { name: String },
    /// Start the session (needs at least one joined player)
    Start,
    /// Stop the session
    Stop,
    /// Drop an object on the ground
    Drop {
        kind: String,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        angle: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
    },
    /// Destroy the object with the given id
    Destroy { id: String },
    /// Print every server message; with --name, join and keep the player alive
    Watch {
        #[arg(long)]
        name: Option<String>,
        /// Interval between keepAlive messages (ms)
        #[arg(long, default_value_t = 1000)]
        keep_alive_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drop_with_negative_angle() {
        let cli = Cli::parse_from(["planet-cli", "drop", "rock", "--angle", "-45", "--y", "2.5"]);
        match cli.command {
            Commands::Drop { kind, angle, y } => {
                assert_eq!(kind, "rock");
                assert_eq!(angle, -45.0);
                assert_eq!(y, 2.5);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.server, "http://localhost:1323");
    }

    #[test]
    fn join_help_points_to_watch() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let join = cmd
            .find_subcommand("join")
            .expect("join subcommand");
        let about = join.get_about().map(|s| s.to_string()).unwrap_or_default();
        assert!(about.contains("watch --name"), "join help: {}", about);
    }

    #[test]
    fn parse_watch() {
        let cli = Cli::parse_from(["planet-cli", "--json", "watch", "--name", "alice"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Watch { name: Some(ref n), keep_alive_ms: 1000 } if n == "alice"
        ));
    }
}
