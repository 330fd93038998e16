use clap::{Parser, Subcommand};

/// Hide a token in an image, or reveal one.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file (TOML format)
    ///
    /// Example: config/server.toml
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log every bit the codec reads or writes
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Hide a token in an image and save the result as PNG
    Hide {
        /// Image path, or a name inside the configured pictures directory
        #[arg(short, long)]
        image: String,

        /// Token to hide
        #[arg(short, long)]
        token: String,

        /// Output path (defaults to the input path with a .png extension)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the token hidden in an image
    Reveal {
        #[arg(short, long)]
        image: String,
    },

    /// Show how many bytes an image can hold
    Capacity {
        #[arg(short, long)]
        image: String,

        /// Also check whether this token fits
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hide() {
        let args = Args::try_parse_from([
            "steg", "hide", "--image", "fruit.jpg", "--token", "hello123",
        ])
        .unwrap();
        assert!(!args.verbose);
        assert_eq!(
            args.command,
            Command::Hide {
                image: "fruit.jpg".to_string(),
                token: "hello123".to_string(),
                output: None,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "steg",
            "reveal",
            "-i",
            "elephant.png",
            "--verbose",
            "--config",
            "config/server.toml",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("config/server.toml"));
    }

    #[test]
    fn test_hide_requires_token() {
        assert!(Args::try_parse_from(["steg", "hide", "--image", "a.png"]).is_err());
    }
}
