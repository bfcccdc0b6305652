use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "linkvault")]
#[command(author, version, about = "Telegram file-sharing bot with time-limited access tokens", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Issue a fresh access token for a user and print the activation link
    Issue {
        /// Telegram user id
        user_id: i64,

        /// Bot username used in the deep link (without @)
        #[arg(short, long)]
        bot_username: String,
    },

    /// Delete every access token and user record
    Reset {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },

    /// Encode a payload (e.g. `token_<hex>` or `10-20`) into a start parameter
    Encode { payload: String },

    /// Decode a start parameter back into its payload
    Decode { param: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
