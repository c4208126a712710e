use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "buyin",
    about = "BuyIn: poker buy-in and chip transfer tracker",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (default: ./buyin.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the saved game
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add players or top up existing ones
    Add(AddArgs),
    /// List players, balances, and active chips
    Players(PlayersArgs),
    /// Transfer chips from one player to another
    Transfer(TransferArgs),
    /// Show transaction history
    History(HistoryArgs),
    /// Compute profit and loss from final chip counts
    EndGame(EndGameArgs),
    /// Clear all players and transactions
    NewGame(NewGameArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Player names, separated by commas or newlines
    pub names: String,
    /// Buy-in applied to every name
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: String,
}

#[derive(Args)]
pub struct PlayersArgs {}

#[derive(Args)]
pub struct TransferArgs {
    pub from: String,
    pub to: String,
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct EndGameArgs {
    /// Final chips for a player, as NAME=CHIPS (repeatable)
    #[arg(short, long = "chips", value_name = "NAME=CHIPS")]
    pub chips: Vec<String>,
    /// Prompt for every player without a --chips entry
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Args)]
pub struct NewGameArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ConfigArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add() {
        let cli = Cli::try_parse_from(["buyin", "add", "Alice, Bob", "--amount", "100"]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.names, "Alice, Bob");
            assert_eq!(args.amount, "100");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_add_requires_amount() {
        assert!(Cli::try_parse_from(["buyin", "add", "Alice"]).is_err());
    }

    #[test]
    fn parse_transfer() {
        let cli = Cli::try_parse_from(["buyin", "transfer", "Alice", "Bob", "30"]).unwrap();
        if let Command::Transfer(args) = cli.command {
            assert_eq!(args.from, "Alice");
            assert_eq!(args.to, "Bob");
            assert_eq!(args.amount, "30");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_transfer_negative_amount_reaches_ledger() {
        let cli = Cli::try_parse_from(["buyin", "transfer", "Alice", "Bob", "-5"]).unwrap();
        if let Command::Transfer(args) = cli.command {
            assert_eq!(args.amount, "-5");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_end_game_chips() {
        let cli = Cli::try_parse_from([
            "buyin", "end-game", "--chips", "Alice=50", "-c", "Bob=150",
        ])
        .unwrap();
        if let Command::EndGame(args) = cli.command {
            assert_eq!(args.chips, vec!["Alice=50", "Bob=150"]);
            assert!(!args.interactive);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_new_game_yes() {
        let cli = Cli::try_parse_from(["buyin", "new-game", "--yes"]).unwrap();
        if let Command::NewGame(args) = cli.command {
            assert!(args.yes);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_history_limit() {
        let cli = Cli::try_parse_from(["buyin", "history", "-n", "5"]).unwrap();
        if let Command::History(args) = cli.command {
            assert_eq!(args.limit, Some(5));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "buyin", "players", "--verbose", "--format", "json", "--data-dir", "/tmp/game",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/game")));
    }
}
