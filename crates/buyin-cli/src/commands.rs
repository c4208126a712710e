use anyhow::Context as _;
use buyin_sdk::input::{parse_amount, parse_chip_entry};
use buyin_sdk::{
    BuyIn, FileKeyValueStore, FinalChips, JsonPersistence, Outcome, Player, Settlement,
    Transaction,
};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::config::BuyInConfig;

type Game = BuyIn<JsonPersistence<FileKeyValueStore>>;

pub struct Session {
    pub config: BuyInConfig,
    pub format: OutputFormat,
}

impl Session {
    fn open_game(&self) -> anyhow::Result<Game> {
        let store = FileKeyValueStore::open(&self.config.data_dir);
        let persistence = JsonPersistence::with_policy(store, self.config.on_corrupt);
        BuyIn::open(persistence)
            .with_context(|| format!("opening game in {}", self.config.data_dir.display()))
    }

    fn json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = BuyInConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    debug!(data_dir = %config.data_dir.display(), "configuration resolved");
    let session = Session { config, format: cli.format };

    match cli.command {
        Command::Add(args) => cmd_add(&session, args),
        Command::Players(_) => cmd_players(&session),
        Command::Transfer(args) => cmd_transfer(&session, args),
        Command::History(args) => cmd_history(&session, args),
        Command::EndGame(args) => cmd_end_game(&session, args),
        Command::NewGame(args) => cmd_new_game(&session, args),
        Command::Config(_) => cmd_config(&session),
    }
}

fn cmd_add(session: &Session, args: AddArgs) -> anyhow::Result<()> {
    let mut game = session.open_game()?;
    let indices = game.add_players(&args.names, &args.amount)?;
    if session.json() {
        let touched: Vec<&Player> = indices.iter().map(|i| &game.players()[*i]).collect();
        println!("{}", serde_json::to_string_pretty(&touched)?);
        return Ok(());
    }
    for index in indices {
        let player = &game.players()[index];
        println!("  {} {}", "buy-in:".green(), render_player(player));
    }
    println!("Active Chip: {}", game.active_chips().to_string().bold());
    Ok(())
}

fn cmd_players(session: &Session) -> anyhow::Result<()> {
    let game = session.open_game()?;
    if session.json() {
        let out = json!({
            "players": game.players(),
            "active_chips": game.active_chips(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!("Active Chip: {}", game.active_chips().to_string().bold());
    if game.players().is_empty() {
        println!("No players.");
    }
    for player in game.players() {
        println!("  {}", render_player(player));
    }
    Ok(())
}

fn cmd_transfer(session: &Session, args: TransferArgs) -> anyhow::Result<()> {
    let mut game = session.open_game()?;
    let amount = parse_amount(&args.amount)?;
    let tx = game.transfer(&args.from, &args.to, amount)?;
    if session.json() {
        println!("{}", serde_json::to_string_pretty(&tx)?);
    } else {
        println!("{} {}", "✓".green().bold(), render_transaction(&tx));
    }
    Ok(())
}

fn cmd_history(session: &Session, args: HistoryArgs) -> anyhow::Result<()> {
    let game = session.open_game()?;
    let all = game.transactions();
    let shown = match args.limit {
        Some(n) => &all[all.len().saturating_sub(n)..],
        None => all,
    };
    if session.json() {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }
    if shown.is_empty() {
        println!("No transactions.");
    }
    for tx in shown {
        println!("  {}", render_transaction(tx));
    }
    Ok(())
}

fn cmd_end_game(session: &Session, args: EndGameArgs) -> anyhow::Result<()> {
    let game = session.open_game()?;
    let mut final_chips = collect_final_chips(&args.chips)?;
    if args.interactive {
        for player in game.players() {
            if final_chips.contains_key(&player.name) {
                continue;
            }
            let raw: String = Input::new()
                .with_prompt(format!("{} - Final Chips", player.name))
                .default("0".into())
                .validate_with(|s: &String| parse_amount(s).map(|_| ()))
                .interact_text()?;
            final_chips.insert(player.name.clone(), parse_amount(&raw)?);
        }
    }

    let settlement = game.end_game(&final_chips)?;
    if session.json() {
        println!("{}", serde_json::to_string_pretty(&settlement)?);
    } else {
        print_settlement(&settlement);
    }
    Ok(())
}

/// Parse repeated `NAME=CHIPS` entries. A later entry for the same name wins.
fn collect_final_chips(entries: &[String]) -> anyhow::Result<FinalChips> {
    let mut final_chips = FinalChips::new();
    for entry in entries {
        let (name, chips) =
            parse_chip_entry(entry).with_context(|| format!("invalid --chips entry {entry:?}"))?;
        final_chips.insert(name, chips);
    }
    Ok(final_chips)
}

fn cmd_new_game(session: &Session, args: NewGameArgs) -> anyhow::Result<()> {
    let mut game = session.open_game()?;
    let approved = if args.yes || !session.config.confirm_reset {
        true
    } else {
        Confirm::new()
            .with_prompt("Are you sure you want to start new game?")
            .default(false)
            .interact()?
    };
    if game.reset_all(|| approved)? {
        println!("{} New game started.", "✓".green().bold());
    } else {
        println!("Kept the current game.");
    }
    Ok(())
}

fn cmd_config(session: &Session) -> anyhow::Result<()> {
    if session.json() {
        println!("{}", serde_json::to_string_pretty(&session.config)?);
    } else {
        print!("{}", toml::to_string(&session.config)?);
    }
    Ok(())
}

fn render_player(player: &Player) -> String {
    let line = format!("{} - BuyIn: {}", player.name.bold(), player.balance);
    if player.is_in_profit() {
        format!("{} {}", line, "(Profit)".green())
    } else {
        line
    }
}

fn render_transaction(tx: &Transaction) -> String {
    format!(
        "{} transferred {} to {}",
        tx.from.bold(),
        tx.amount.to_string().yellow(),
        tx.to.bold()
    )
}

fn print_settlement(settlement: &Settlement) {
    println!("{}", "Game Summary".bold());
    for entry in &settlement.entries {
        match entry.outcome() {
            Outcome::Loss(_) => println!("  {}", entry.to_string().red()),
            Outcome::Profit(_) => println!("  {}", entry.to_string().green()),
        }
    }
    if !settlement.defaulted.is_empty() {
        println!(
            "{} no final chips for {}; counted as 0",
            "warning:".yellow().bold(),
            settlement.defaulted.join(", ")
        );
    }
}
