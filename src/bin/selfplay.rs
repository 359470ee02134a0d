use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backgammon::config::SimulationConfig;
use backgammon::dice::RandomDice;
use backgammon::game::{Color, GameSession};
use backgammon::players::RandomPlayer;

/// Play backgammon games between two random players.
#[derive(Parser)]
#[command(name = "selfplay", about = "Run random-vs-random backgammon games")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "selfplay.toml")]
    config: PathBuf,

    /// Override number of games to play
    #[arg(short, long)]
    games: Option<u32>,

    /// Override RNG seed (for deterministic games)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let mut config = SimulationConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.validate().context("validating configuration")?;

    let mut white_wins = 0u32;
    let mut black_wins = 0u32;
    let mut unfinished = 0u32;

    for game in 0..config.games {
        let winner = play_game(&config, game).with_context(|| format!("playing game {game}"))?;
        match winner {
            Some(Color::White) => white_wins += 1,
            Some(Color::Black) => black_wins += 1,
            None => unfinished += 1,
        }
    }

    info!(
        games = config.games,
        white_wins, black_wins, unfinished, "self-play finished"
    );
    println!(
        "{} games: White {white_wins}, Black {black_wins}, unfinished {unfinished}",
        config.games
    );
    Ok(())
}

fn play_game(config: &SimulationConfig, game: u32) -> Result<Option<Color>> {
    // Derive per-game seeds so each game differs but the run reproduces.
    let (dice, white, black) = match config.seed {
        Some(seed) => {
            let base = seed.wrapping_add(u64::from(game) * 3);
            (
                RandomDice::from_seed(base),
                RandomPlayer::from_seed(base.wrapping_add(1)),
                RandomPlayer::from_seed(base.wrapping_add(2)),
            )
        }
        None => (RandomDice::new(), RandomPlayer::new(), RandomPlayer::new()),
    };

    let mut session = GameSession::new_standard(Box::new(dice));
    session.connect_player(Color::White, Box::new(white));
    session.connect_player(Color::Black, Box::new(black));

    let winner = session.run(config.max_moves)?;
    info!(
        game,
        winner = winner.map(Color::name),
        moves = session.moves_made(),
        "game finished"
    );
    Ok(winner)
}
