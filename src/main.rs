//! Gomoku engine command line
//!
//! Reads a position, asks the engine for a move and prints it with the search
//! statistics. `--selfplay` lets the engine play both sides.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use gomoku::{Board, Difficulty, EngineConfig, Move, MoveResult, Pos, SearchEngine, Stone};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    Black,
    White,
}

impl From<Side> for Stone {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Stone::Black,
            Side::White => Stone::White,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board file with 15 rows of `.`, `X` (Black) and `O` (White); `-` reads stdin
    #[arg(short, long, conflicts_with = "moves")]
    board: Option<PathBuf>,

    /// Moves played so far as `row:col` separated by commas, Black first
    #[arg(short, long)]
    moves: Option<String>,

    /// Side to move (default: decided by stone count)
    #[arg(short, long, value_enum)]
    side: Option<Side>,

    /// Strength preset: easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Time budget per move in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,

    /// Maximum iterative-deepening depth
    #[arg(long)]
    depth: Option<u32>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Play this many plies of engine against engine from the given position
    #[arg(long, value_name = "PLIES")]
    selfplay: Option<u32>,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let board = load_board(&args)?;
    let side = args.side.map(Stone::from).unwrap_or_else(|| side_by_parity(&board));

    let mut engine = SearchEngine::with_config(config);
    match args.selfplay {
        Some(plies) => selfplay(&mut engine, board, side, plies),
        None => {
            let result = engine.best_move_default(&board, side)?;
            print_result(side, &result);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .target(env_logger::Target::Stderr)
    .init();
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(difficulty) = args.difficulty {
        config.limits = difficulty.limits();
    }
    if let Some(ms) = args.time_ms {
        config.limits.time_budget_ms = ms;
    }
    if let Some(depth) = args.depth {
        config.limits.max_depth = depth;
    }
    config.validate().context("invalid engine settings")?;
    Ok(config)
}

fn load_board(args: &Args) -> Result<Board> {
    if let Some(path) = &args.board {
        let text = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading board from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("reading board {}", path.display()))?
        };
        return text.parse().context("parsing board");
    }

    let mut board = Board::new();
    if let Some(moves) = &args.moves {
        let mut stone = Stone::Black;
        for (seq, token) in moves.split(',').map(str::trim).filter(|t| !t.is_empty()).enumerate() {
            let pos: Pos = token.parse().with_context(|| format!("move #{}", seq + 1))?;
            let check = board
                .play(Move::new(pos, stone, seq as u32))
                .with_context(|| format!("move #{} ({pos})", seq + 1))?;
            if check.is_win {
                bail!("move #{} ({pos}) already ends the game", seq + 1);
            }
            stone = stone.opponent();
        }
    }
    Ok(board)
}

fn side_by_parity(board: &Board) -> Stone {
    let black = board.black.count();
    let white = board.white.count();
    if black > white {
        Stone::White
    } else {
        Stone::Black
    }
}

fn print_result(side: Stone, result: &MoveResult) {
    println!("{side:?} to move: {}", result.best_move);
    println!("  source:     {}", result.source);
    println!("  score:      {}", result.score);
    println!("  depth:      {}", result.depth_reached);
    println!("  nodes:      {}", result.nodes);
    println!("  time:       {}ms", result.time_ms);
    println!("  confidence: {:.2}", result.confidence);
    if result.stats.cutoffs > 0 {
        println!(
            "  cutoffs:    {} ({:.1}% first move), TT hits {:.1}%, null prunes {}, LMR re-searches {}",
            result.stats.cutoffs,
            result.stats.first_move_rate(),
            result.stats.tt_hit_rate(),
            result.stats.null_prunes,
            result.stats.lmr_researches
        );
    }
}

fn selfplay(engine: &mut SearchEngine, mut board: Board, mut side: Stone, plies: u32) -> Result<()> {
    let start_seq = board.stone_count();
    for ply in 0..plies {
        if board.is_full() {
            println!("board full: draw");
            break;
        }
        let result = engine.best_move_default(&board, side)?;
        let check = board.play(Move::new(result.best_move, side, start_seq + ply))?;
        println!(
            "{:>3}. {side:?} {} ({}, score {}, depth {}, {}ms)",
            start_seq + ply + 1,
            result.best_move,
            result.source,
            result.score,
            result.depth_reached,
            result.time_ms
        );
        if check.is_win {
            println!("{side:?} wins");
            break;
        }
        side = side.opponent();
    }
    print!("{board}");
    Ok(())
}
