//! extform CLI - build, inspect and time extensive-form games
//!
//! This binary is a harness around the engine and tree builder:
//! - `demo` builds the two-stage example game both ways and compares them
//! - `inspect` loads a nested JSON description and prints the game
//! - `bench validate` times validation on generated uniform trees

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use extform_engine::test_tree::build_uniform_tree;
use extform_engine::{validate_tree, ExtensiveFormGame, NodeId, Player};
use extform_tree::{to_graph, Roster, TreeBuilder};
use log::{debug, info};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "extform")]
#[command(version, about = "Extensive-form game trees", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the two-stage example game and print it
    Demo,

    /// Load a nested JSON game description and print it
    Inspect(InspectArgs),

    /// Timing harnesses
    #[command(subcommand)]
    Bench(BenchCommand),
}

#[derive(Args)]
struct InspectArgs {
    /// Path to a JSON file
    file: PathBuf,

    /// Player names used in the description
    #[arg(short, long = "player", required = true)]
    players: Vec<String>,

    /// Node ids to group into one information set
    #[arg(long, value_delimiter = ',')]
    group: Vec<NodeId>,
}

#[derive(Subcommand)]
enum BenchCommand {
    /// Validate generated uniform trees
    Validate(ValidateArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Tree depth
    #[arg(long, default_value_t = 8)]
    depth: usize,

    /// Actions per decision point
    #[arg(long, default_value_t = 3)]
    branching: usize,

    /// Number of timed runs
    #[arg(long, default_value_t = 10)]
    iterations: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Demo => demo(),
        Commands::Inspect(args) => inspect(args),
        Commands::Bench(BenchCommand::Validate(args)) => bench_validate(args),
    }
}

fn demo() -> Result<()> {
    let roster = Roster::from_names(["Player 1", "Player 2"]);
    let description = json!({
        "C": {
            "A": {"payoffs": {"Player 1": 0, "Player 2": 1}},
            "B": {"payoffs": {"Player 1": 1, "Player 2": 0}}
        },
        "D": {
            "A": {"payoffs": {"Player 1": 2, "Player 2": 4}},
            "B": {"payoffs": {"Player 1": 2, "Player 2": 1}}
        }
    });
    let game = TreeBuilder::value(&description, &roster)?;
    print_game(&game);

    let n1 = game.child(game.root(), "C").context("root has no action C")?;
    let n2 = game.child(game.root(), "D").context("root has no action D")?;
    let set = game.assign_information_set(&[n1, n2])?;
    println!();
    println!("Nodes {} and {} now share information set {}", n1, n2, set);

    let (graph, root) = to_graph(&game);
    let rebuilt = TreeBuilder::graph(&graph, root)?;
    println!(
        "Rebuilt from a {}-vertex graph: structurally equal = {}",
        graph.node_count(),
        rebuilt == game
    );
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
    let roster = Roster::from_names(&args.players);
    debug!("roster: {:?}", roster.players());

    let game = TreeBuilder::value(&value, &roster)
        .with_context(|| format!("{} does not describe a game", args.file.display()))?;
    print_game(&game);

    if !args.group.is_empty() {
        let set = game.assign_information_set(&args.group)?;
        println!();
        println!("Information set {}: {:?}", set, args.group);
    }
    Ok(())
}

fn bench_validate(args: ValidateArgs) -> Result<()> {
    if args.branching == 0 || args.iterations == 0 {
        bail!("branching and iterations must be positive");
    }
    let players = [Player::new("P1"), Player::new("P2")];
    let (arena, root) = build_uniform_tree(args.depth, args.branching, &players);
    info!(
        "validating a tree of {} nodes (depth {}, branching {})",
        arena.len(),
        args.depth,
        args.branching
    );

    let start = Instant::now();
    for _ in 0..args.iterations {
        validate_tree(&arena, root)?;
    }
    let elapsed = start.elapsed();

    let per_run = elapsed / args.iterations;
    let nodes_per_sec = arena.len() as f64 / per_run.as_secs_f64();
    println!("Results:");
    println!("  Nodes: {}", arena.len());
    println!("  Per validation: {:?}", per_run);
    println!("  Throughput: {:.2}M nodes/sec", nodes_per_sec / 1_000_000.0);

    let game = ExtensiveFormGame::new(arena, root)?;
    let start = Instant::now();
    let table = game.payoff_table();
    println!(
        "  Payoff table: {} leaves x {} players in {:?}",
        table.num_leaves(),
        table.num_players(),
        start.elapsed()
    );
    Ok(())
}

fn print_game(game: &ExtensiveFormGame) {
    println!("{}", game);
    for &id in game.preorder() {
        let node = &game.nodes()[id as usize];
        let infoset = game
            .information_sets()
            .infoset_of(id)
            .map(|set| format!(" [infoset {}]", set))
            .unwrap_or_default();
        println!("  {:>3} {:<8} {}{}", id, node.role(), node, infoset);
        println!("      {}", node.attributes());
    }

    let table = game.payoff_table();
    let names: Vec<&str> = table.players.iter().map(Player::name).collect();
    println!();
    println!("Payoffs ({}):", names.join(", "));
    for (leaf, row) in table.leaves.iter().zip(&table.rows) {
        let path: Vec<String> = game
            .path_to(*leaf)
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("  {:>3} {:<16} {:?}", leaf, path.join(" > "), row);
    }
}
