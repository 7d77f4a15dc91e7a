//! Terminal front end for Daylight Chronicles.
//!
//! Picks the creatures, then drives a `BattleRunner`: human turns are read
//! from stdin under the turn timer, computer turns wait out the pacing hint.

use clap::{Parser, ValueEnum};
use daylight_chronicles::{
    builtin_roster, BattleEvent, BattleRules, BattleRunner, CreatureData, ExecutionResult, GameMode,
    MatchConfig, MatchState, Roster, Side, MAX_HP,
};
use std::error::Error;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

type Input = Lines<BufReader<Stdin>>;

/// Turn-based creature duels in the terminal
#[derive(Parser, Debug)]
#[command(name = "daylight-chronicles")]
#[command(about = "Turn-based creature duels in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Who controls the second creature
    #[arg(long, value_enum, default_value_t = ModeArg::Computer)]
    mode: ModeArg,

    /// Creature id or name for the first side (prompted when omitted)
    #[arg(long)]
    player: Option<String>,

    /// Creature id or name for the second side (random against the computer)
    #[arg(long)]
    opponent: Option<String>,

    /// RON file overriding the battle rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// RON file replacing the built-in roster
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Print the roster and exit
    #[arg(long)]
    list: bool,

    /// Print every action result as a JSON line instead of text
    #[arg(long)]
    json: bool,

    /// Wait for input forever instead of timing out human turns
    #[arg(long)]
    no_timer: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Play against the computer
    Computer,
    /// Two players sharing one terminal
    Versus,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Computer => GameMode::VsComputer,
            ModeArg::Versus => GameMode::TwoPlayer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();
    let cli = Cli::parse();

    let roster = match &cli.roster {
        Some(path) => Roster::load(path)?,
        None => builtin_roster()?.clone(),
    };
    let rules = match &cli.rules {
        Some(path) => BattleRules::load(path)?,
        None => BattleRules::default(),
    };

    if cli.list {
        print_roster(&roster);
        return Ok(());
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mode = GameMode::from(cli.mode);

    println!("=== Daylight Chronicles ({}) ===", mode);
    let Some(player) = select_creature(&mut input, &roster, cli.player.clone(), mode.side_label(Side::Player)).await? else {
        return Ok(());
    };
    let opponent = match (cli.opponent.clone(), mode) {
        (Some(key), _) => Some(key),
        (None, GameMode::VsComputer) => None,
        (None, GameMode::TwoPlayer) => {
            match select_creature(&mut input, &roster, None, mode.side_label(Side::Opponent)).await? {
                Some(key) => Some(key),
                None => return Ok(()),
            }
        }
    };

    let config = MatchConfig {
        mode,
        player_creature: Some(player),
        opponent_creature: opponent,
    };
    let mut runner = BattleRunner::new(&config, &roster, rules)?;

    run_match(&mut runner, &mut input, &cli).await?;
    println!("Thanks for playing!");
    Ok(())
}

/// Logs go to stderr so they never interleave with the board on stdout.
fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_match(runner: &mut BattleRunner, input: &mut Input, cli: &Cli) -> Result<(), Box<dyn Error>> {
    if !cli.json {
        render_board(runner.state());
    }

    loop {
        if runner.is_battle_ended() || runner.is_stalled() {
            if let Some(winner) = runner.winner() {
                println!("*** {} Wins! ***", runner.state().label(winner));
            } else {
                println!("*** Neither side can move. The match is stalled. ***");
            }
            println!("Play again with the same creatures? [y/N]");
            match input.next_line().await? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                    let result = runner.reset();
                    report(runner, &result, cli.json)?;
                    continue;
                }
                _ => return Ok(()),
            }
        }

        let side = runner.whose_turn();
        let result = if runner.is_awaiting_human() {
            print_move_menu(runner.state(), side);
            let line = if cli.no_timer {
                input.next_line().await?
            } else {
                match tokio::time::timeout(runner.rules().turn_time_limit(), input.next_line()).await {
                    Ok(line) => line?,
                    Err(_) => {
                        println!("Time's up! A move is picked at random.");
                        let result = runner.handle_turn_timeout()?;
                        report(runner, &result, cli.json)?;
                        continue;
                    }
                }
            };

            let Some(line) = line else {
                return Ok(());
            };
            let choice = line.trim();
            if choice.eq_ignore_ascii_case("q") {
                return Ok(());
            }
            let Some(move_index) = parse_move_choice(choice) else {
                println!("Enter a move number, or q to quit.");
                continue;
            };

            match runner.submit_move(side, move_index) {
                Ok(result) => result,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            }
        } else {
            println!("{} is thinking...", runner.state().label(side));
            tokio::time::sleep(runner.next_action_delay()).await;
            runner.run_ai_turn()?
        };

        report(runner, &result, cli.json)?;
    }
}

fn report(runner: &BattleRunner, result: &ExecutionResult, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    if result.events.contains(&BattleEvent::MatchReset) {
        println!("--- The match starts over ---");
    }
    render_board(runner.state());
    Ok(())
}

/// Ask for a creature unless one was given on the command line. `None` means
/// stdin closed.
async fn select_creature(
    input: &mut Input,
    roster: &Roster,
    preset: Option<String>,
    label: &str,
) -> Result<Option<String>, Box<dyn Error>> {
    if let Some(key) = preset {
        return Ok(Some(key));
    }

    loop {
        println!("{}, choose your creature:", label);
        for (i, creature) in roster.creatures().iter().enumerate() {
            println!("  {}. {} ({})", i + 1, creature.name, creature.type_line());
        }

        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };
        let choice = line.trim();
        let picked = match choice.parse::<usize>() {
            Ok(n) if (1..=roster.len()).contains(&n) => roster.creatures().get(n - 1),
            _ => roster.find(choice).ok(),
        };
        match picked {
            Some(creature) => return Ok(Some(creature.id.clone())),
            None => println!("No creature called '{}'.", choice),
        }
    }
}

fn parse_move_choice(choice: &str) -> Option<usize> {
    match choice.parse::<usize>() {
        Ok(n) if n > 0 => Some(n - 1),
        _ => None,
    }
}

fn print_roster(roster: &Roster) {
    for creature in roster.creatures() {
        print_creature(creature);
        println!();
    }
}

fn print_creature(creature: &CreatureData) {
    let stats = &creature.stats;
    println!("{} [{}] ({})", creature.name, creature.id, creature.type_line());
    println!(
        "  Power {}  Skills {}  Intelligence {}  Physical {}  Magic {}",
        stats.power, stats.skills, stats.intelligence, stats.physical, stats.magic
    );
    println!("  {}", creature.description);
    for move_data in &creature.moves {
        let damage = match move_data.base_damage() {
            Some(damage) => damage.to_string(),
            None => "?".to_string(),
        };
        println!("    - {} ({}, {})", move_data.name, move_data.move_type, damage);
    }
}

fn render_board(state: &MatchState) {
    println!();
    for side in [Side::Player, Side::Opponent] {
        let combatant = state.combatant(side);
        let status = match combatant.status {
            Some(status) => format!(" [{} {}]", status.kind, status.turns_remaining),
            None => String::new(),
        };
        println!(
            "{:<9} {:<11} {} {:>3}/{}{}",
            state.label(side),
            combatant.creature.name,
            hp_bar(combatant.hp()),
            combatant.hp(),
            MAX_HP,
            status
        );
    }
    if let Some(weather) = state.weather {
        println!("Weather: {}", weather);
    }
    if state.combo_streak > 1 {
        println!("Combo: {}x", state.combo_streak);
    }
    for line in state.log.entries() {
        println!("  > {}", line);
    }
    println!();
}

fn hp_bar(hp: u16) -> String {
    const WIDTH: usize = 20;
    let filled = (hp as usize * WIDTH).div_ceil(MAX_HP as usize);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

fn print_move_menu(state: &MatchState, side: Side) {
    println!("{}'s turn:", state.label(side));
    let combatant = state.combatant(side);
    for (i, move_data) in combatant.creature.moves.iter().enumerate() {
        let uses = combatant.move_uses.remaining(i).unwrap_or(0);
        let marker = if uses == 0 { " (no uses left)" } else { "" };
        println!("  {}. {} [{} left]{}", i + 1, move_data.name, uses, marker);
    }
}
