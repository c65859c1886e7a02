//! Strand Vault - Entry Point
//!
//! Sets up logging and the async runtime, picks a narrator (live LLM or
//! offline), and runs a line-based command loop over a game session.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use strand_vault::core::config::SimulationConfig;
use strand_vault::core::error::Result;
use strand_vault::core::types::{AgentId, MissionId, RoomId, SlotId, TerritoryId};
use strand_vault::llm::client::LlmClient;
use strand_vault::llm::narrator::{Narrator, ScriptedNarrator};
use strand_vault::simulation::{AssignTarget, Session};
use strand_vault::vault::hydroponics::CropType;

/// Strand Vault - manage a vault, run missions, take the wasteland
#[derive(Parser, Debug)]
#[command(name = "strand-vault")]
#[command(about = "Post-apocalyptic vault management simulation")]
struct Args {
    /// Random seed for deterministic runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file; missing keys fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the scripted narrator even if LLM_API_KEY is set
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strand_vault=info")),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    tracing::info!(seed = config.seed, "Strand Vault starting...");

    let rt = Runtime::new()?;

    let client = if args.offline {
        None
    } else {
        let request_timeout = Duration::from_millis(config.narrative.timeout_ms);
        match LlmClient::from_env().and_then(|c| c.with_request_timeout(request_timeout)) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("{} - running with the offline narrator", e);
                None
            }
        }
    };

    match client {
        Some(client) => {
            tracing::info!(model = client.model(), "using LLM narrator");
            run(&rt, Session::new(config, client)?)
        }
        None => run(&rt, Session::new(config, ScriptedNarrator::new())?),
    }
}

fn run<N: Narrator>(rt: &Runtime, mut session: Session<N>) -> Result<()> {
    println!("\n=== STRAND VAULT ===");
    println!("Vault management in the Kern County wastes");
    println!();
    print_help();

    loop {
        display_status(&session);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            continue;
        };

        if command == "quit" || command == "q" {
            break;
        }

        if let Err(e) = execute(rt, &mut session, command, rest) {
            println!("! {}", e);
        }
    }

    let state = session.state();
    println!(
        "\nVault offline. Day {}, {} territories held, reputation {}.",
        state.vault.day(),
        state.territories_held(),
        state.reputation
    );
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  tick / t [n]                 - Advance n ticks (default 1)");
    println!("  status / s                   - Show agents, rooms and resources");
    println!("  assign <agent> <room|idle>   - Post an agent to a room or stand them down");
    println!("  dispatch <mission> <agents>  - Send agents on a mission");
    println!("  plant <slot> <crop>          - Plant STIM-WORT, GLOW-GRAIN or IRON-STALK");
    println!("  harvest <slot>               - Harvest a ripe slot");
    println!("  map                          - Show territories");
    println!("  recon <territory>            - Request a tactical briefing");
    println!("  assault <territory> [agents] - Launch an assault (idle agents by default)");
    println!("  wave / w                     - Resolve the next wave");
    println!("  dismiss                      - Close the current assault");
    println!("  log [n]                      - Show the last n log entries");
    println!("  help / h                     - This list");
    println!("  quit / q                     - Exit");
    println!();
}

fn execute<N: Narrator>(
    rt: &Runtime,
    session: &mut Session<N>,
    command: &str,
    args: &[&str],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match command {
        "tick" | "t" => {
            let ticks = match args.first() {
                Some(n) => n.parse::<u64>()?,
                None => 1,
            };
            let report = session.tick(ticks)?;
            for result in &report.production {
                if let Some((kind, amount)) = result.produced {
                    println!("  {} produced {:.1} {}", result.room, amount, kind);
                }
            }
            for mission in &report.completed_missions {
                println!("  Mission {} returned", mission);
            }
            for level_up in &report.level_ups {
                println!("  {} reached level {}", level_up.agent, level_up.new_level);
            }
            println!("Tick {} complete.", session.state().vault.tick());
        }
        "status" | "s" => display_detailed_status(session),
        "assign" => {
            let [agent, target] = args else {
                return Err("usage: assign <agent> <room|idle>".into());
            };
            let target = if target.eq_ignore_ascii_case("idle") {
                AssignTarget::Idle
            } else {
                AssignTarget::Room(target.parse::<RoomId>()?)
            };
            session.assign(agent.parse::<AgentId>()?, target)?;
            println!("Assignment updated.");
        }
        "dispatch" => {
            let Some((mission, team)) = args.split_first() else {
                return Err("usage: dispatch <mission> <agents...>".into());
            };
            let team = parse_ids::<AgentId>(team)?;
            session.dispatch(mission.parse::<MissionId>()?, team)?;
            println!("Team dispatched.");
        }
        "plant" => {
            let [slot, crop] = args else {
                return Err("usage: plant <slot> <crop>".into());
            };
            let crop: CropType = crop.parse()?;
            session.plant(slot.parse::<SlotId>()?, crop)?;
            println!("{} planted.", crop);
        }
        "harvest" => {
            let [slot] = args else {
                return Err("usage: harvest <slot>".into());
            };
            let bundle = session.harvest(slot.parse::<SlotId>()?)?;
            for (kind, amount) in bundle {
                println!("  +{:.0} {}", amount, kind);
            }
        }
        "map" => display_map(session),
        "recon" => {
            let [territory] = args else {
                return Err("usage: recon <territory>".into());
            };
            let briefing = rt.block_on(session.recon(territory.parse::<TerritoryId>()?))?;
            println!();
            println!("== {} ==", briefing.title);
            println!("{}", briefing.description);
            println!(
                "  Enemy: {} | Difficulty: {:.0} | Impact: {:.0}",
                briefing.enemy_type, briefing.difficulty, briefing.stability_impact
            );
            println!("  Reward: {} ({})", briefing.reward_estimate, briefing.unique_reward_type);
        }
        "assault" => {
            let Some((territory, team)) = args.split_first() else {
                return Err("usage: assault <territory> [agents...]".into());
            };
            let team = if team.is_empty() {
                session.available_fighters()
            } else {
                parse_ids::<AgentId>(team)?
            };
            session.start_assault(territory.parse::<TerritoryId>()?, team)?;
            println!("Assault launched.");
        }
        "wave" | "w" => {
            let report = rt.block_on(session.resolve_wave())?;
            if let Some(assault) = &session.state().vault.active_assault {
                if let Some(narrative) = assault.wave_logs.last() {
                    println!("{}", narrative);
                }
            }
            println!(
                "  Wave {}: chance {:.0}%, roll {:.2} -> {:?}",
                report.wave,
                report.success_chance * 100.0,
                report.roll,
                report.outcome
            );
        }
        "dismiss" => {
            session.dismiss_assault()?;
            println!("Assault closed.");
        }
        "log" => {
            let count = match args.first() {
                Some(n) => n.parse::<usize>()?,
                None => 10,
            };
            for entry in session.state().vault.event_log.recent(count) {
                println!("  {}", entry);
            }
        }
        "help" | "h" => print_help(),
        _ => println!("Unknown command. Type 'help' for the list."),
    }
    Ok(())
}

fn parse_ids<T: std::str::FromStr>(words: &[&str]) -> std::result::Result<Vec<T>, T::Err> {
    words.iter().map(|w| w.parse::<T>()).collect()
}

/// One-line summary shown before every prompt
fn display_status<N: Narrator>(session: &Session<N>) {
    let vault = &session.state().vault;
    let res = &vault.resources;
    println!();
    println!(
        "--- Day {} ({}) | Tick {} | PWR {:.0} H2O {:.0} FOOD {:.0} CAPS {:.0} ---",
        vault.day(),
        vault.season(),
        vault.tick(),
        res.power,
        res.water,
        res.food,
        res.caps
    );
    if let Some(assault) = &vault.active_assault {
        println!(
            "  Assault on {}: wave {} ({:?})",
            assault.territory_name, assault.current_wave, assault.status
        );
    }
}

fn display_detailed_status<N: Narrator>(session: &Session<N>) {
    let state = session.state();
    let vault = &state.vault;

    println!();
    println!("=== Vault Status (Day {}, Tick {}) ===", vault.day(), vault.tick());
    println!("Faction: {} | Reputation: {}", state.player_faction, state.reputation);
    println!();

    println!("Resources:");
    for (kind, amount) in vault.resources.iter() {
        println!("  {:<6} {:>8.1}", kind, amount);
    }
    println!();

    println!("Agents:");
    for agent in &vault.agents {
        println!(
            "  {} {} (lvl {}, xp {}) HP {:.0}/{:.0} EN {:.0} Karma {} - {}",
            agent.id,
            agent.name,
            agent.level,
            agent.xp,
            agent.hp,
            agent.max_hp,
            agent.energy,
            agent.karma,
            agent.assignment
        );
    }
    println!();

    println!("Rooms:");
    for room in &vault.rooms {
        println!(
            "  {} {:?} integrity {:.1}% staff {:?}",
            room.id, room.room_type, room.integrity, room.staff
        );
    }
    println!();

    println!("Hydroponics:");
    for slot in &vault.hydroponics {
        println!("  {} {} {:.0}%", slot.id, slot.crop, slot.growth);
    }
    println!();

    println!("Missions:");
    for mission in &vault.available_missions {
        println!(
            "  {} {} (difficulty {}, {} ticks)",
            mission.id, mission.name, mission.difficulty, mission.duration
        );
    }
    for active in &vault.active_missions {
        println!("  > {} returns in {} ticks", active.name, active.remaining_ticks);
    }
    println!();

    println!("Challenges:");
    for challenge in &vault.challenges {
        let mark = if challenge.completed { "x" } else { " " };
        println!(
            "  [{}] {} - {} ({:.0}/{:.0})",
            mark, challenge.title, challenge.requirement, challenge.progress, challenge.goal
        );
    }
}

fn display_map<N: Narrator>(session: &Session<N>) {
    println!();
    println!("=== Territories ===");
    for territory in &session.state().territories {
        let intel = if session.briefing(territory.id).is_some() {
            " [briefed]"
        } else {
            ""
        };
        println!(
            "  {} {:<24} {:<8} hostility {:.1} stability {:.1}{}",
            territory.id, territory.name, territory.owner, territory.hostility, territory.stability, intel
        );
    }
}
