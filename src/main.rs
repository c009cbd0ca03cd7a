use drx_miner::boost::{get_boost_cost, get_current_boost_value, get_next_boost_value, BoostType};
use drx_miner::build_info;
use drx_miner::core::format::{format_number, format_number_precise, format_time};
use drx_miner::core::{calculate_level, calculate_rank, GameConfig};
use drx_miner::mining::MiningState;
use drx_miner::session::{
    Collaborators, GameSession, LogFeedback, Outcome, Referral, SessionInit, SystemClock,
};
use drx_miner::store::SaveStore;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

enum Command {
    Status,
    Boosts,
    Start,
    Claim,
    Upgrade(BoostType),
    Bonus,
}

struct Args {
    user_id: String,
    auth_key: String,
    first_name: Option<String>,
    referral: Option<Referral>,
    config_path: Option<String>,
    json: bool,
    command: Command,
}

fn print_help() {
    println!("DRX Miner - idle mining from the terminal\n");
    println!("Usage: drx-miner [options] <command>\n");
    println!("Commands:");
    println!("  status            Show balance, level, rank and mining state");
    println!("  boosts            Show boost levels, effects and costs");
    println!("  start             Start mining");
    println!("  claim             Claim mining rewards");
    println!("  upgrade <boost>   Buy one level of speed, claim or rate");
    println!("  bonus             Claim the welcome bonus");
    println!("\nOptions:");
    println!("  --user <id>       Player id (default: local)");
    println!("  --key <key>       Auth key (default: local)");
    println!("  --name <name>     First name for a new player");
    println!("  --ref <id:key>    Referrer for a new player");
    println!("  --config <path>   TOML game config");
    println!("  --json            Print status as JSON");
    println!("  --version         Show version information");
    println!("  --help            Show this help message");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut user_id = "local".to_string();
    let mut auth_key = "local".to_string();
    let mut first_name = None;
    let mut referral = None;
    let mut config_path = None;
    let mut json = false;
    let mut command = None;

    let mut i = 1;
    while i < args.len() {
        let value = |i: usize| {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| format!("{} requires a value", args[i]))
        };
        match args[i].as_str() {
            "--user" => {
                user_id = value(i)?;
                i += 1;
            }
            "--key" => {
                auth_key = value(i)?;
                i += 1;
            }
            "--name" => {
                first_name = Some(value(i)?);
                i += 1;
            }
            "--ref" => {
                let raw = value(i)?;
                let (referrer_id, referrer_key) = raw
                    .split_once(':')
                    .ok_or_else(|| format!("--ref expects <id>:<key>, got {}", raw))?;
                referral = Some(Referral {
                    referrer_id: referrer_id.to_string(),
                    referrer_key: referrer_key.to_string(),
                });
                i += 1;
            }
            "--config" => {
                config_path = Some(value(i)?);
                i += 1;
            }
            "--json" => json = true,
            "status" => command = Some(Command::Status),
            "boosts" => command = Some(Command::Boosts),
            "start" => command = Some(Command::Start),
            "claim" => command = Some(Command::Claim),
            "bonus" => command = Some(Command::Bonus),
            "upgrade" => {
                let boost = value(i)?.parse::<BoostType>().map_err(|e| e.to_string())?;
                command = Some(Command::Upgrade(boost));
                i += 1;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Args {
        user_id,
        auth_key,
        first_name,
        referral,
        config_path,
        json,
        command: command.unwrap_or(Command::Status),
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_status(session: &GameSession, json: bool) -> Result<(), String> {
    let user = session.user();
    if json {
        let text = serde_json::to_string_pretty(&user).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    let config = session.config();
    let level = calculate_level(user.xp, config);
    let rank = calculate_rank(user.total_earned);

    println!("Player:   {} ({})", user.first_name, user.id);
    println!("Balance:  {} DRX", format_number(user.balance));
    println!(
        "Level:    {} ({} / {} XP)",
        level.level,
        format_number(level.current_xp as f64),
        format_number(level.xp_for_next as f64)
    );
    println!("Rank:     {} {}", rank.icon, rank.rank.name());
    println!("Rate:     {} DRX/s", format_number_precise(user.mining_rate));
    match session.mining_state() {
        MiningState::Idle => println!("Mining:   idle"),
        MiningState::Mining { remaining_seconds } => println!(
            "Mining:   {} DRX so far, claimable in {}",
            format_number(session.pending_estimate()),
            format_time(remaining_seconds)
        ),
        MiningState::ClaimReady => println!(
            "Mining:   {} DRX ready to claim",
            format_number(session.pending_estimate())
        ),
    }
    if !user.bonus_claimed {
        println!("Bonus:    welcome bonus available");
    }
    Ok(())
}

fn print_boosts(session: &GameSession) {
    let user = session.user();
    let config = session.config();
    for boost in BoostType::ALL {
        let level = user.boosts.level(boost);
        println!(
            "{:<13} Lv.{:<3} {:>10} -> {:<10} cost {} DRX",
            boost.name(),
            level,
            get_current_boost_value(boost, &user, config),
            get_next_boost_value(boost, level, &user, config),
            format_number(get_boost_cost(boost, level, config))
        );
    }
}

fn report(outcome: Outcome) -> ExitCode {
    println!("{}", outcome.message);
    if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(args: Args) -> Result<ExitCode, String> {
    let config = match &args.config_path {
        Some(path) => GameConfig::load(path).map_err(|e| format!("config {}: {}", path, e))?,
        None => GameConfig::default(),
    };

    let store = Arc::new(SaveStore::new().map_err(|e| e.to_string())?);
    let deps = Collaborators {
        store: store.clone(),
        auth: store,
        feedback: Arc::new(LogFeedback),
        clock: Arc::new(SystemClock),
    };
    let init = SessionInit {
        first_name: args.first_name,
        referral: args.referral,
        ..SessionInit::new(args.user_id, args.auth_key)
    };

    let session = GameSession::open(init, config, deps).map_err(|e| e.to_string())?;
    let offline = session.offline_report();
    if offline.credited_seconds > 0 {
        println!(
            "Welcome back! {} DRX mined while you were away{}.",
            format_number(offline.pending_rewards),
            if offline.capped { " (capped)" } else { "" }
        );
    }

    let code = match args.command {
        Command::Status => {
            print_status(&session, args.json)?;
            ExitCode::SUCCESS
        }
        Command::Boosts => {
            print_boosts(&session);
            ExitCode::SUCCESS
        }
        Command::Start => report(session.start_mining()),
        Command::Claim => report(session.claim_mining_rewards()),
        Command::Upgrade(boost) => report(session.upgrade_boost(boost)),
        Command::Bonus => report(session.claim_welcome_bonus()),
    };
    session.flush();
    Ok(code)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if let Some(first) = args.get(1) {
        match first.as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_string());
                return ExitCode::SUCCESS;
            }
            "--help" | "-h" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
    }

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run 'drx-miner --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    init_logging();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
