use clap::{Parser, Subcommand};
use sigil_cli::state::CliState;
use sigil_cli::{clock, commands, readline};
use sigil_core::EntityId;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();

    let state = Arc::new(RwLock::new(CliState::new()));

    commands::adopt_definitions(Arc::clone(&state)).await;

    // Start the background clock that fires effect expiries
    let handle = clock::start_clock(Arc::clone(&state)).await;
    state.write().await.clock_task = Some(handle);

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If SIGIL_LOG_PATH is set, append to that file instead of the console
    if let Ok(path) = std::env::var("SIGIL_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(version, about = "sigil effect console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an entity to the world
    Spawn {
        id: EntityId,
        #[arg(short, long)]
        class: Option<String>,
    },
    /// Remove an entity without running any leave policy
    Despawn {
        id: EntityId,
    },
    /// Request an effect, e.g. `apply 7 burn -d 30`
    #[command(allow_negative_numbers = true)]
    Apply {
        id: EntityId,
        effect: String,
        /// Seconds until the effect expires on its own
        #[arg(short, long)]
        duration: Option<f32>,
        /// Signed amount, additive effects only
        #[arg(short, long)]
        amount: Option<f64>,
    },
    /// Offset one attribute, e.g. `shift 7 gravity -0.5 -d 60`
    #[command(allow_negative_numbers = true)]
    Shift {
        id: EntityId,
        attribute: String,
        amount: f64,
        #[arg(short, long)]
        duration: Option<f32>,
    },
    /// Retire one handle early
    Cancel {
        handle: u64,
    },
    /// Retire every outstanding handle on an entity
    CancelAll {
        id: EntityId,
    },
    /// Show one entity, or the whole roster
    Show {
        id: Option<EntityId>,
    },
    /// Forbid an action on an entity
    Restrict {
        id: EntityId,
        action: String,
    },
    /// Lift a restriction again
    Unrestrict {
        id: EntityId,
        action: String,
    },
    /// Feed a host event through the dispatcher
    Event {
        #[command(subcommand)]
        event: EventCommand,
    },
    /// Show the world clock and scheduler state
    Time,
    Quit,
}

#[derive(Subcommand)]
enum EventCommand {
    Spawn {
        player: EntityId,
    },
    Jump {
        player: EntityId,
    },
    Disconnect {
        player: EntityId,
    },
    Hurt {
        victim: EntityId,
        damage: i64,
        #[arg(short, long)]
        attacker: Option<EntityId>,
    },
    Death {
        victim: EntityId,
        #[arg(short, long)]
        attacker: Option<EntityId>,
    },
    Blind {
        victim: EntityId,
        duration: f32,
        #[arg(short, long)]
        attacker: Option<EntityId>,
    },
    Shutdown,
}

async fn respond(line: &str, state: Arc<RwLock<CliState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "sigil".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Spawn { id, class }) => commands::spawn(id, &class, state).await,
        Some(Commands::Despawn { id }) => commands::despawn(id, state).await,
        Some(Commands::Apply {
            id,
            effect,
            duration,
            amount,
        }) => commands::apply(id, &effect, duration, amount, state).await,
        Some(Commands::Shift {
            id,
            attribute,
            amount,
            duration,
        }) => commands::shift(id, &attribute, amount, duration, state).await,
        Some(Commands::Cancel { handle }) => commands::cancel(handle, state).await,
        Some(Commands::CancelAll { id }) => commands::cancel_all(id, state).await,
        Some(Commands::Show { id }) => commands::show(id, state).await,
        Some(Commands::Restrict { id, action }) => commands::restrict(id, &action, state).await,
        Some(Commands::Unrestrict { id, action }) => commands::unrestrict(id, &action, state).await,
        Some(Commands::Event { event }) => match event {
            EventCommand::Spawn { player } => commands::event_spawn(player, state).await,
            EventCommand::Jump { player } => commands::event_jump(player, state).await,
            EventCommand::Disconnect { player } => commands::event_disconnect(player, state).await,
            EventCommand::Hurt {
                victim,
                damage,
                attacker,
            } => commands::event_hurt(victim, damage, attacker, state).await,
            EventCommand::Death { victim, attacker } => {
                commands::event_death(victim, attacker, state).await
            }
            EventCommand::Blind {
                victim,
                duration,
                attacker,
            } => commands::event_blind(victim, duration, attacker, state).await,
            EventCommand::Shutdown => commands::event_shutdown(state).await,
        },
        Some(Commands::Time) => commands::show_time(state).await,
        Some(Commands::Quit) => {
            commands::quit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
