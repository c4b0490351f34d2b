mod auth_cmds;
mod config;
mod exam_cmd;
mod parse_cmd;
mod present;
mod timetable_cmd;

#[cfg(test)]
mod test_util;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use studyplan_store::CredentialStore;

use config::StudyplanConfig;

#[derive(Parser)]
#[command(name = "studyplan", about = "Study timetable and exam preparation planner")]
struct Cli {
    /// Credential file (overrides STUDYPLAN_USERS_FILE env var)
    #[arg(long, global = true)]
    users_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a studyplan config file
    Init {
        /// Generator program that reads a prompt on stdin and prints the answer
        #[arg(long)]
        generator_cmd: Option<String>,
        /// Argument passed to the generator program (repeatable)
        #[arg(long = "generator-arg", allow_hyphen_values = true)]
        generator_args: Vec<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Register a new user
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Check a username and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Generate a study timetable for a set of tasks
    Timetable {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Timetable input TOML file (tasks and preferences)
        #[arg(long)]
        input: String,
        /// Generator command line (overrides STUDYPLAN_GENERATOR_CMD env var)
        #[arg(long)]
        generator_cmd: Option<String>,
        /// Generate even if the tasks need more hours than are available
        #[arg(long)]
        force: bool,
    },
    /// Allocate reading pages ahead of each exam
    Exam {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Exam input TOML file
        #[arg(long)]
        input: String,
        /// Plan as if today were this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
    /// Print the timetable generation request without sending it
    Prompt {
        /// Timetable input TOML file
        #[arg(long)]
        input: String,
    },
    /// Parse a saved generator answer and show it as a table
    Parse {
        /// Response file (reads stdin when omitted)
        #[arg(long)]
        file: Option<String>,
    },
}

/// Execute the `studyplan init` command: write config file.
///
/// The global `--users-file` flag, when given, is recorded as the store path.
fn cmd_init(
    users_file: Option<String>,
    generator_cmd: Option<String>,
    generator_args: Vec<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let users_file = users_file
        .unwrap_or_else(|| config::default_users_file().to_string_lossy().into_owned());
    let cfg = config::ConfigFile {
        store: config::StoreSection {
            users_file: Some(users_file.clone()),
        },
        generator: generator_cmd.map(|command| config::GeneratorSection {
            command,
            args: generator_args,
        }),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  store.users_file = {users_file}");
    match &cfg.generator {
        Some(g) => println!("  generator.command = {} {}", g.command, g.args.join(" ")),
        None => println!("  generator: not set (timetable generation needs one)"),
    }

    Ok(())
}

fn parse_today(today: Option<&str>) -> anyhow::Result<NaiveDate> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --today date {s:?} (expected YYYY-MM-DD)")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            generator_cmd,
            generator_args,
            force,
        } => {
            cmd_init(cli.users_file, generator_cmd, generator_args, force)?;
        }
        Commands::Signup { username, password } => {
            let resolved = StudyplanConfig::resolve(cli.users_file.as_deref(), None)?;
            let store = CredentialStore::open(&resolved.store_config);
            auth_cmds::run_signup(&store, &username, &password)?;
        }
        Commands::Login { username, password } => {
            let resolved = StudyplanConfig::resolve(cli.users_file.as_deref(), None)?;
            let store = CredentialStore::open(&resolved.store_config);
            auth_cmds::run_login(&store, &username, &password)?;
        }
        Commands::Timetable {
            username,
            password,
            input,
            generator_cmd,
            force,
        } => {
            let resolved =
                StudyplanConfig::resolve(cli.users_file.as_deref(), generator_cmd.as_deref())?;
            let store = CredentialStore::open(&resolved.store_config);
            let generator = resolved.require_generator()?;
            let opts = timetable_cmd::TimetableOptions {
                username: &username,
                password: &password,
                input: &input,
                force,
            };
            timetable_cmd::run_timetable(&store, generator, &opts).await?;
        }
        Commands::Exam {
            username,
            password,
            input,
            today,
        } => {
            let resolved = StudyplanConfig::resolve(cli.users_file.as_deref(), None)?;
            let store = CredentialStore::open(&resolved.store_config);
            let opts = exam_cmd::ExamOptions {
                username: &username,
                password: &password,
                input: &input,
                today: parse_today(today.as_deref())?,
            };
            exam_cmd::run_exam(&store, &opts)?;
        }
        Commands::Prompt { input } => {
            parse_cmd::run_prompt(&input)?;
        }
        Commands::Parse { file } => {
            parse_cmd::run_parse(file.as_deref())?;
        }
    }

    Ok(())
}
