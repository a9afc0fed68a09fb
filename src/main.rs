use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use pcos_risk::auth::{read_password, Accounts, AuthError};
use pcos_risk::config::{validate_config, ColorMode, Config};
use pcos_risk::profile::{load_profile, validate_profile, DemoPreset, IntakeWizard, Profile, ProfileInput};
use pcos_risk::scoring::{compute_risk, ConfidenceSource, EntropyConfidence, SeededConfidence};
use pcos_risk::store::{FileStore, ReportStore, Trend};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_VALIDATION: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a profile (interactive intake unless --demo or --profile is given)
    Assess {
        /// Use a demo preset: normal, borderline, likely-pcos
        #[arg(long, conflicts_with = "profile")]
        demo: Option<String>,

        /// Read the profile from a YAML or JSON file
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Save the result to the report history (requires login)
        #[arg(long)]
        save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Seed for a reproducible confidence figure
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score the three demo presets
    Demo,
    /// List saved reports, newest first
    History {
        #[arg(long)]
        json: bool,
    },
    /// Show one saved report by id or id prefix
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete one saved report by id or id prefix
    Delete { id: String },
    /// Delete all saved reports
    Clear,
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
}

#[derive(Parser, Debug)]
#[command(name = "pcos-risk")]
#[command(about = "PCOS risk assessment from symptoms and hormone values", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pcos-risk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for reports and accounts (overrides the config file)
    #[arg(long, global = true, env = "PCOS_RISK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// When to color output (overrides the config file)
    #[arg(long, global = true, value_enum)]
    color: Option<ColorMode>,

    #[command(subcommand)]
    command: Commands,
}

/// A failed command: message for stderr and the process exit code.
struct Failure {
    code: i32,
    message: String,
}

impl Failure {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn config(e: anyhow::Error) -> Self {
        Self::new(EXIT_CONFIG, format!("{:#}", e))
    }
}

impl From<AuthError> for Failure {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Storage(inner) => Failure::config(inner),
            AuthError::NotSignedIn => Failure::new(
                EXIT_AUTH,
                "Not signed in. Run `pcos-risk login --email <EMAIL>` first.",
            ),
            other => Failure::new(EXIT_AUTH, other.to_string()),
        }
    }
}

type CommandResult = Result<(), Failure>;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "pcos_risk=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match pcos_risk::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }
    if let Some(color) = cli.color {
        config.color = color;
    }

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let store = match config.data_dir() {
        Ok(dir) => FileStore::in_dir(&dir),
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(path = %store.path().display(), "using data store");

    let use_colors = pcos_risk::output::should_use_colors(config.color);
    let app = App {
        config,
        store,
        use_colors,
    };

    match app.dispatch(cli.command) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(failure) => {
            eprintln!("{}", failure.message);
            std::process::exit(failure.code);
        }
    }
}

struct App {
    config: Config,
    store: FileStore,
    use_colors: bool,
}

impl App {
    fn dispatch(&self, command: Commands) -> CommandResult {
        match command {
            Commands::Assess {
                demo,
                profile,
                save,
                json,
                seed,
            } => self.assess(demo, profile, save, json, seed),
            Commands::Demo => self.demo(),
            Commands::History { json } => self.history(json),
            Commands::Show { id, json } => self.show(&id, json),
            Commands::Delete { id } => self.delete(&id),
            Commands::Clear => self.clear(),
            Commands::Register { email, name } => self.register(&email, &name),
            Commands::Login { email } => self.login(&email),
            Commands::Logout => self.logout(),
            Commands::Whoami => self.whoami(),
        }
    }

    fn reports(&self) -> ReportStore<&FileStore> {
        ReportStore::new(&self.store)
    }

    fn accounts(&self) -> Accounts<&FileStore> {
        Accounts::new(&self.store)
    }

    fn assess(
        &self,
        demo: Option<String>,
        profile_path: Option<PathBuf>,
        save: bool,
        json: bool,
        seed: Option<u64>,
    ) -> CommandResult {
        // Check the session before asking for any input
        let user = if save {
            Some(self.accounts().require_user()?)
        } else {
            None
        };

        let profile = match (demo, profile_path) {
            (Some(name), _) => DemoPreset::parse(&name)
                .map_err(|e| Failure::new(EXIT_VALIDATION, e.to_string()))?
                .profile(),
            (None, Some(path)) => {
                load_profile(&path).map_err(|e| Failure::new(EXIT_VALIDATION, format!("{:#}", e)))?
            }
            (None, None) => run_intake()?,
        };

        if let Err(errors) = validate_profile(profile.input()) {
            let lines: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
            return Err(Failure::new(
                EXIT_VALIDATION,
                format!("Profile errors:\n{}", lines.join("\n")),
            ));
        }

        let mut confidence: Box<dyn ConfidenceSource> = match seed {
            Some(seed) => Box::new(SeededConfidence::new(seed)),
            None => Box::new(EntropyConfidence::new()),
        };
        let result = compute_risk(&profile, confidence.as_mut());

        if json {
            print_json(&result)?;
        } else {
            println!("{}", pcos_risk::output::format_result(&result, self.use_colors));
        }

        if let Some(user) = user {
            let report = self
                .reports()
                .append(profile, result)
                .map_err(Failure::config)?;
            info!(user = %user.email, id = %report.id, "assessment saved");
            if !json {
                println!();
                println!("Saved report {}", report.short_id());
            }
        }
        Ok(())
    }

    fn demo(&self) -> CommandResult {
        let mut confidence = EntropyConfidence::new();
        for preset in DemoPreset::ALL {
            let result = compute_risk(&preset.profile(), &mut confidence);
            println!(
                "{}",
                pcos_risk::output::format_summary_line(preset.title(), &result, self.use_colors)
            );
        }
        Ok(())
    }

    fn history(&self, json: bool) -> CommandResult {
        let mut reports = self.reports().list().map_err(Failure::config)?;
        let trend = Trend::from_reports(&reports);
        reports.truncate(self.config.history_limit());

        if json {
            return print_json(&serde_json::json!({
                "reports": reports,
                "trend": trend,
            }));
        }

        println!("{}", pcos_risk::output::format_history(&reports, self.use_colors));
        if !reports.is_empty() {
            println!();
            println!("{}", pcos_risk::output::format_trend(trend, self.use_colors));
        }
        Ok(())
    }

    fn show(&self, id: &str, json: bool) -> CommandResult {
        let report = self.find_report(id)?;
        if json {
            return print_json(&report);
        }
        println!("Report {}  {}", report.id, report.date.format("%Y-%m-%d %H:%M UTC"));
        println!();
        println!("{}", pcos_risk::output::format_result(&report.result, self.use_colors));
        Ok(())
    }

    fn delete(&self, id: &str) -> CommandResult {
        let report = self.find_report(id)?;
        let removed = self.reports().delete(&report.id).map_err(Failure::config)?;
        if removed {
            println!("Deleted report {}", report.short_id());
        }
        Ok(())
    }

    fn clear(&self) -> CommandResult {
        self.reports().clear().map_err(Failure::config)?;
        println!("Cleared all saved reports.");
        Ok(())
    }

    fn find_report(&self, id: &str) -> Result<pcos_risk::StoredReport, Failure> {
        match self.reports().get(id).map_err(Failure::config)? {
            Some(report) => Ok(report),
            None => Err(Failure::new(
                EXIT_VALIDATION,
                format!("No report matches '{}'. Run `pcos-risk history` to list ids.", id),
            )),
        }
    }

    fn register(&self, email: &str, name: &str) -> CommandResult {
        let password = read_password("Password: ").map_err(|e| Failure::new(EXIT_AUTH, format!("{:#}", e)))?;
        // A password from the environment confirms itself
        let confirm = match pcos_risk::auth::prompt::get_password_from_env() {
            Some(p) => p,
            None => read_password("Confirm password: ")
                .map_err(|e| Failure::new(EXIT_AUTH, format!("{:#}", e)))?,
        };
        let user = self.accounts().register(email, &password, &confirm, name)?;
        println!("Registered and signed in as {} <{}>", user.name, user.email);
        Ok(())
    }

    fn login(&self, email: &str) -> CommandResult {
        let password = read_password("Password: ").map_err(|e| Failure::new(EXIT_AUTH, format!("{:#}", e)))?;
        let user = self.accounts().login(email, &password)?;
        println!("Signed in as {} <{}>", user.name, user.email);
        Ok(())
    }

    fn logout(&self) -> CommandResult {
        self.accounts().logout().map_err(Failure::config)?;
        println!("Signed out.");
        Ok(())
    }

    fn whoami(&self) -> CommandResult {
        let user = self.accounts().require_user()?;
        println!("{} <{}>", user.name, user.email);
        Ok(())
    }
}

/// Walk the three-step intake on stdin/stdout.
fn run_intake() -> Result<Profile, Failure> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut wizard = IntakeWizard::new(stdin.lock(), stdout.lock());
    let profile = wizard
        .run(ProfileInput::default())
        .map_err(|e| Failure::new(EXIT_VALIDATION, format!("{:#}", e)))?;
    drop(wizard);
    println!();
    Ok(profile)
}

fn print_json<T: serde::Serialize>(value: &T) -> CommandResult {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Failure::new(EXIT_CONFIG, format!("Failed to serialize output: {}", e)))?;
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", json) {
        warn!(error = %e, "failed to write output");
    }
    Ok(())
}
