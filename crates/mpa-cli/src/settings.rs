use std::io::{BufRead as _, Write as _};

use clap::{Subcommand, ValueEnum};
use mpa_core::{AppConfig, Confirm, FileStore, SettingsStore};

#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Print the current automation settings
    Show,
    /// Change one or more automation settings
    Set {
        /// Delay between automation steps, in milliseconds
        #[arg(long)]
        speed: Option<u64>,
        #[arg(long)]
        headless: Option<bool>,
        #[arg(long)]
        max_attempts: Option<u32>,
        #[arg(long)]
        capture_screenshots: Option<bool>,
    },
    /// Allow or forbid real (non dry-run) purchases
    RealPurchases {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// Asks on the terminal; only an explicit "yes" confirms.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} Type \"yes\" to continue: ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer.trim().eq_ignore_ascii_case("yes"),
            Err(_) => false,
        }
    }
}

fn print_settings(store: &SettingsStore<FileStore>) -> anyhow::Result<()> {
    let settings = store.load();
    println!("{}", serde_json::to_string_pretty(&settings)?);
    println!(
        "automation timeout: {}s",
        settings.automation_timeout().as_secs()
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if the settings file cannot be written.
pub(crate) fn run_settings(config: &AppConfig, command: SettingsCommands) -> anyhow::Result<()> {
    let store = SettingsStore::new(FileStore::new(&config.state_path));

    match command {
        SettingsCommands::Show => print_settings(&store),
        SettingsCommands::Set {
            speed,
            headless,
            max_attempts,
            capture_screenshots,
        } => {
            let mut settings = store.load();
            if let Some(speed) = speed {
                settings.speed = speed;
            }
            if let Some(headless) = headless {
                settings.headless = headless;
            }
            if let Some(max_attempts) = max_attempts {
                settings.max_attempts = max_attempts;
            }
            if let Some(capture) = capture_screenshots {
                settings.capture_screenshots = capture;
            }
            store.save(&settings)?;
            tracing::info!(path = %config.state_path.display(), "automation settings saved");
            print_settings(&store)
        }
        SettingsCommands::RealPurchases { state } => {
            let enabled = store.set_real_purchases(state == Toggle::On, &StdinConfirm)?;
            if enabled {
                println!("Real purchases are ENABLED. Orders will be placed with your billing profile.");
            } else {
                println!("Real purchases are disabled; purchases run as dry runs.");
            }
            Ok(())
        }
    }
}
