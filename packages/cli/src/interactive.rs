//! Interactive menu for the mailmetrics toolchain.
//!
//! Offers the same actions as the subcommands, with prompted parameters,
//! for users who do not want to memorize CLI flags.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use indicatif::MultiProgress;
use mailmetrics_store::DEFAULT_STORE_DIR;

/// Top-level actions available in the interactive menu.
enum Action {
    Extract,
    Serve,
    Campaigns,
}

impl Action {
    const ALL: &[Self] = &[Self::Extract, Self::Serve, Self::Campaigns];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Extract => "Extract metrics from PDF reports",
            Self::Serve => "Start the dashboard server",
            Self::Campaigns => "List stored campaigns",
        }
    }
}

/// Runs the interactive menu, prompting the user to select and configure
/// an action.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected action fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Mailmetrics Toolchain");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Extract => {
            let reports = prompt_dir("Reports directory", ".")?;
            let store = prompt_dir("Store directory", DEFAULT_STORE_DIR)?;
            crate::run_extract(multi, &reports, &store)
        }
        Action::Serve => {
            let store = prompt_dir("Store directory", DEFAULT_STORE_DIR)?;
            let bind: String = Input::new()
                .with_prompt("Bind address")
                .default("127.0.0.1".to_owned())
                .interact_text()?;
            let port: u16 = Input::new()
                .with_prompt("Port")
                .default(8080)
                .interact_text()?;
            crate::run_serve(&store, Some(bind), Some(port))
        }
        Action::Campaigns => {
            let store = prompt_dir("Store directory", DEFAULT_STORE_DIR)?;
            crate::list_campaigns(&store)
        }
    }
}

/// Prompts for a directory path with a default.
fn prompt_dir(prompt: &str, default: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_owned())
        .interact_text()?;
    Ok(PathBuf::from(dir))
}
