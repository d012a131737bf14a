//! `runbot envs` — list the configured environments.

use anyhow::Result;

use crate::app::AppContext;
use crate::output::table;

/// Run `runbot envs`.
///
/// # Errors
///
/// Infallible in practice; kept fallible for dispatch uniformity.
pub fn run(app: &AppContext) -> Result<()> {
    let rows: Vec<Vec<String>> = app
        .config
        .environments
        .iter()
        .map(|env| vec![env.clone()])
        .collect();
    print!("{}", table::render(&["Name"], &rows));
    Ok(())
}
