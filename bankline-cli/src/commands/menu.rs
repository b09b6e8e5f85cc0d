//! Menu command - run the interactive banking session

use std::io;

use anyhow::{Context, Result};
use bankline_core::config::Config;
use bankline_core::BanklineContext;

use super::get_logger;
use crate::prompt::{LinePrompt, TerminalPrompt};
use crate::session::Session;

/// Load the bank, then hand the terminal to a session
///
/// A malformed or locked data file fails here, before anything is logged.
pub fn run(config: Config) -> Result<()> {
    let ctx = BanklineContext::new(config).context("Failed to load bank data")?;
    let logger = get_logger(&ctx.config);

    if atty::is(atty::Stream::Stdin) {
        Session::new(ctx, TerminalPrompt, io::stdout(), logger).run()
    } else {
        let prompt = LinePrompt::new(io::stdin().lock(), io::stdout());
        Session::new(ctx, prompt, io::stdout(), logger).run()
    }
}
