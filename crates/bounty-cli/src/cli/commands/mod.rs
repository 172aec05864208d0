use super::args::*;

pub mod contest;
pub mod context;
pub mod init;
pub mod submissions;
pub mod submit;

use crate::exit_codes;
use bounty_core::errors::ConfigError;
use bounty_core::ContestError;
use context::Context;
use serde::Serialize;
use serde_json::json;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match run(cli).await {
        Ok(code) => Ok(code),
        Err(e) => report(e),
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Init(args) => return init::run(&cli.config, args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return Ok(exit_codes::OK);
        }
        _ => {}
    }

    let ctx = Context::load(&cli)?;
    match cli.cmd {
        Command::Create(args) => contest::create(&ctx, args),
        Command::Submit(args) => submit::run(&ctx, args).await,
        Command::Close(args) => contest::close(&ctx, args),
        Command::Show(args) => contest::show(&ctx, args),
        Command::List => contest::list(&ctx),
        Command::Submissions(args) => submissions::list(&ctx, args),
        Command::Winners(args) => submissions::winners(&ctx, args),
        Command::UserSubmission(args) => submissions::user(&ctx, args),
        Command::Init(_) | Command::Version => Ok(exit_codes::OK),
    }
}

/// Contest and config errors are expected outcomes: report them on stderr
/// as JSON and map them to their exit codes. Anything else is fatal.
fn report(err: anyhow::Error) -> anyhow::Result<i32> {
    if let Some(e) = err.downcast_ref::<ContestError>() {
        tracing::debug!(kind = e.kind(), "command refused");
        eprintln!(
            "{}",
            json!({
                "error": e.kind(),
                "message": e.to_string(),
                "retryable": e.is_retryable(),
            })
        );
        return Ok(e.exit_code());
    }
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        eprintln!("{}", json!({ "error": "config", "message": e.to_string() }));
        return Ok(exit_codes::CONFIG_ERROR);
    }
    Err(err)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
