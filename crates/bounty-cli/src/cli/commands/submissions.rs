//! Read-only submission queries.

use super::context::Context;
use super::print_json;
use crate::cli::args::{ContestArgs, UserSubmissionArgs};
use crate::exit_codes;
use bounty_core::Address;

pub fn list(ctx: &Context, args: ContestArgs) -> anyhow::Result<i32> {
    print_json(&ctx.service()?.get_submissions(args.contest_id)?)?;
    Ok(exit_codes::OK)
}

pub fn winners(ctx: &Context, args: ContestArgs) -> anyhow::Result<i32> {
    print_json(&ctx.service()?.get_winners(args.contest_id)?)?;
    Ok(exit_codes::OK)
}

pub fn user(ctx: &Context, args: UserSubmissionArgs) -> anyhow::Result<i32> {
    let address = Address::new(&args.address);
    let service = ctx.service()?;
    print_json(&service.get_user_submission(args.contest_id, &address)?)?;
    Ok(exit_codes::OK)
}
