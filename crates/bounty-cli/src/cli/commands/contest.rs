//! Contest registry commands: create, close, show, list.

use super::context::{call_context, Context};
use super::print_json;
use crate::cli::args::{CloseArgs, ContestArgs, CreateArgs};
use crate::exit_codes;
use bounty_core::model::NewContest;
use serde_json::json;

pub fn create(ctx: &Context, args: CreateArgs) -> anyhow::Result<i32> {
    let call = call_context(&args.caller);
    let contest_id = ctx.service()?.create_contest(
        &call,
        NewContest {
            platform_pattern: args.platform,
            required_topic: args.topic,
            reward_description: args.reward,
            max_winners: args.max_winners,
            deadline: args.deadline,
        },
    )?;
    print_json(&json!({ "contest_id": contest_id }))?;
    Ok(exit_codes::OK)
}

pub fn close(ctx: &Context, args: CloseArgs) -> anyhow::Result<i32> {
    let call = call_context(&args.caller);
    let service = ctx.service()?;
    service.close_contest(&call, args.contest_id)?;
    print_json(&service.get_contest(args.contest_id)?)?;
    Ok(exit_codes::OK)
}

pub fn show(ctx: &Context, args: ContestArgs) -> anyhow::Result<i32> {
    print_json(&ctx.service()?.get_contest(args.contest_id)?)?;
    Ok(exit_codes::OK)
}

pub fn list(ctx: &Context) -> anyhow::Result<i32> {
    print_json(&ctx.service()?.get_all_contests()?)?;
    Ok(exit_codes::OK)
}
