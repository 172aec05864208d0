use super::context::{call_context, Context};
use super::print_json;
use crate::cli::args::SubmitArgs;
use crate::exit_codes;

pub async fn run(ctx: &Context, args: SubmitArgs) -> anyhow::Result<i32> {
    let call = call_context(&args.caller);
    let service = ctx.judging_service()?;
    let outcome = service
        .submit_content(&call, args.contest_id, &args.url)
        .await?;
    print_json(&outcome)?;
    Ok(exit_codes::OK)
}
