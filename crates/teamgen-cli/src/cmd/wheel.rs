use super::{confirm_step, Context, TeamArgs};
use crate::output::{print_board, print_json};
use anyhow::Context as _;
use std::io::Write;
use teamgen_core::display::Board;
use teamgen_core::elimination::EliminationAllocator;
use teamgen_core::roster::Roster;
use teamgen_core::spin::{SpinDriver, SpinEvent};
use teamgen_core::types::Assignment;

pub fn run(ctx: &Context, args: TeamArgs, step: bool) -> anyhow::Result<()> {
    let roster = args.roster();
    let team_count = args.team_count(&ctx.config);
    let allocator = EliminationAllocator::with_rng(ctx.config.wheel.clone(), ctx.rng());

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    rt.block_on(run_async(ctx, roster, team_count, allocator, step))
}

async fn run_async(
    ctx: &Context,
    roster: Roster,
    team_count: i64,
    allocator: EliminationAllocator,
    step: bool,
) -> anyhow::Result<()> {
    let mut driver = SpinDriver::new(allocator);
    driver.start(roster.members(), team_count).await?;

    let mut picks = Vec::new();
    let mut interrupted = false;
    let result = tokio::select! {
        res = draft(&mut driver, &mut picks, step, ctx.json) => res,
        _ = tokio::signal::ctrl_c() => {
            interrupted = true;
            Ok(())
        }
    };
    if interrupted {
        driver.reset().await;
        eprintln!();
        if !ctx.json {
            println!("Draft cancelled.");
        }
    }
    result?;

    let allocator = driver.allocator();
    let allocator = allocator.lock().await;
    let board = Board::new(
        allocator.phase(),
        allocator.teams(),
        allocator.remaining_count(),
    )
    .with_selected(allocator.selected())
    .with_error(allocator.error_message());

    if ctx.json {
        print_json(&serde_json::json!({
            "picks": picks,
            "board": board,
        }))?;
    } else {
        println!();
        print_board(&board, false)?;
    }
    Ok(())
}

/// Spin until the queue is empty (or the user quits in step mode).
async fn draft(
    driver: &mut SpinDriver,
    picks: &mut Vec<Assignment>,
    step: bool,
    json: bool,
) -> anyhow::Result<()> {
    loop {
        if step {
            let remaining = driver.allocator().lock().await.remaining_count();
            if remaining == 0 {
                return Ok(());
            }
            let prompt = format!("{remaining} remaining, spin?");
            let go = tokio::task::spawn_blocking(move || confirm_step(&prompt)).await??;
            if !go {
                driver.reset().await;
                if !json {
                    println!("Draft cancelled.");
                }
                return Ok(());
            }
        }

        let Some(mut events) = driver.spin().await else {
            return Ok(());
        };
        while let Some(event) = events.recv().await {
            match event {
                SpinEvent::Highlighted(member) => {
                    if !json {
                        eprint!("\r  {:<32}", member.name);
                        let _ = std::io::stderr().flush();
                    }
                }
                SpinEvent::Committed(assignment) => {
                    if !json {
                        eprint!("\r{:<34}\r", "");
                        println!("{} -> {}", assignment.member.name, assignment.team_name);
                    }
                    picks.push(assignment);
                }
            }
        }
    }
}
