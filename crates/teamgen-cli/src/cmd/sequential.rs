use super::{confirm_step, Context, TeamArgs};
use crate::output::{print_board, print_json};
use teamgen_core::display::{render_teams, Board};
use teamgen_core::sequential::SequentialAllocator;

pub fn run(ctx: &Context, args: TeamArgs, step: bool) -> anyhow::Result<()> {
    let roster = args.roster();
    let mut allocator = SequentialAllocator::with_rng(ctx.rng());
    allocator.start(roster.members(), args.team_count(&ctx.config))?;

    let mut assignments = Vec::new();
    while allocator.is_active() {
        if step {
            let prompt = format!("{} remaining, assign next?", allocator.remaining_count());
            if !confirm_step(&prompt)? {
                allocator.reset();
                if !ctx.json {
                    println!("Draft cancelled.");
                }
                break;
            }
        }

        let Some(assignment) = allocator.assign_next() else {
            break;
        };
        if !ctx.json {
            println!("{} -> {}", assignment.member.name, assignment.team_name);
            if step {
                print!("{}", render_teams(allocator.teams()));
            }
        }
        assignments.push(assignment);
    }

    let board = Board::new(
        allocator.phase(),
        allocator.teams(),
        allocator.remaining_count(),
    )
    .with_error(allocator.error_message());
    if ctx.json {
        print_json(&serde_json::json!({
            "assignments": assignments,
            "board": board,
        }))
    } else {
        println!();
        print_board(&board, false)
    }
}
