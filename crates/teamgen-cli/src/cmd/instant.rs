use super::{Context, TeamArgs};
use crate::output::print_board;
use teamgen_core::display::Board;
use teamgen_core::instant::InstantAllocator;
use teamgen_core::types::RunPhase;

pub fn run(ctx: &Context, args: TeamArgs) -> anyhow::Result<()> {
    let roster = args.roster();
    let mut allocator = InstantAllocator::with_rng(ctx.rng());
    let teams = allocator.generate(roster.members(), args.team_count(&ctx.config))?;
    print_board(&Board::new(RunPhase::Idle, teams, 0), ctx.json)
}
