use adaptive_core::board::Board;
use adaptive_core::disc::Disc;
use adaptive_core::oracle::Oracle;
use adaptive_core::rules::{RuleFlags, RuleOracle, next_player};
use adaptive_core::square::Square;
use adaptive_core::stability::{is_stable_move, stable_discs};
use adaptive_core::stage::StageConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

const LOOKAHEAD_PLIES: usize = 10;
const CONTINUATIONS: usize = 12;

/// Plays random continuations after `mv` and checks that the placed disc
/// never changes colour.
fn assert_never_flipped(
    oracle: &RuleOracle,
    flags: RuleFlags,
    after: &Board,
    mover: Disc,
    mv: Square,
    rng: &mut StdRng,
) {
    for _ in 0..CONTINUATIONS {
        let mut board = after.clone();
        let mut player = next_player(&board, mover, flags.fewer_pieces_continue);
        for _ in 0..LOOKAHEAD_PLIES {
            let mut moves = oracle.valid_moves(&board, player);
            if moves.is_empty() {
                player = player.opposite();
                moves = oracle.valid_moves(&board, player);
            }
            let Some(&reply) = moves.choose(rng) else {
                break;
            };
            board = oracle.simulate_move(&board, player, reply).unwrap();
            assert!(
                board.get(mv).holds(mover),
                "{mv} was classified stable but got flipped:\n{board}"
            );
            player = next_player(&board, player, flags.fewer_pieces_continue);
        }
    }
}

fn check_stage(stage: &StageConfig, flags: RuleFlags, seed: u64) -> usize {
    let oracle = RuleOracle::new(flags);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = stage.initial_board().unwrap();
    let mut player = Disc::Black;
    let mut checked = 0;

    loop {
        let mut moves = oracle.valid_moves(&board, player);
        if moves.is_empty() {
            player = player.opposite();
            moves = oracle.valid_moves(&board, player);
            if moves.is_empty() {
                return checked;
            }
        }

        for &mv in &moves {
            if is_stable_move(&oracle, &board, player, mv, flags.occlusion_allowed) {
                let after = oracle.simulate_move(&board, player, mv).unwrap();
                assert_never_flipped(&oracle, flags, &after, player, mv, &mut rng);
                checked += 1;
            }
        }

        let &mv = moves.choose(&mut rng).unwrap();
        board = oracle.simulate_move(&board, player, mv).unwrap();
        player = next_player(&board, player, flags.fewer_pieces_continue);
    }
}

#[test]
fn test_stable_moves_are_never_flipped() {
    let stages = [StageConfig::standard(), StageConfig::small(), StageConfig::c_squares()];
    let mut checked = 0;
    for (i, stage) in stages.iter().enumerate() {
        for occlusion_allowed in [false, true] {
            let flags = RuleFlags {
                occlusion_allowed,
                fewer_pieces_continue: false,
            };
            for seed in 0..4 {
                checked += check_stage(stage, flags, seed * 10 + i as u64);
            }
        }
    }
    assert!(checked > 0, "no stable move was ever tested");
}

#[test]
fn test_stable_discs_stay_stable() {
    // Every disc stable before a move is still owned and stable afterwards.
    let flags = RuleFlags::default();
    let oracle = RuleOracle::new(flags);
    let mut rng = StdRng::seed_from_u64(5);
    let mut board = StageConfig::small().initial_board().unwrap();
    let mut player = Disc::Black;

    loop {
        let mut moves = oracle.valid_moves(&board, player);
        if moves.is_empty() {
            player = player.opposite();
            moves = oracle.valid_moves(&board, player);
            if moves.is_empty() {
                break;
            }
        }
        let before = [
            stable_discs(&board, Disc::Black, false),
            stable_discs(&board, Disc::White, false),
        ];
        let &mv = moves.choose(&mut rng).unwrap();
        board = oracle.simulate_move(&board, player, mv).unwrap();
        for (disc, mask) in [Disc::Black, Disc::White].into_iter().zip(&before) {
            let after = stable_discs(&board, disc, false);
            for (i, &was_stable) in mask.iter().enumerate() {
                if was_stable {
                    assert!(after[i], "stable {disc} disc at {i} lost stability");
                }
            }
        }
        player = next_player(&board, player, flags.fewer_pieces_continue);
    }
}
