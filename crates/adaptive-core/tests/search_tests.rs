use adaptive_core::board::Board;
use adaptive_core::disc::Disc;
use adaptive_core::oracle::Oracle;
use adaptive_core::rules::{RuleFlags, RuleOracle, next_player};
use adaptive_core::search::Search;
use adaptive_core::search::mcts::{Mcts, MctsParams};
use adaptive_core::search::minimax::minimax;
use adaptive_core::search::node_type::{NonPV, PV};
use adaptive_core::search::time_control::Deadline;
use adaptive_core::square::Square;
use adaptive_core::transposition_table::TranspositionTable;
use adaptive_core::types::Depth;
use adaptive_core::weights::WeightMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn far() -> Deadline {
    Deadline::after_ms(600_000)
}

fn board(s: &str) -> Board {
    Board::from_string(s).unwrap()
}

fn assert_matches_minimax(position: &Board, side: Disc, flags: RuleFlags) {
    let oracle = RuleOracle::new(flags);
    let weights = WeightMatrix::structural(position, flags);
    let search = Search::new(&oracle, &weights, flags);

    for depth in 1..=4 {
        let expected = minimax(&oracle, &weights, flags, position, side, side, depth);

        let mut tt = TranspositionTable::new();
        let plain = search
            .search_depth::<NonPV>(&mut tt, position, side, depth, far())
            .unwrap();
        assert_eq!(plain.score, expected, "non-pv depth {depth} on\n{position}");

        let pv = search
            .search_depth::<PV>(&mut tt, position, side, depth, far())
            .unwrap();
        assert_eq!(pv.score, expected, "pv depth {depth} on\n{position}");
    }
}

#[test]
fn test_alphabeta_matches_minimax_on_small_boards() {
    let positions = [
        board("---- -OX- -XO- ----"),
        board("-O-- XOXO -OOX XO--"),
        board("--- -OX -X-"),
        board("#--- -OX- -XO- ---#"),
    ];
    for position in &positions {
        for side in [Disc::Black, Disc::White] {
            assert_matches_minimax(position, side, RuleFlags::default());
        }
    }
}

#[test]
fn test_alphabeta_matches_minimax_under_variants() {
    let position = board("-#-- -OX- -XO- --#-");
    let variants = [
        RuleFlags {
            occlusion_allowed: true,
            fewer_pieces_continue: false,
        },
        RuleFlags {
            occlusion_allowed: false,
            fewer_pieces_continue: true,
        },
        RuleFlags {
            occlusion_allowed: true,
            fewer_pieces_continue: true,
        },
    ];
    for flags in variants {
        assert_matches_minimax(&position, Disc::Black, flags);
    }
}

#[test]
fn test_alphabeta_matches_minimax_through_passes() {
    // White has no move and has to hand the turn back.
    let position = board("XXX- XXXO XXOO X---");
    let oracle = RuleOracle::standard();
    assert!(oracle.valid_moves(&position, Disc::White).is_empty());
    assert!(!oracle.valid_moves(&position, Disc::Black).is_empty());

    assert_matches_minimax(&position, Disc::White, RuleFlags::default());
    assert_matches_minimax(&position, Disc::Black, RuleFlags::default());
}

/// Value of playing `mv` at the root, seen `depth` plies below it.
fn move_value(
    oracle: &RuleOracle,
    weights: &WeightMatrix,
    position: &Board,
    player: Disc,
    mv: Square,
    depth: Depth,
) -> f64 {
    let next = oracle.simulate_move(position, player, mv).unwrap();
    let side = next_player(&next, player, false);
    minimax(oracle, weights, RuleFlags::default(), &next, side, player, depth)
}

#[test]
fn test_deeper_iteration_never_picks_a_worse_move() {
    let oracle = RuleOracle::standard();
    let position = board(
        "------ \
         ------ \
         --OX-- \
         --XO-- \
         ------ \
         ------",
    );
    let weights = WeightMatrix::structural(&position, RuleFlags::default());
    let search = Search::new(&oracle, &weights, RuleFlags::default());
    let mut tt = TranspositionTable::new();

    let mut previous = search
        .search_depth::<NonPV>(&mut tt, &position, Disc::Black, 1, far())
        .unwrap()
        .best_move
        .unwrap();
    for depth in 2..=4 {
        let current = search
            .search_depth::<NonPV>(&mut tt, &position, Disc::Black, depth, far())
            .unwrap();
        let chosen = current.best_move.unwrap();
        let chosen_value = move_value(&oracle, &weights, &position, Disc::Black, chosen, depth - 1);
        let previous_value = move_value(&oracle, &weights, &position, Disc::Black, previous, depth - 1);
        assert!(
            chosen_value >= previous_value,
            "depth {depth}: {chosen} ({chosen_value}) is worse than {previous} ({previous_value})"
        );
        assert_eq!(current.score, chosen_value);
        previous = chosen;
    }
}

#[test]
fn test_mcts_finds_winning_corner() {
    let oracle = RuleOracle::standard();
    // Black's corner capture at d1 is worth far more than a3 or c4.
    let position = board("-O-- XOXO -OOX XO--");
    let corner: Square = "d1".parse().unwrap();

    let weights = WeightMatrix::zeros(4);
    let search = Search::new(&oracle, &weights, RuleFlags::default());
    let mut tt = TranspositionTable::new();
    let exact = search
        .search_depth::<NonPV>(&mut tt, &position, Disc::Black, 8, far())
        .unwrap();
    assert_eq!(exact.best_move, Some(corner));

    let mut rng = StdRng::seed_from_u64(11);
    let params = MctsParams {
        rollout_plies: 20,
        reward_scale: 300.0,
        max_iterations: Some(3_000),
    };
    let result = Mcts::new(&oracle, RuleFlags::default(), params, &mut rng).search(
        &position,
        Disc::Black,
        far(),
    );
    assert_eq!(result.best_move, Some(corner));
    assert_eq!(result.iterations, 3_000);
}
