use mimicbot::config::HumanizeConfig;
use mimicbot::engine::score::{Candidate, RawScore};
use mimicbot::humanize::select;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn cand(uci: &str, rank: usize, score_cp: i32) -> Candidate {
    Candidate { uci: uci.to_string(), raw: RawScore::Cp(score_cp), rank, score_cp }
}

#[test]
fn large_gap_is_always_obvious() {
    let cands = vec![cand("e2e4", 1, 500), cand("d2d4", 2, 100)];
    let cfg = HumanizeConfig::default(); // threshold 300
    for seed in 0..50u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let r = select(&cands, &cfg, &mut rng).unwrap();
        assert!(r.obvious, "gap 400 >= 300 must be obvious for every seed");
        assert_eq!(r.uci, "e2e4");
        assert_eq!(r.target_cp, None, "obvious path must not sample a setpoint");
    }
}

#[test]
fn single_legal_move_is_obvious_regardless_of_threshold() {
    let cands = vec![cand("g8f6", 1, -250)];
    let mut cfg = HumanizeConfig::default();
    cfg.obvious_move_threshold = 1_000_000;
    let mut rng = SmallRng::seed_from_u64(7);
    let r = select(&cands, &cfg, &mut rng).unwrap();
    assert!(r.obvious);
    assert_eq!(r.uci, "g8f6");
}

#[test]
fn small_gap_is_not_obvious() {
    let cands = vec![cand("e2e4", 1, 200), cand("d2d4", 2, 180)];
    let cfg = HumanizeConfig::default();
    let mut rng = SmallRng::seed_from_u64(1);
    let r = select(&cands, &cfg, &mut rng).unwrap();
    assert!(!r.obvious, "gap 20 < 300 must go through sampling");
    assert!(r.target_cp.is_some());
}

#[test]
fn avoiding_a_blunder_is_obvious() {
    // Every alternative loses material: play the saving move directly.
    let cands = vec![cand("f6d5", 1, 100), cand("a7a6", 2, -500)];
    let cfg = HumanizeConfig::default();
    for seed in 0..20u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let r = select(&cands, &cfg, &mut rng).unwrap();
        assert!(r.obvious, "second-best at -500 under threshold 300 is a blunder to avoid");
        assert_eq!(r.uci, "f6d5");
    }
}
