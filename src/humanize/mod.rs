use std::time::Duration;

use log::debug;
use rand::distributions::WeightedIndex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::HumanizeConfig;
use crate::engine::score::Candidate;
use crate::error::BotError;

/// Outcome of one move decision. Consumed by the executor and discarded.
#[derive(Clone, Debug)]
pub struct SelectionResult {
    pub uci: String,
    /// True when the move was forced or overwhelmingly best; no sampling ran.
    pub obvious: bool,
    /// Sampled target evaluation the pick was aimed at, if sampling ran.
    pub target_cp: Option<i32>,
    /// Human-plausible thinking delay to spend before executing.
    pub delay: Duration,
}

/// Pick one candidate the way a self-handicapped human would: play the
/// forced move fast when there is one, otherwise aim at a sampled setpoint
/// below the engine's best and draw from a Gaussian-weighted distribution
/// around it. Stateless: everything comes from `(cands, cfg, rng)`.
pub fn select(
    cands: &[Candidate],
    cfg: &HumanizeConfig,
    rng: &mut SmallRng,
) -> Result<SelectionResult, BotError> {
    if cands.is_empty() {
        return Err(BotError::NoCandidates);
    }

    let mid = (cfg.min_move_time + cfg.max_move_time) / 2.0;
    if is_obvious(cands, cfg.obvious_move_threshold) {
        // Forced responses come fast: lower half of the delay range.
        return Ok(SelectionResult {
            uci: cands[0].uci.clone(),
            obvious: true,
            target_cp: None,
            delay: sample_delay(rng, cfg.min_move_time, mid),
        });
    }

    let best = cands[0].score_cp;
    let worst = cands[cands.len() - 1].score_cp;
    let target = sample_setpoint(best, worst, cfg, rng);

    let idx = weighted_pick(cands, target, cfg.cp_std_dev, rng);
    debug!("target {} cp, picked {} ({} cp, rank {})",
        target, cands[idx].uci, cands[idx].score_cp, cands[idx].rank);

    Ok(SelectionResult {
        uci: cands[idx].uci.clone(),
        obvious: false,
        target_cp: Some(target),
        delay: sample_delay(rng, cfg.min_move_time, cfg.max_move_time),
    })
}

/// Convenience wrapper seeded from OS entropy; tests inject a seeded rng
/// through `select` instead.
pub fn select_from_entropy(cands: &[Candidate], cfg: &HumanizeConfig) -> Result<SelectionResult, BotError> {
    let mut rng = SmallRng::from_entropy();
    select(cands, cfg, &mut rng)
}

/// A move is obvious when it is the only legal move, when it beats the
/// runner-up by the configured gap, or when every alternative is already a
/// blunder (runner-up far below zero).
fn is_obvious(cands: &[Candidate], threshold: i32) -> bool {
    if cands.len() < 2 {
        return true;
    }
    let best = cands[0].score_cp;
    let second = cands[1].score_cp;
    best.saturating_sub(second) >= threshold || second < -threshold
}

/// Target evaluation: `best - delta` with `delta ~ Normal(mean, std)`,
/// clamped so the target is never above the best move nor below the worst.
fn sample_setpoint(best: i32, worst: i32, cfg: &HumanizeConfig, rng: &mut SmallRng) -> i32 {
    let std = cfg.cp_std_dev.max(1) as f64;
    // Normal::new only fails on a non-finite or negative std.
    let normal = Normal::new(cfg.target_cp_advantage as f64, std)
        .unwrap_or_else(|_| Normal::new(0.0, 1.0).unwrap());
    let delta = normal.sample(rng).clamp(0.0, (best.saturating_sub(worst)) as f64);
    best - delta.round() as i32
}

/// Gaussian kernel around the target; candidates closer to the setpoint get
/// exponentially more weight. Falls back to nearest-to-target when every
/// weight underflows (e.g. the target sits between far-apart mate scores).
fn weighted_pick(cands: &[Candidate], target: i32, std_dev: i32, rng: &mut SmallRng) -> usize {
    let sigma = std_dev.max(1) as f64;
    let weights: Vec<f64> = cands
        .iter()
        .map(|c| {
            let d = (c.score_cp - target) as f64;
            (-d * d / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    match WeightedIndex::new(&weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => nearest_to(cands, target),
    }
}

fn nearest_to(cands: &[Candidate], target: i32) -> usize {
    let mut best_idx = 0usize;
    let mut best_d = i64::MAX;
    for (i, c) in cands.iter().enumerate() {
        let d = (c.score_cp as i64 - target as i64).abs();
        if d < best_d { best_d = d; best_idx = i; }
    }
    best_idx
}

/// Uniform thinking delay in seconds over `[lo, hi]`.
fn sample_delay(rng: &mut SmallRng, lo: f64, hi: f64) -> Duration {
    let secs = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
    Duration::from_secs_f64(secs.max(0.0))
}
