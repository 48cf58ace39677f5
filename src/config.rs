use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::score::ScorePov;

/// Hard ceiling on requested principal variations (engine-imposed).
pub const MAX_MULTIPV: usize = 15;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the UCI engine binary.
    pub path: PathBuf,
    /// Per-move analysis budget in milliseconds.
    pub movetime_ms: u64,
    /// Number of principal variations requested per analysis (1..=15).
    pub max_lines: usize,
    /// Sign convention the engine reports scores in.
    pub score_pov: ScorePov,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            movetime_ms: 1000,
            max_lines: MAX_MULTIPV,
            score_pov: ScorePov::SideToMove,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HumanizeConfig {
    /// Mean of the sampled handicap below the top move, in centipawns.
    pub target_cp_advantage: i32,
    /// Standard deviation of the setpoint distribution, in centipawns.
    pub cp_std_dev: i32,
    /// Gap between best and second-best that makes a move obvious, in centipawns.
    pub obvious_move_threshold: i32,
    /// Thinking-delay bounds in seconds.
    pub min_move_time: f64,
    pub max_move_time: f64,
}

impl Default for HumanizeConfig {
    fn default() -> Self {
        Self {
            target_cp_advantage: 300,
            cp_std_dev: 100,
            obvious_move_threshold: 300,
            min_move_time: 0.5,
            max_move_time: 2.0,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub humanize: HumanizeConfig,
}

impl Config {
    /// Load from a JSON file; absent fields fall back to defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: Config = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.engine.max_lines == 0 || self.engine.max_lines > MAX_MULTIPV {
            anyhow::bail!("max_lines must be in 1..={}, got {}", MAX_MULTIPV, self.engine.max_lines);
        }
        if self.engine.movetime_ms == 0 {
            anyhow::bail!("movetime_ms must be positive");
        }
        if self.humanize.cp_std_dev <= 0 {
            anyhow::bail!("cp_std_dev must be positive, got {}", self.humanize.cp_std_dev);
        }
        if self.humanize.min_move_time < 0.0 || self.humanize.max_move_time < self.humanize.min_move_time {
            anyhow::bail!(
                "delay bounds invalid: min {} max {}",
                self.humanize.min_move_time, self.humanize.max_move_time
            );
        }
        Ok(())
    }
}
