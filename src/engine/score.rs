use cozy_chess::Color;
use serde::Deserialize;

/// Mate sentinel: strictly larger than any finite centipawn magnitude the
/// engine can report, so mate-in-K always dominates finite scores and
/// sooner mates dominate later ones.
pub const SENTINEL: i32 = 100_000;

/// Raw engine evaluation as reported on a UCI `info` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawScore {
    Cp(i32),
    /// Mate in K plies; negative K means the reporting side gets mated.
    Mate(i32),
}

/// Sign convention the engine reports scores in. UCI engines report from
/// the side to move; some analysis frontends re-emit from White's view.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScorePov {
    #[default]
    SideToMove,
    White,
}

/// One parsed multi-PV `info` line: rank, score, and the first move of the line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoLine {
    pub multipv: usize,
    pub score: RawScore,
    pub first_move: String,
}

/// Candidate move with its evaluation normalized to centipawns from the
/// perspective of the side to move.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub uci: String,
    pub raw: RawScore,
    /// Engine's 1-based multipv rank (1 = engine's best).
    pub rank: usize,
    pub score_cp: i32,
}

/// Parse a UCI `info ... multipv N ... score (cp X | mate K) ... pv m1 ...`
/// line. Returns `None` for anything else (depth-only info, strings,
/// malformed output); a whole analysis with zero parsable lines is the
/// caller's signal that the engine output is unusable.
pub fn parse_info_line(line: &str) -> Option<InfoLine> {
    let line = line.trim();
    if !line.starts_with("info") { return None; }
    let mut tokens = line.split_whitespace();
    let mut multipv = 1usize; // engines omit the token when MultiPV is 1
    let mut score: Option<RawScore> = None;
    let mut first_move: Option<String> = None;
    while let Some(tok) = tokens.next() {
        match tok {
            "multipv" => {
                multipv = tokens.next()?.parse().ok()?;
            }
            "score" => {
                match tokens.next()? {
                    "cp" => score = Some(RawScore::Cp(tokens.next()?.parse().ok()?)),
                    "mate" => score = Some(RawScore::Mate(tokens.next()?.parse().ok()?)),
                    _ => return None,
                }
            }
            "pv" => {
                first_move = tokens.next().map(|s| s.to_string());
                break; // rest of the line is the continuation
            }
            _ => {}
        }
    }
    Some(InfoLine { multipv, score: score?, first_move: first_move? })
}

/// Map a raw score to centipawns from the side to move. Mate-in-K becomes
/// `SENTINEL - K`, mated-in-K becomes `-SENTINEL + K`, preserving the
/// ordering: sooner mates > later mates > any finite score.
pub fn normalize_cp(raw: RawScore, pov: ScorePov, side_to_move: Color) -> i32 {
    let flip = pov == ScorePov::White && side_to_move == Color::Black;
    match raw {
        RawScore::Cp(v) => if flip { -v } else { v },
        RawScore::Mate(k) => {
            let k = if flip { -k } else { k };
            if k > 0 { SENTINEL - k } else { -SENTINEL - k }
        }
    }
}

/// Stable descending sort by `score_cp`, ties broken by original engine rank.
pub fn sort_candidates(cands: &mut [Candidate]) {
    cands.sort_by(|a, b| b.score_cp.cmp(&a.score_cp).then(a.rank.cmp(&b.rank)));
}
