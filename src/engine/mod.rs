use std::collections::HashMap;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::board::Position;
use crate::config::{EngineConfig, MAX_MULTIPV};
use crate::error::BotError;

pub mod score;

use score::{normalize_cp, parse_info_line, sort_candidates, Candidate, InfoLine};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
// Poll interval while waiting on engine output; keeps cancellation responsive.
const POLL_STEP: Duration = Duration::from_millis(50);

/// Cooperative cancellation flag for an in-flight analysis. Cancelling sends
/// `stop` and drains the search cleanly, so the engine process stays usable.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }
    pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed); }
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

/// Reject terminal positions before any engine traffic.
pub fn ensure_nonterminal(pos: &Position) -> Result<(), BotError> {
    if pos.legal_moves_count() == 0 { Err(BotError::TerminalPosition) } else { Ok(()) }
}

/// Long-lived UCI engine process. One in-flight analysis at a time by
/// construction (`evaluate` takes `&mut self`); `quit` is sent on drop.
pub struct Engine {
    cfg: EngineConfig,
    child: Child,
    stdin: BufWriter<ChildStdin>,
    lines: Receiver<String>,
}

impl Engine {
    pub fn spawn(cfg: &EngineConfig) -> Result<Self, BotError> {
        let mut child = Command::new(&cfg.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BotError::EngineUnavailable(format!("failed to start {}: {e}", cfg.path.display())))?;

        let stdin = child.stdin.take()
            .ok_or_else(|| BotError::EngineUnavailable("no stdin handle".into()))?;
        let stdout = child.stdout.take()
            .ok_or_else(|| BotError::EngineUnavailable("no stdout handle".into()))?;

        // Reader thread feeds lines into a channel so every read can be
        // bounded with recv_timeout. It exits on EOF or when Engine drops.
        let (tx, rx) = mpsc::channel::<String>();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(l) => { if tx.send(l).is_err() { break; } }
                    Err(_) => break,
                }
            }
        });

        let mut engine = Self {
            cfg: cfg.clone(),
            child,
            stdin: BufWriter::new(stdin),
            lines: rx,
        };
        engine.send("uci")?;
        engine.wait_for("uciok", HANDSHAKE_TIMEOUT)?;
        engine.send(&format!("setoption name MultiPV value {}", cfg.max_lines.clamp(1, MAX_MULTIPV)))?;
        engine.send("isready")?;
        engine.wait_for("readyok", HANDSHAKE_TIMEOUT)?;
        info!("engine ready: {}", cfg.path.display());
        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> Result<(), BotError> {
        debug!("-> {cmd}");
        writeln!(self.stdin, "{cmd}")
            .and_then(|_| self.stdin.flush())
            .map_err(|e| BotError::EngineUnavailable(format!("write failed: {e}")))
    }

    fn wait_for(&mut self, token: &str, timeout: Duration) -> Result<(), BotError> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() { return Err(BotError::EngineTimeout); }
            match self.lines.recv_timeout(left.min(POLL_STEP)) {
                Ok(line) => { if line.trim() == token { return Ok(()); } }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(BotError::EngineUnavailable("engine closed its output".into()));
                }
            }
        }
    }

    /// Multi-PV analysis of `pos`, normalized and sorted per the evaluator
    /// contract. Applies the retry policy: `EngineTimeout` is retried once
    /// with the same budget, `EngineUnavailable` gets one re-spawn attempt.
    pub fn evaluate(&mut self, pos: &Position, max_lines: usize) -> Result<Vec<Candidate>, BotError> {
        self.evaluate_cancellable(pos, max_lines, None)
    }

    pub fn evaluate_cancellable(
        &mut self,
        pos: &Position,
        max_lines: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<Candidate>, BotError> {
        ensure_nonterminal(pos)?;
        // More lines than legal moves is naturally truncated, not an error.
        let want = max_lines.clamp(1, MAX_MULTIPV).min(pos.legal_moves_count());
        match self.analyze_once(pos, want, cancel) {
            Ok(cands) => Ok(cands),
            Err(BotError::EngineTimeout) => {
                warn!("analysis timed out, retrying once with the same budget");
                self.analyze_once(pos, want, cancel)
            }
            Err(BotError::EngineUnavailable(msg)) => {
                warn!("engine unavailable ({msg}), attempting one reconnect");
                *self = Engine::spawn(&self.cfg.clone())?;
                self.analyze_once(pos, want, cancel)
            }
            Err(e) => Err(e),
        }
    }

    fn analyze_once(
        &mut self,
        pos: &Position,
        lines_wanted: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<Candidate>, BotError> {
        // Drop stale output from a previous (cancelled/timed-out) search.
        while self.lines.try_recv().is_ok() {}

        self.send(&format!("setoption name MultiPV value {lines_wanted}"))?;
        self.send(&format!("position fen {}", pos.fen()))?;
        self.send(&format!("go movetime {}", self.cfg.movetime_ms))?;

        // Keep the deepest info line per multipv rank; later lines supersede.
        let mut per_rank: HashMap<usize, InfoLine> = HashMap::new();
        // Generous upper bound: the engine gets 3x its budget before we
        // declare the call timed out.
        let deadline = Instant::now() + Duration::from_millis(self.cfg.movetime_ms.saturating_mul(3));
        let mut stopped = false;
        loop {
            // Enforced on every iteration: a misbehaving engine that spams
            // info lines without ever sending bestmove must still time out.
            if Instant::now() >= deadline {
                // Ask the search to wind down and swallow its late bestmove
                // so the process stays usable for the retry.
                let _ = self.send("stop");
                self.drain_until_bestmove(Duration::from_secs(1));
                return Err(BotError::EngineTimeout);
            }
            if let Some(tok) = cancel {
                if tok.is_cancelled() && !stopped {
                    self.send("stop")?;
                    stopped = true;
                }
            }
            match self.lines.recv_timeout(POLL_STEP) {
                Ok(line) => {
                    if line.starts_with("bestmove") {
                        break;
                    }
                    if let Some(info) = parse_info_line(&line) {
                        per_rank.insert(info.multipv, info);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(BotError::EngineUnavailable("engine process exited mid-search".into()));
                }
            }
        }
        if stopped {
            return Err(BotError::Cancelled);
        }
        if per_rank.is_empty() {
            return Err(BotError::EngineUnavailable("no parsable analysis lines".into()));
        }

        let stm = pos.side_to_move();
        let mut cands: Vec<Candidate> = per_rank
            .into_values()
            .map(|info| Candidate {
                score_cp: normalize_cp(info.score, self.cfg.score_pov, stm),
                uci: info.first_move,
                raw: info.score,
                rank: info.multipv,
            })
            .collect();
        sort_candidates(&mut cands);
        debug!("evaluated {} lines, best {} ({} cp)", cands.len(), cands[0].uci, cands[0].score_cp);
        Ok(cands)
    }

    fn drain_until_bestmove(&mut self, grace: Duration) {
        let deadline = Instant::now() + grace;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() { return; }
            match self.lines.recv_timeout(left.min(POLL_STEP)) {
                Ok(line) => { if line.starts_with("bestmove") { return; } }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.wait();
    }
}
