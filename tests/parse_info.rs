use mimicbot::engine::score::{parse_info_line, RawScore};
use pretty_assertions::assert_eq;

#[test]
fn parses_multipv_cp_line() {
    let line = "info depth 20 seldepth 29 multipv 2 score cp 34 nodes 1934922 nps 1290000 hashfull 512 time 1500 pv e2e4 e7e5 g1f3";
    let info = parse_info_line(line).expect("line should parse");
    assert_eq!(info.multipv, 2);
    assert_eq!(info.score, RawScore::Cp(34));
    assert_eq!(info.first_move, "e2e4");
}

#[test]
fn parses_mate_line_with_sign() {
    let info = parse_info_line("info depth 12 multipv 1 score mate -3 nodes 4000 pv h7h8q").unwrap();
    assert_eq!(info.score, RawScore::Mate(-3));
    assert_eq!(info.first_move, "h7h8q");

    let info = parse_info_line("info depth 12 multipv 5 score mate 2 pv d5f6 g8h8").unwrap();
    assert_eq!(info.score, RawScore::Mate(2));
    assert_eq!(info.multipv, 5);
}

#[test]
fn multipv_defaults_to_one_when_token_absent() {
    let info = parse_info_line("info depth 8 score cp -55 nodes 9000 pv g8f6").unwrap();
    assert_eq!(info.multipv, 1);
    assert_eq!(info.score, RawScore::Cp(-55));
}

#[test]
fn rejects_lines_without_score_or_pv() {
    // depth-only progress report
    assert_eq!(parse_info_line("info depth 5 currmove e2e4 currmovenumber 1"), None);
    // string chatter
    assert_eq!(parse_info_line("info string NNUE evaluation enabled"), None);
    // score but no pv
    assert_eq!(parse_info_line("info depth 10 multipv 1 score cp 12 nodes 100"), None);
    // not an info line at all
    assert_eq!(parse_info_line("bestmove e2e4 ponder e7e5"), None);
    assert_eq!(parse_info_line("readyok"), None);
}

#[test]
fn rejects_malformed_numbers() {
    assert_eq!(parse_info_line("info multipv x score cp 10 pv e2e4"), None);
    assert_eq!(parse_info_line("info multipv 1 score cp ten pv e2e4"), None);
    assert_eq!(parse_info_line("info multipv 1 score centipawns 10 pv e2e4"), None);
}
