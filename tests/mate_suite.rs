use prune::{Engine, Game, RulesEngine, CHECKMATE_SCORE};
use shakmaty::Color;

const DEPTH: u32 = 2;

/// Short tactical suite in EPD form: `<FEN> bm <SAN...>; id "<name>";`
const SUITE: &str = r#"
r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - bm Qxf7#; id "scholars-mate";
rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 bm Qh4#; id "fools-mate";
6k1/5ppp/8/8/8/8/8/R5K1 w - - bm Ra8#; id "back-rank-white";
r5k1/8/8/8/8/8/5PPP/6K1 b - - bm Ra1#; id "back-rank-black";
6rk/6pp/8/6N1/8/8/8/7K w - - bm Nf7#; id "smothered";
7k/5P2/6K1/8/8/8/8/8 w - - bm f8=Q# f8=R#; id "underpromotion-ok";
4k3/8/8/3q4/8/8/3R4/3K4 w - - bm Rxd5; id "hanging-queen";
"#;

/// Parse an EPD line: "<FEN> bm <move(s)>; id "<name>";"
fn parse_epd_line(line: &str) -> Option<(String, Vec<String>, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let bm_idx = line.find(" bm ")?;
    let fen = line[..bm_idx].to_string();
    let rest = &line[bm_idx + 4..];

    let semi_idx = rest.find(';')?;
    let best_moves: Vec<String> = rest[..semi_idx].split_whitespace().map(|s| s.to_string()).collect();

    let id = rest
        .find("id \"")
        .and_then(|start| {
            let content = &rest[start + 4..];
            content.find('"').map(|end| content[..end].to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    Some((fen, best_moves, id))
}

/// EPD omits the move counters.
fn epd_game(fen: &str) -> Game {
    Game::from_fen(&format!("{} 0 1", fen)).unwrap_or_else(|e| panic!("Invalid FEN {}: {}", fen, e))
}

#[test]
fn test_epd_parser() {
    let line = "7k/5P2/6K1/8/8/8/8/8 w - - bm f8=Q# f8=R#; id \"underpromotion-ok\";";
    let (fen, moves, id) = parse_epd_line(line).unwrap();
    assert_eq!(fen, "7k/5P2/6K1/8/8/8/8/8 w - -");
    assert_eq!(moves, vec!["f8=Q#", "f8=R#"]);
    assert_eq!(id, "underpromotion-ok");
    assert!(parse_epd_line("   ").is_none());
}

#[test]
fn test_mate_suite() {
    let mut total = 0;

    for line in SUITE.lines() {
        let Some((fen, best_moves, id)) = parse_epd_line(line) else {
            continue;
        };
        total += 1;

        let mut game = epd_game(&fen);
        let before = game.fen();
        let mover = game.turn();
        let mut engine = Engine::new(DEPTH);

        let best = engine
            .get_best_move(&mut game)
            .unwrap_or_else(|| panic!("{}: no move found", id));
        let san = game.san(&best);
        assert!(best_moves.contains(&san), "{}: expected one of {:?}, got {}", id, best_moves, san);
        assert_eq!(game.fen(), before, "{}: search must leave the position untouched", id);

        let score = engine.last_result().unwrap().score;
        if san.ends_with('#') {
            let expected = match mover {
                Color::White => CHECKMATE_SCORE,
                Color::Black => -CHECKMATE_SCORE,
            };
            assert_eq!(score, expected, "{}: mate should score the sentinel", id);
        } else {
            assert!(score.abs() < CHECKMATE_SCORE, "{}: no mate here, got {}", id, score);
        }
    }

    assert_eq!(total, 7, "Expected 7 suite positions, got {}", total);
}

#[test]
fn test_played_mate_ends_game() {
    let mut game = epd_game("6k1/5ppp/8/8/8/8/8/R5K1 w - -");
    let mv = Engine::new(1).get_best_move(&mut game).unwrap();
    game.push(&mv);
    assert!(game.is_checkmate());
    assert_eq!(Engine::new(3).get_best_move(&mut game), None);
}
