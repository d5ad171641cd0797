use std::io::{self, BufRead, Write};

use shakmaty::Color;
use tracing::{debug, warn};

use crate::engine::{Difficulty, Engine};
use crate::error::GameError;
use crate::game::Game;
use crate::rules::RulesEngine;
use crate::types::{Score, SearchResult, CHECKMATE_SCORE, MAX_DEPTH, MIN_DEPTH};

/// Reads UCI commands from `input` until `quit` or end of input, writing
/// protocol replies to `output`. Searches run to completion on this thread.
pub fn run<I: BufRead, O: Write>(input: I, mut output: O, engine: Engine) -> io::Result<()> {
    let mut session = Session {
        game: Game::new(),
        engine,
    };

    for line in input.lines() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if !session.handle(&tokens, &mut output)? {
            break;
        }
        output.flush()?;
    }

    Ok(())
}

struct Session {
    game: Game,
    engine: Engine,
}

impl Session {
    /// Handles one command. Returns `false` on `quit`.
    fn handle<O: Write>(&mut self, tokens: &[&str], out: &mut O) -> io::Result<bool> {
        match tokens[0] {
            "uci" => {
                writeln!(out, "id name prune")?;
                writeln!(out, "id author prune developers")?;
                writeln!(
                    out,
                    "option name Depth type spin default {} min {} max {}",
                    self.engine.depth(),
                    MIN_DEPTH,
                    MAX_DEPTH
                )?;
                let levels: Vec<String> = Difficulty::ALL.iter().map(|d| format!("var {}", d.name())).collect();
                // Depths 7-10 have no named level to advertise
                let default = Difficulty::from_depth(self.engine.depth())
                    .map(|level| format!("default {} ", level.name()))
                    .unwrap_or_default();
                writeln!(out, "option name Difficulty type combo {}{}", default, levels.join(" "))?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.game = Game::new(),
            "position" => match parse_position(tokens) {
                Ok(game) => self.game = game,
                Err(e) => warn!(error = %e, "ignoring position command"),
            },
            "go" => self.go(&parse_go(tokens), out)?,
            "setoption" => parse_setoption(tokens, &mut self.engine),
            // Searches are synchronous, there is never one to stop
            "stop" => {}
            "d" | "print" => {
                writeln!(out, "{}", self.game)?;
                writeln!(out, "Fen: {}", self.game.fen())?;
            }
            "quit" => return Ok(false),
            other => debug!(command = other, "unknown command"),
        }
        Ok(true)
    }

    fn go<O: Write>(&mut self, params: &GoParams, out: &mut O) -> io::Result<()> {
        // `go depth N` applies to this search only
        let session_depth = self.engine.depth();
        if let Some(depth) = params.depth {
            self.engine.set_depth(depth);
        }

        let turn = self.game.turn();
        let best = self.engine.get_best_move(&mut self.game);

        if let Some(result) = self.engine.last_result() {
            writeln!(
                out,
                "info depth {} {} nodes {}",
                result.depth,
                format_score(result, turn),
                result.nodes
            )?;
        }

        match best {
            Some(mv) => writeln!(out, "bestmove {}", self.game.uci(&mv))?,
            None => writeln!(out, "bestmove 0000")?,
        }

        self.engine.set_depth(u32::from(session_depth));
        Ok(())
    }
}

/// UCI scores are from the mover's point of view; ours are white-relative.
fn side_relative_cp(score: Score, turn: Color) -> i64 {
    let cp = score.round() as i64;
    match turn {
        Color::White => cp,
        Color::Black => -cp,
    }
}

/// UCI score field. The mate sentinel carries no distance, so a found mate
/// is reported at the search horizon, which bounds it from above.
fn format_score(result: &SearchResult, turn: Color) -> String {
    let cp = side_relative_cp(result.score, turn);
    if result.score.abs() < CHECKMATE_SCORE {
        return format!("score cp {}", cp);
    }
    if result.best_move.is_none() {
        return "score mate 0".to_string();
    }

    let mate_moves = (i64::from(result.depth) + 1) / 2;
    if cp > 0 {
        format!("score mate {}", mate_moves)
    } else {
        format!("score mate -{}", mate_moves)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct GoParams {
    depth: Option<u32>,
}

fn parse_go(tokens: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        if tokens[i] == "depth" {
            i += 1;
            if i < tokens.len() {
                params.depth = tokens[i].parse().ok();
            }
        }
        // Clock parameters are accepted and ignored: search depth is fixed
        i += 1;
    }

    params
}

fn parse_position(tokens: &[&str]) -> Result<Game, GameError> {
    let mut idx = 1;
    let mut game = match tokens.get(idx) {
        Some(&"startpos") => {
            idx += 1;
            Game::new()
        }
        Some(&"fen") => {
            idx += 1;
            let start = idx;
            while idx < tokens.len() && tokens[idx] != "moves" {
                idx += 1;
            }
            Game::from_fen(&tokens[start..idx].join(" "))?
        }
        _ => {
            return Err(GameError::InvalidFen {
                fen: tokens[1..].join(" "),
                reason: "expected `startpos` or `fen`".to_string(),
            });
        }
    };

    if tokens.get(idx) == Some(&"moves") {
        for move_str in &tokens[idx + 1..] {
            game.play(move_str)?;
        }
    }

    Ok(game)
}

fn parse_setoption(tokens: &[&str], engine: &mut Engine) {
    let name_idx = tokens.iter().position(|&t| t == "name");
    let value_idx = tokens.iter().position(|&t| t == "value");

    let (Some(ni), Some(vi)) = (name_idx, value_idx) else {
        warn!(command = %tokens.join(" "), "malformed setoption");
        return;
    };
    if vi <= ni {
        warn!(command = %tokens.join(" "), "malformed setoption");
        return;
    }

    let name = tokens[ni + 1..vi].join(" ");
    let value = tokens[vi + 1..].join(" ");

    match name.to_lowercase().as_str() {
        "depth" => match value.parse::<u32>() {
            Ok(depth) => engine.set_depth(depth),
            Err(_) => warn!(value = %value, "Depth must be a number"),
        },
        "difficulty" => match value.parse::<Difficulty>() {
            Ok(level) => engine.set_difficulty(level),
            Err(e) => warn!(error = %e, "ignoring Difficulty option"),
        },
        other => debug!(option = other, "unknown option"),
    }
}
