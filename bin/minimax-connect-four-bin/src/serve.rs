/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::io::{self, BufRead, Write};

use anyhow::Result;
use minimax_connect_four::protocol::{self, ErrorResponse, Request, Response};
use minimax_connect_four::{Game, SessionConfig};
use tracing::{info, warn};

pub fn run(config: SessionConfig) -> Result<()> {
    info!(?config, "serving on stdio");
    let mut game = Game::new(&config);
    serve(&mut game, io::stdin().lock(), io::stdout().lock())
}

/// One JSON request per input line, one JSON response per output line. When the computer moves
/// first, its opening is sent before any request is read.
fn serve(game: &mut Game, input: impl BufRead, mut output: impl Write) -> Result<()> {
    if game.awaiting_computer() {
        let opening = protocol::handle(game, Request::Reset);
        write_response(&mut output, &opening)?;
    }

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => protocol::handle(game, request),
            Err(e) => {
                warn!(%e, "malformed request");
                Response::Error(ErrorResponse::new(format!("malformed request: {}", e)))
            }
        };
        write_response(&mut output, &response)?;
    }
    Ok(())
}

fn write_response(output: &mut impl Write, response: &Response) -> Result<()> {
    serde_json::to_writer(&mut *output, response)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use connect_four_logic::Player;
    use serde_json::Value;

    use super::*;

    fn run_lines(config: &SessionConfig, input: &str) -> Vec<Value> {
        let mut game = Game::new(config);
        let mut output = Vec::new();
        serve(&mut game, Cursor::new(input), &mut output).expect("serve failed");
        String::from_utf8(output)
            .expect("output is not utf-8")
            .lines()
            .map(|line| serde_json::from_str(line).expect("response is not json"))
            .collect()
    }

    #[test]
    fn test_one_response_per_request() {
        let config = SessionConfig {
            depth: Some(1),
            ..Default::default()
        };
        let responses = run_lines(
            &config,
            "{\"type\": \"make_move\", \"column\": 3}\n\n{\"type\": \"make_move\", \"column\": 9}\n{\"type\": \"reset\"}\n",
        );
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["gameOver"], Value::Bool(false));
        assert!(responses[0]["aiMove"].is_u64());
        assert_eq!(responses[1]["error"], "Invalid column number");
        assert!(responses[2].get("board").is_some());
        assert!(responses[2].get("aiMove").is_none());
    }

    #[test]
    fn test_malformed_line_gets_error_and_serving_continues() {
        let responses = run_lines(
            &SessionConfig::default(),
            "not json\n{\"type\": \"reset\"}\n",
        );
        assert_eq!(responses.len(), 2);
        let error = responses[0]["error"].as_str().expect("expected error");
        assert!(error.starts_with("malformed request"));
        assert!(responses[1].get("board").is_some());
    }

    #[test]
    fn test_computer_first_sends_opening() {
        let config = SessionConfig {
            computer: Player::Player1,
            depth: Some(1),
            ..Default::default()
        };
        let responses = run_lines(&config, "");
        assert_eq!(responses.len(), 1);
        let column = responses[0]["aiMove"].as_u64().expect("expected aiMove") as usize;
        assert_eq!(responses[0]["board"][0][column], 1);
    }
}
