use std::path::PathBuf;

use crate::game::{Color, Square, Target};

/// Errors that can occur when constructing a board position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board: expected 15 checkers per color, found {white} white and {black} black")]
    InvalidCheckerCount { white: u32, black: u32 },
}

/// Errors that can occur when submitting a move to a game session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("illegal move: {color} cannot move {from} to {target} with the remaining dice")]
    IllegalMove {
        color: Color,
        from: Square,
        target: Target,
    },

    #[error("chosen final state is not reachable for {color} with the remaining dice")]
    IllegalFinalState { color: Color },

    #[error("it is not {color}'s turn to move")]
    WrongTurn { color: Color },

    #[error("game is over")]
    GameOver,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::InvalidCheckerCount {
            white: 14,
            black: 15,
        };
        assert_eq!(
            err.to_string(),
            "invalid board: expected 15 checkers per color, found 14 white and 15 black"
        );
    }

    #[test]
    fn test_move_error_display() {
        let err = MoveError::IllegalMove {
            color: Color::White,
            from: Square::Point(6),
            target: Target::Point(1),
        };
        assert_eq!(
            err.to_string(),
            "illegal move: White cannot move point 6 to point 1 with the remaining dice"
        );
    }

    #[test]
    fn test_wrong_turn_display() {
        let err = MoveError::WrongTurn {
            color: Color::Black,
        };
        assert_eq!(err.to_string(), "it is not Black's turn to move");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("games must be > 0".to_string());
        assert_eq!(err.to_string(), "config validation error: games must be > 0");
    }
}
