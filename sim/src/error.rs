use crate::{GameRef, TeamKey};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum BracketError {
    #[error("Invalid bracket configuration: {0}")]
    Configuration(String),

    #[error("No later round to advance into from round {round}")]
    NoForwardRound { round: usize },

    #[error("No game at {0}")]
    UnknownGame(GameRef),

    #[error("Game at {0} is missing a team")]
    SlotEmpty(GameRef),

    #[error("Game at {0} already has a winner")]
    AlreadyDecided(GameRef),

    #[error("Winner is not playing in the game at {0}")]
    NotAParticipant(GameRef),

    #[error("No team {0} in this bracket")]
    UnknownTeam(TeamKey),
}
