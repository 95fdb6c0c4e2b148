use std::collections::HashSet;
use crate::board::Square;
use crate::game::GameState;

#[derive(Debug, PartialEq, Eq, serde::Deserialize)]
pub enum MsgType {
    Click, GoTo, StepBack, StepForward, Reset, State, Possible
}

#[derive(Debug, serde::Deserialize)]
pub struct JsonMsg {
    pub msg_type: MsgType,
    pub square: Option<Square>,
    pub move_index: Option<usize>,
}

#[derive(Debug, PartialEq, Eq, serde::Serialize)]
pub enum MsgTypeServer {
    State,
    Rejected,
    Possible,
    Error,
}

#[derive(Debug, serde::Serialize)]
pub struct JsonMsgServer {
    pub msg_type: MsgTypeServer,
    pub state: Option<GameState>,
    pub history: Vec<String>,
    pub reason: Option<String>,
    pub possible_moves: HashSet<Square>,
}

impl JsonMsgServer {
    pub fn state(game: &GameState) -> Self {
        JsonMsgServer { msg_type: MsgTypeServer::State, state: Some(game.clone()), history: game.numbered_history(), reason: None, possible_moves: HashSet::new() }
    }

    pub fn rejected(game: &GameState, reason: String) -> Self {
        JsonMsgServer { msg_type: MsgTypeServer::Rejected, reason: Some(reason), ..JsonMsgServer::state(game) }
    }

    pub fn possible(moves: HashSet<Square>) -> Self {
        JsonMsgServer { msg_type: MsgTypeServer::Possible, state: None, history: Vec::new(), reason: None, possible_moves: moves }
    }

    pub fn error(reason: String) -> Self {
        JsonMsgServer { msg_type: MsgTypeServer::Error, state: None, history: Vec::new(), reason: Some(reason), possible_moves: HashSet::new() }
    }
}
