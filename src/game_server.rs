use std::collections::HashMap;
use std::net::TcpStream;
use std::sync::mpsc::Receiver;
use tungstenite::{Message, WebSocket};
use portfolio_chess::communication_protocol::{JsonMsg, JsonMsgServer, MsgType};
use portfolio_chess::game::{ClickOutcome, GameState};

#[derive(Debug)]
pub enum ChannelMsg {
    NewConnection(u32, WebSocket<TcpStream>),
    Msg(u32, JsonMsg),
    Invalid(u32, String),
    Disconnect(u32),
    ValueMonitor,
}

type ClientsType = HashMap<u32, (WebSocket<TcpStream>, GameState)>;

fn try_send(ws: &mut WebSocket<TcpStream>, msg: &JsonMsgServer) {
    let text = match serde_json::to_string(msg) {
        Ok(text) => text,
        Err(e) => {
            log::error!("Cannot serialize message, error: {}", e);
            return;
        }
    };
    match ws.send(Message::Text(text)) {
        Ok(_) => log::debug!("Msg sent"),
        Err(e) => log::error!("Cannot send message, error: {}", e)
    }
}

/// Applies one client message to that client's game and builds the answer.
pub fn handle_message(game: &mut GameState, msg: JsonMsg) -> JsonMsgServer {
    match msg.msg_type {
        MsgType::Click => match msg.square {
            None => JsonMsgServer::error("Click requires a square".to_string()),
            Some(square) => match game.select_or_move(square) {
                ClickOutcome::Rejected(reason) => JsonMsgServer::rejected(game, reason.to_string()),
                _ => JsonMsgServer::state(game),
            }
        },
        MsgType::GoTo => match msg.move_index {
            None => JsonMsgServer::error("GoTo requires a move index".to_string()),
            Some(index) => {
                game.go_to_move(index);
                JsonMsgServer::state(game)
            }
        },
        MsgType::StepBack => {
            game.step_back();
            JsonMsgServer::state(game)
        }
        MsgType::StepForward => {
            game.step_forward();
            JsonMsgServer::state(game)
        }
        MsgType::Reset => {
            game.reset();
            JsonMsgServer::state(game)
        }
        MsgType::State => JsonMsgServer::state(game),
        MsgType::Possible => match msg.square {
            None => JsonMsgServer::error("Possible requires a square".to_string()),
            Some(square) => JsonMsgServer::possible(game.legal_destinations(square)),
        },
    }
}

/// Owns every game. Reader threads only forward decoded messages here, so each game has
/// a single writer.
pub fn handle_game(receiver: Receiver<ChannelMsg>) {
    let mut clients: ClientsType = HashMap::new();

    loop {
        log::debug!("Waiting for message...");
        let msg = match receiver.recv() {
            Ok(msg) => msg,
            Err(e) => {
                log::error!("Channel closed, stopping game thread: {}", e);
                return;
            }
        };
        match msg {
            ChannelMsg::NewConnection(client_id, mut websocket) => {
                let game = GameState::new();
                try_send(&mut websocket, &JsonMsgServer::state(&game));
                clients.insert(client_id, (websocket, game));
                log::debug!("New game for client {}", client_id);
            }

            ChannelMsg::Msg(client_id, decoded) => {
                match clients.get_mut(&client_id) {
                    None => log::warn!("Message from unknown client {}", client_id),
                    Some((websocket, game)) => {
                        log::debug!("Client {}: {:?}", client_id, decoded);
                        let answer = handle_message(game, decoded);
                        try_send(websocket, &answer);
                    }
                }
            }

            ChannelMsg::Invalid(client_id, error) => {
                log::warn!("Cannot decode message from client {}: {}", client_id, error);
                if let Some((websocket, _)) = clients.get_mut(&client_id) {
                    try_send(websocket, &JsonMsgServer::error(error));
                }
            }

            ChannelMsg::Disconnect(client_id) => {
                log::debug!("Removing client {}", client_id);
                clients.remove(&client_id);
            }

            ChannelMsg::ValueMonitor => {
                log::info!("Clients: {}", clients.len());
                for (client_id, (_, game)) in &clients {
                    log::info!("({} - move {} of {})", client_id, game.current_move(), game.move_history().len());
                }
            }
        }
    }
}
