pub mod board;
pub mod moves;
pub mod history;
pub mod game;
pub mod communication_protocol;
