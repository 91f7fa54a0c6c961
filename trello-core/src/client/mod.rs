// Client module exposing the Trello REST client

mod rest;

pub use rest::{Board, BoardList, Card, CardUpdate, TrelloClient};
