//! # P2P exchange server
//! This crate hosts the HTTP front end of the P2P exchange gateway. It is responsible for:
//! Accepting exchange requests from buyers and matching them against the order book.
//! Running the card payment and crypto payout legs of an exchange session when the buyer confirms.
//! Answering status polls while the payout completes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/match`: Match a buyer's request (`amount`, `card_number`, `currency`) with an order and open a session.
//! * `POST /api/confirm?session_id=…`: Charge the buyer and start the payout.
//! * `GET /api/status?session_id=…`: Poll the payment and payout status of a session.
//! * `GET /api/session?session_id=…`: Fetch the full (masked) details of a session.
//! * `GET /api/currencies`: The supported currencies and their minimum amounts.
//! * `GET /api/users/{id}/wallet/{currency}`: A user's wallet address.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
