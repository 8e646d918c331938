//! Infrastructure 層: domain の trait の具体的な実装

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod timer;
