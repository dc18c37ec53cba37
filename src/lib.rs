pub mod board;
pub mod config;
pub mod feed;
pub mod fixture;
pub mod html;
pub mod http_client;
pub mod proxy;
pub mod state;
pub mod upstream;
