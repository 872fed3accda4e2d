//! Integration tests over real HTTP

mod http_translator;
mod translate_server;
