pub mod http;
pub mod tool_server;
