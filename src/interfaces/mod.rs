pub mod cli;
pub mod mock_server;
