pub mod upstream_server;
