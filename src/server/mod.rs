// 服务器模块入口
// 提供监听器创建、连接处理和接受循环

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::run_server;
pub use signal::shutdown_signal;
