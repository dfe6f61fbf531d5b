mod config;
mod server_res;

pub use self::config::*;
pub use self::server_res::ServerRes;
