// Interface adapters: wire protocol, level files and network handling.

pub mod http;
pub mod levels;
pub mod net;
pub mod protocol;
pub mod state;
