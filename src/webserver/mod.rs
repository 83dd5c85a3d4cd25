//! Admin HTTP API
//!
//! Read-only status plus pause/resume. Handlers only talk to the trading
//! worker through its `ControlHandle`.

mod routes;
mod server;

pub use routes::create_router;
pub use server::start_server;
