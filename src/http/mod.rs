//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, metrics)
//!     → /ws → websocket.rs (lifecycle observer)
//!     → API → security (origin gate, CORS, body limit)
//!           → handlers.rs (JSON parse)
//!           → dispatch (validate, send)
//!           → response.rs (status + JSON body)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use handlers::SEND_PATH;
pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
pub use websocket::WS_PATH;
