pub mod cors;
pub mod request_trace;
pub mod trace_span;

pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use trace_span::TraceSpan;
