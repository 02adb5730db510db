//! Proxy module
//!
//! Handles request forwarding to the EduSP platform API.

pub mod forwarder;
pub mod headers;
pub mod logging;

pub use forwarder::{parse_json_body, EduspForwarder, ForwardSpec, ReplyBody, UpstreamReply};
pub use logging::RequestContext;
