pub mod overlay_session;
pub mod session_logger;
pub mod start_use_case;
