pub mod capability_check;
pub mod infrastructure;
