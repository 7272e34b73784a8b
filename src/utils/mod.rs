pub mod array;
pub mod http_error;
pub mod nullable;
pub mod stats;
pub mod time;
pub mod validation;
