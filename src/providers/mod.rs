pub mod groq;
pub(crate) mod http_errors;
