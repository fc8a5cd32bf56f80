mod url_buf;
mod encode;

pub use url_buf::*;
pub use encode::*;
