pub mod gemini;
pub mod http;
pub mod newsdata;

pub use gemini::GeminiRewriter;
pub use http::{HttpClient, MockHttpClient, ReqwestHttpClient};
pub use newsdata::NewsdataClient;
