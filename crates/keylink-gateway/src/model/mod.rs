mod url;

pub use url::{CreateUrlRequest, DetailResponse, HealthResponse, UrlInfo};
