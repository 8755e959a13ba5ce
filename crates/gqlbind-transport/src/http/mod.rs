mod http_transport;
mod http_transport_builder;

pub use http_transport::HttpTransport;
pub use http_transport_builder::HttpTransportBuilder;
pub use http_transport_builder::HttpTransportConfig;

#[cfg(test)]
mod tests;
