mod conversion_config;

pub use conversion_config::ConversionConfig;
