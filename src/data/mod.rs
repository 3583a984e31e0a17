pub mod codec;
pub mod dataset;
pub mod models;

pub use codec::{decode_all, decode_value, encode_value, Codec};
pub use dataset::{Dataset, DatasetEncoder};
pub use models::DatasetModel;
