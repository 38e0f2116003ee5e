pub mod stub_secret_delivery;

pub use stub_secret_delivery::StubSecretDelivery;
