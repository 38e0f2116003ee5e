use redis::{Client, RedisResult, aio::MultiplexedConnection};
use warden_adapters::RedisSettings;

/// Opens a multiplexed connection to the configured Redis host.
pub async fn configure_redis(settings: &RedisSettings) -> RedisResult<MultiplexedConnection> {
    get_redis_client(&settings.host_name)?
        .get_multiplexed_async_connection()
        .await
}

pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
