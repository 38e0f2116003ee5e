pub mod hashmap_user_store;
pub mod hashset_token_blacklist;
pub mod redis_token_blacklist;

pub use hashmap_user_store::HashMapUserStore;
pub use hashset_token_blacklist::HashSetTokenBlacklist;
pub use redis_token_blacklist::RedisTokenBlacklist;
