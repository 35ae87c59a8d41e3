pub mod db;
pub mod outbox;
pub mod password;
