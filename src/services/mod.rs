pub mod dispatcher;
pub mod health;
pub mod membership;
pub mod scheduler;
