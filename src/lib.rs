pub mod expression;
pub mod query;
pub mod record;
