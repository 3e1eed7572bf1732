pub mod schema;
pub mod value;

pub use schema::{Attribute, Block, NestedBlock, NestingMode};
pub use value::Value;
