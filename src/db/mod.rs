pub mod fields;
pub mod manager;
pub mod pool;
pub mod queries;
pub mod row;
pub mod session;
pub mod statement;
pub mod value;

pub use fields::FieldMap;
pub use manager::{ConnectionState, Database, SessionInfo, WriteResult};
pub use pool::{DbPool, PooledConnection};
pub use row::{ResultSet, Row};
pub use session::{ConnectOptions, SessionSettings};
pub use statement::Statement;
pub use value::Value;
