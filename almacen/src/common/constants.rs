// doc constants
pub const DOC_ID: &str = "_id";

// field path constants
pub const FIELD_SEPARATOR: &str = ".";
pub const ROUTE_SEPARATOR: &str = "/";

// context constants
pub const TRANS_ID_HEADER: &str = "x-transid";
pub const TRACE_HEADER: &str = "x-trace";
pub const BACKGROUND_TRANS_ID: &str = "n/a";
pub const TRACE_ON_VALUES: [&str; 6] = ["TRUE", "true", "True", "ON", "on", "On"];

// config constants
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 100;

pub const ALMACEN_VERSION: &str = env!("CARGO_PKG_VERSION");
