// Error codes implementation
// Stable codes surfaced to operators alongside each categorized failure

pub mod billing {
    pub const NOT_FOUND: &str = "BILLING_5001";
    pub const INVALID_STATE: &str = "BILLING_5002";
    pub const CONFLICT: &str = "BILLING_5003";
    pub const STORE_FAILURE: &str = "BILLING_5004";
}

pub mod database {
    pub const CONNECTION_FAILED: &str = "DB_4001";
    pub const QUERY_FAILED: &str = "DB_4002";
    pub const CONSTRAINT_VIOLATION: &str = "DB_4003";
    pub const MIGRATION_FAILED: &str = "DB_4004";
}

pub mod configuration {
    pub const INVALID_CONFIG: &str = "CONFIG_6001";
}
