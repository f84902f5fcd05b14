// Application constants (no magic values)

/// Collection holding user records (workers and customers)
pub const USERS_COLLECTION: &str = "users";

/// Collection holding job records
pub const JOBS_COLLECTION: &str = "jobs";

/// Page size for the worker fan-out query.
/// Bounds memory to one page of user documents in flight.
pub const WORKER_PAGE_SIZE: usize = 500;
