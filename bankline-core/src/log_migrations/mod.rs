//! Event log migrations, embedded at compile time with `include_str!`
//!
//! Applied in the listed order by `LoggingService`; `000_migrations.sql`
//! bootstraps the tracking table and always comes first.

/// (file name, SQL) pairs, in application order.
/// New migrations get the next NNN_ prefix and are appended here.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
