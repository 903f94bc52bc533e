//! Log database migrations, embedded with include_str!
//!
//! Each entry is (file name, sql); they are applied in order and recorded
//! in sys_migrations.

/// New migrations go in a `NNN_description.sql` file and are appended here
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
