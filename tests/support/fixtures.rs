//! Test fixtures and constants.

/// Standard test secrets used across multiple tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("DATABASE_URL", "postgres://localhost/mydb"),
    ("API_KEY", "sk-test-12345"),
    ("JWT_SECRET", "super-secret-jwt-token"),
    ("REDIS_URL", "redis://localhost:6379"),
    ("S3_BUCKET", "my-app-bucket"),
];

/// Sample .env file content for push tests.
pub const SAMPLE_ENV: &str = "\
# app settings
DATABASE_URL=postgres://localhost/mydb
API_KEY=sk-test-12345
PUBLIC_URL=https://example.com
";
