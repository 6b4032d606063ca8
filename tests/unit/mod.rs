mod clock_test;
mod config_test;
mod error_test;
mod store_test;
