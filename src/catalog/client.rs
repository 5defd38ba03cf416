pub mod fixture_client;
pub mod open_library_client;
