pub mod credentials;
pub mod memory_store;
pub mod sheets_client;
pub mod table_store;

pub use credentials::load_access_token;
pub use memory_store::MemoryTableStore;
pub use sheets_client::SheetsClient;
pub use table_store::TableStore;
