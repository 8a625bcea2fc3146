pub use super::search_record::Entity as SearchRecords;
