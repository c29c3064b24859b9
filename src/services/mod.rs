pub mod listing;
pub mod markdown;
pub mod slug;
pub mod upload;
