pub mod adf;
pub mod keys;
pub mod slug;
